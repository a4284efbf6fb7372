use thiserror::Error;

/// Errors from a single Asana API call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status. `body` is the raw response text.
    #[error("API Error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse Asana response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
