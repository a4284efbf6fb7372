#[allow(clippy::module_inception)]
pub mod client;
pub mod error;
pub mod policy;

pub use client::AsanaClient;
pub use error::{ApiError, ApiResult};
pub use policy::PropagationMode;
