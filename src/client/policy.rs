use super::error::{ApiError, ApiResult};

/// What a call site does when an API call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationMode {
    /// Hand the error back; the command ends with a nonzero exit.
    Abort,
    /// Print the failure, yield `None` and let the caller carry on.
    ContinueAndReport,
}

impl PropagationMode {
    pub fn settle<T>(self, result: ApiResult<T>) -> ApiResult<Option<T>> {
        match (self, result) {
            (_, Ok(value)) => Ok(Some(value)),
            (PropagationMode::Abort, Err(e)) => Err(e),
            (PropagationMode::ContinueAndReport, Err(e)) => {
                report(&e);
                Ok(None)
            }
        }
    }
}

/// Surface a failure to the user without stopping.
pub fn report(error: &ApiError) {
    tracing::warn!(%error, "api call failed, continuing");
    eprintln!("{error}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_error() -> ApiResult<u32> {
        Err(ApiError::Status {
            status: 500,
            body: "{\"errors\":[]}".into(),
        })
    }

    #[test]
    fn success_passes_through_either_mode() {
        assert_eq!(PropagationMode::Abort.settle(Ok(1)).unwrap(), Some(1));
        assert_eq!(PropagationMode::ContinueAndReport.settle(Ok(1)).unwrap(), Some(1));
    }

    #[test]
    fn abort_returns_the_error() {
        let err = PropagationMode::Abort.settle(server_error()).unwrap_err();
        assert_eq!(err.to_string(), "API Error 500: {\"errors\":[]}");
    }

    #[test]
    fn continue_turns_the_error_into_none() {
        assert_eq!(PropagationMode::ContinueAndReport.settle(server_error()).unwrap(), None);
    }
}
