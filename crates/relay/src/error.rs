use std::time::Duration;
use thiserror::Error;

/// Rejected before any upstream call is made
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputValidationError {
    #[error("expected {expected} images, got {actual}")]
    ImageCount { expected: usize, actual: usize },

    #[error("keyword must not be empty")]
    EmptyKeyword,

    #[error("payload of {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("image {index} is invalid: {reason}")]
    InvalidImage { index: usize, reason: String },
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("upstream API key is not configured")]
    NotConfigured,

    #[error("upstream request timed out after {0:?}")]
    Timeout(Duration),

    #[error("upstream request failed: {0}")]
    Transport(String),

    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("could not decode upstream response: {0}")]
    Decode(String),

    #[error("upstream returned no text")]
    EmptyResponse,
}

impl GenerationError {
    /// Failures worth another attempt: network trouble, throttling, server errors
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationError::Timeout(_) | GenerationError::Transport(_) => true,
            GenerationError::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(GenerationError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(GenerationError::Transport("reset".into()).is_retryable());
        assert!(GenerationError::Upstream { status: 503, body: String::new() }.is_retryable());
        assert!(GenerationError::Upstream { status: 429, body: String::new() }.is_retryable());
        assert!(!GenerationError::Upstream { status: 400, body: String::new() }.is_retryable());
        assert!(!GenerationError::EmptyResponse.is_retryable());
        assert!(!GenerationError::NotConfigured.is_retryable());
    }
}
