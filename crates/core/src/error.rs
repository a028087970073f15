// Central Error Type for the client

use crate::domain::TaskId;
use std::time::Duration;
use thiserror::Error;

/// Client-side error type shared by every layer
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error ({status}, {code}): {message}")]
    Api {
        status: u16,
        message: String,
        code: String,
        error_type: String,
        link: Option<String>,
    },

    #[error("Timed out after {0:?} waiting for task")]
    Timeout(Duration),

    #[error("Wait for task {task_id} was canceled")]
    Canceled { task_id: TaskId },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// True for failures a caller could reasonably retry (network, 5xx).
    ///
    /// The task protocol itself never retries; this is for callers that
    /// want their own policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(_) => true,
            ClientError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

/// Result type alias using ClientError
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ClientError::Transport("reset".into()).is_retryable());
        assert!(ClientError::Api {
            status: 503,
            message: "busy".into(),
            code: "unavailable".into(),
            error_type: "system".into(),
            link: None,
        }
        .is_retryable());
        assert!(!ClientError::Api {
            status: 400,
            message: "bad".into(),
            code: "invalid_index_uid".into(),
            error_type: "invalid_request".into(),
            link: None,
        }
        .is_retryable());
        assert!(!ClientError::Timeout(Duration::from_secs(5)).is_retryable());
        assert!(!ClientError::NotFound("task 1".into()).is_retryable());
    }

    #[test]
    fn test_timeout_message_carries_budget() {
        let err = ClientError::Timeout(Duration::from_millis(1500));
        assert!(err.to_string().contains("1.5s"));
    }
}
