// Transport Port (Interface)
// One HTTP exchange; the adapter lives in infra-http.

use crate::error::Result;
use async_trait::async_trait;

/// HTTP verbs used by the engine's API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Patch => write!(f, "PATCH"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// Status and raw body of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport interface
///
/// Implementations:
/// - ReqwestTransport: HTTP over reqwest (infra-http)
/// - MockTransport: generated by mockall in unit tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request against `path` (relative to the configured host)
    ///
    /// # Errors
    /// - ClientError::Transport if the server could not be reached.
    ///   Non-2xx statuses are returned as a `RawResponse`, not an error.
    async fn send(&self, method: Method, path: &str, body: Option<Vec<u8>>)
        -> Result<RawResponse>;
}
