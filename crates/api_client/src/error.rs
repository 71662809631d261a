//! Client error types.

use thiserror::Error;

/// Errors returned by the API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network-level failure (connection refused, timeout, ...).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body, or a generic fallback.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl ClientError {
    /// Returns true if the server rejected the credential (401).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
