//! Client error types.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("configuration error: {0}")]
    Config(String),

    /// The backend has no signed-in session for this cookie.
    #[error("not signed in: {0}")]
    AuthRequired(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("timeout: {0}")]
    Timeout(String),

    /// The backend answered with an unexpected status.
    #[error("backend error (HTTP {status}): {message}")]
    Backend { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Classifies a transport error from reqwest.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Connection(err.to_string())
        }
    }
}
