//! Error types for provider calls.
//!
//! Every failure talking to the OAuth token endpoint or the calendar API is
//! a [`ProviderError`]. The message carries provider detail (status, body)
//! for logs; callers facing the browser map errors to opaque responses.

use std::fmt;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// The provider rejected a grant or the bearer token.
    AuthenticationFailed,
    /// The token is valid but lacks access (403).
    AuthorizationFailed,
    /// Connection failed, timed out, or the body could not be read.
    NetworkError,
    /// Too many requests (429).
    RateLimited,
    /// Any other non-2xx response.
    ServerError,
    /// A 2xx response whose body did not have the expected shape.
    InvalidResponse,
    /// Missing or invalid configuration.
    ConfigurationError,
}

impl ProviderErrorCode {
    /// Whether a later attempt could succeed.
    ///
    /// Nothing retries automatically; this only informs logs.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::RateLimited | Self::ServerError
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::AuthorizationFailed => "authorization_failed",
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::ConfigurationError => "configuration_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error from a provider call.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    /// HTTP status returned by the provider, when there was a response.
    status: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthenticationFailed, message)
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthorizationFailed, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::RateLimited, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ServerError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    /// Sets the HTTP status the provider answered with.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches the underlying cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn is_transient(&self) -> bool {
        self.code.is_transient()
    }

    /// Classifies a transport error from reqwest.
    pub(crate) fn from_transport(context: &str, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("{}: request timeout", context)
        } else if err.is_connect() {
            format!("{}: connection failed: {}", context, err)
        } else {
            format!("{}: request failed: {}", context, err)
        };
        Self::network(message).with_source(err)
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(status) = self.status {
            write!(f, " (HTTP {})", status)?;
        }
        Ok(())
    }
}

/// Result alias for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_codes() {
        assert!(ProviderErrorCode::NetworkError.is_transient());
        assert!(ProviderErrorCode::RateLimited.is_transient());
        assert!(ProviderErrorCode::ServerError.is_transient());
        assert!(!ProviderErrorCode::AuthenticationFailed.is_transient());
        assert!(!ProviderErrorCode::InvalidResponse.is_transient());
    }

    #[test]
    fn error_creation() {
        let err = ProviderError::authentication("invalid_grant");
        assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
        assert_eq!(err.message(), "invalid_grant");
        assert!(err.status().is_none());
    }

    #[test]
    fn display_includes_status() {
        let err = ProviderError::server("backend error").with_status(503);
        assert_eq!(err.to_string(), "server_error: backend error (HTTP 503)");
    }

    #[test]
    fn with_source_is_exposed() {
        use std::error::Error;
        let io_err = std::io::Error::other("socket closed");
        let err = ProviderError::network("read failed").with_source(io_err);
        assert!(err.source().is_some());
    }
}
