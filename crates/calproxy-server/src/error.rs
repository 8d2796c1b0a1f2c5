//! Server error types.

use std::io;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::config::ConfigError;
use crate::session::SessionError;

/// Result type for server startup.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Provider setup failed: {0}")]
    Provider(#[from] calproxy_providers::ProviderError),
}

/// Errors returned by request handlers.
///
/// Responses never carry provider or store detail; that goes to the log.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request from the browser (plain-text body).
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("not authenticated")]
    Unauthenticated,

    /// The authorization-code exchange failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The events listing failed.
    #[error("failed to fetch events")]
    EventsUnavailable,

    #[error("session store error: {0}")]
    Session(#[from] SessionError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            Self::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            Self::AuthenticationFailed => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
            Self::EventsUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            Self::Session(ref e) => {
                tracing::error!(error = %e, "session store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
            }
        }
    }
}
