//! HTTP route handlers.

pub mod auth;
pub mod calendar;
pub mod health;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::SignedCookieJar;

use crate::cookies::session_id;
use crate::error::ApiError;
use crate::session::{Session, SessionId};
use crate::state::AppState;

/// `302 Found` to `location`.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Loads the session named by the request's cookie, if it exists in the store.
async fn load_session(
    state: &AppState,
    jar: &SignedCookieJar,
) -> Result<Option<(SessionId, Session)>, ApiError> {
    let Some(id) = session_id(jar) else {
        return Ok(None);
    };
    let session = state.sessions.load(&id).await?;
    Ok(session.map(|session| (id, session)))
}
