//! Upcoming-events proxy.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::SignedCookieJar;
use calproxy_providers::google::{ListQuery, now_millis};
use chrono::Utc;
use tracing::{debug, error};

use super::load_session;
use crate::error::ApiError;
use crate::state::AppState;
use crate::token::ensure_access_token;

/// `GET /api/calendar/events`
///
/// Relays the provider's listing body unchanged.
pub async fn list_events(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, ApiError> {
    let Some((id, mut session)) = load_session(&state, &jar).await? else {
        debug!("events requested without a session");
        return Err(ApiError::Unauthenticated);
    };

    let token = ensure_access_token(&state.oauth, session.tokens.as_mut(), now_millis())
        .await
        .ok_or(ApiError::Unauthenticated)?;

    if token.was_refreshed() {
        state.sessions.save(&id, session).await?;
    }

    let query = ListQuery::upcoming(Utc::now());
    let body = state
        .calendar
        .list_events(token.as_str(), &query)
        .await
        .map_err(|e| {
            error!(error = %e, transient = e.is_transient(), "events listing failed");
            ApiError::EventsUnavailable
        })?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
