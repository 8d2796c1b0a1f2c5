//! Sign-in, callback and logout.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Response;
use axum_extra::extract::SignedCookieJar;
use calproxy_providers::google::{OAuthClient, TokenBundle, now_millis};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info, warn};

use super::{found, load_session};
use crate::cookies::{removal_cookie, session_cookie, session_id};
use crate::error::ApiError;
use crate::session::{Session, SessionId};
use crate::state::AppState;

/// `GET /api/auth/google`
///
/// Stores a fresh nonce in the session and redirects to the consent screen.
pub async fn start(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Response), ApiError> {
    let (id, mut session) = match load_session(&state, &jar).await? {
        Some(existing) => existing,
        None => (SessionId::generate(), Session::default()),
    };

    let nonce = OAuthClient::generate_state();
    session.state = Some(nonce.clone());
    state.sessions.save(&id, session).await?;

    info!(session = ?id, "starting sign-in");
    let jar = jar.add(session_cookie(&id, state.config.production));
    Ok((jar, found(&state.oauth.authorization_url(&nonce))))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// `GET /api/auth/google/callback`
///
/// The stored nonce is consumed before anything else, including query
/// parsing, so it is single-use whatever the outcome.
pub async fn callback(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    params: Result<Query<CallbackParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let mut current = load_session(&state, &jar).await?;

    let stored_nonce = match current.as_mut() {
        Some((id, session)) => {
            let nonce = session.take_state();
            if nonce.is_some() {
                state.sessions.save(id, session.clone()).await?;
            }
            nonce
        }
        None => None,
    };

    let Query(params) = params.map_err(|e| {
        warn!(error = %e, "malformed callback query");
        ApiError::BadRequest("invalid query")
    })?;

    if let Some(provider_error) = params.error.as_deref() {
        warn!(error = %provider_error, "provider returned an authorization error");
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return Err(ApiError::BadRequest("invalid code"));
    };

    let state_matches = matches!(
        (params.state.as_deref(), stored_nonce.as_deref()),
        (Some(received), Some(expected)) if received == expected
    );
    if !state_matches {
        warn!(has_stored_nonce = stored_nonce.is_some(), "state mismatch on callback");
        return Err(ApiError::BadRequest("invalid state"));
    }

    // A matching nonce implies a stored session.
    let Some((id, mut session)) = current else {
        return Err(ApiError::BadRequest("invalid state"));
    };

    let grant = state.oauth.exchange_code(&code).await.map_err(|e| {
        error!(error = %e, "authorization code exchange failed");
        ApiError::AuthenticationFailed
    })?;

    session.tokens = Some(TokenBundle::from_grant(grant, now_millis()));
    state.sessions.save(&id, session).await?;

    info!(session = ?id, "sign-in complete");
    Ok(found(&state.config.success_redirect()))
}

/// `POST /api/auth/logout`
pub async fn logout(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Json<Value>), ApiError> {
    if let Some(id) = session_id(&jar) {
        state.sessions.destroy(&id).await?;
        info!(session = ?id, "signed out");
    }
    Ok((jar.remove(removal_cookie()), Json(json!({ "ok": true }))))
}
