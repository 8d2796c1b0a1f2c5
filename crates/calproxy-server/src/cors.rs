//! CORS for the configured frontend origin.

use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
    ACCESS_CONTROL_REQUEST_HEADERS, HeaderMap, HeaderValue, VARY,
};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::state::AppState;

const ALLOWED_METHODS: &str = "GET,POST,OPTIONS";
const DEFAULT_ALLOWED_HEADERS: &str = "Content-Type";
const PREFLIGHT_MAX_AGE_SECS: &str = "600";

/// Middleware answering preflights and tagging responses with the
/// frontend origin. Credentials are allowed so the session cookie flows.
pub async fn cors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let origin = match HeaderValue::from_str(&state.config.allowed_origin()) {
        Ok(origin) => origin,
        Err(e) => {
            warn!(error = %e, "frontend origin is not a valid header value");
            return next.run(request).await;
        }
    };

    if request.method() == Method::OPTIONS {
        let allow_headers = request
            .headers()
            .get(ACCESS_CONTROL_REQUEST_HEADERS)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_ALLOWED_HEADERS));

        let mut response = StatusCode::NO_CONTENT.into_response();
        let headers = response.headers_mut();
        apply_origin(headers, origin);
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, allow_headers);
        headers.insert(
            ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(PREFLIGHT_MAX_AGE_SECS),
        );
        return response;
    }

    let mut response = next.run(request).await;
    apply_origin(response.headers_mut(), origin);
    response
}

fn apply_origin(headers: &mut HeaderMap, origin: HeaderValue) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.append(VARY, HeaderValue::from_static("Origin"));
}
