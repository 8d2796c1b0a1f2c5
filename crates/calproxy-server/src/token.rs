//! Access-token lifecycle for a session.

use calproxy_providers::google::{OAuthClient, TokenBundle};
use tracing::{debug, error, info};

/// Outcome of [`ensure_access_token`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessToken {
    /// The stored token is still usable.
    Cached(String),
    /// A refresh grant produced a new token; the bundle was updated in place
    /// and must be persisted.
    Refreshed(String),
}

impl AccessToken {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cached(token) | Self::Refreshed(token) => token,
        }
    }

    pub fn was_refreshed(&self) -> bool {
        matches!(self, Self::Refreshed(_))
    }
}

/// Returns a usable access token for `tokens`, refreshing it if needed.
///
/// `None` means the session is unauthenticated: there is no bundle, the
/// token is stale with no refresh token, or the refresh grant failed. At
/// most one refresh request is made.
pub async fn ensure_access_token(
    oauth: &OAuthClient,
    tokens: Option<&mut TokenBundle>,
    now_ms: i64,
) -> Option<AccessToken> {
    let bundle = tokens?;

    if let Some(token) = bundle.usable_access_token(now_ms) {
        debug!("using cached access token");
        return Some(AccessToken::Cached(token.to_string()));
    }

    let refresh_token = bundle.refresh_token.clone().filter(|t| !t.is_empty())?;

    match oauth.refresh_token(&refresh_token).await {
        Ok(grant) => {
            bundle.apply_refresh(grant, now_ms);
            info!(expiry_date = ?bundle.expiry_date, "access token refreshed");
            Some(AccessToken::Refreshed(bundle.access_token.clone()))
        }
        Err(e) => {
            error!(error = %e, "access token refresh failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calproxy_providers::google::{
        GoogleConfig, GoogleEndpoints, OAuthCredentials, expiry_from, now_millis,
    };
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn oauth_for(server: &MockServer) -> OAuthClient {
        let config = GoogleConfig::new(OAuthCredentials::new(
            "client",
            "secret",
            "http://localhost:4000/api/auth/google/callback",
        ))
        .with_endpoints(GoogleEndpoints::with_base(&server.uri()));
        OAuthClient::new(&config).unwrap()
    }

    fn bundle(access: &str, refresh: Option<&str>, expiry_date: i64) -> TokenBundle {
        TokenBundle {
            access_token: access.to_string(),
            refresh_token: refresh.map(String::from),
            expiry_date: Some(expiry_date),
        }
    }

    async fn token_endpoint(server: &MockServer, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=R"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "B",
                "expires_in": 1800
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn no_bundle_is_unauthenticated() {
        let server = MockServer::start().await;
        token_endpoint(&server, 0).await;
        let oauth = oauth_for(&server);

        assert_eq!(ensure_access_token(&oauth, None, now_millis()).await, None);
    }

    #[tokio::test]
    async fn fresh_token_makes_no_outbound_call() {
        let server = MockServer::start().await;
        token_endpoint(&server, 0).await;
        let oauth = oauth_for(&server);

        let now = now_millis();
        let mut tokens = bundle("A", Some("R"), now + 31_000);
        let token = ensure_access_token(&oauth, Some(&mut tokens), now).await;

        assert_eq!(token, Some(AccessToken::Cached("A".to_string())));
        assert_eq!(tokens.access_token, "A");
    }

    #[tokio::test]
    async fn stale_token_is_refreshed_once() {
        let server = MockServer::start().await;
        token_endpoint(&server, 1).await;
        let oauth = oauth_for(&server);

        let now = now_millis();
        // Within the margin counts as stale.
        let mut tokens = bundle("A", Some("R"), now + 30_000);
        let token = ensure_access_token(&oauth, Some(&mut tokens), now).await;

        assert_eq!(token, Some(AccessToken::Refreshed("B".to_string())));
        assert_eq!(tokens.access_token, "B");
        assert_eq!(tokens.refresh_token.as_deref(), Some("R"));
        assert_eq!(tokens.expiry_date, Some(expiry_from(now, Some(1800))));
    }

    #[tokio::test]
    async fn stale_token_without_refresh_token_is_unauthenticated() {
        let server = MockServer::start().await;
        token_endpoint(&server, 0).await;
        let oauth = oauth_for(&server);

        let now = now_millis();
        let mut tokens = bundle("A", None, now - 1);
        assert_eq!(ensure_access_token(&oauth, Some(&mut tokens), now).await, None);
    }

    #[tokio::test]
    async fn failed_refresh_is_unauthenticated_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_grant"}"#))
            .expect(1)
            .mount(&server)
            .await;
        let oauth = oauth_for(&server);

        let now = now_millis();
        let mut tokens = bundle("A", Some("R"), now - 1);
        assert_eq!(ensure_access_token(&oauth, Some(&mut tokens), now).await, None);
        assert_eq!(tokens.access_token, "A");
    }
}
