//! OAuth 2.0 authorization-code flow against Google's endpoints.
//!
//! # Flow Overview
//!
//! 1. Generate a random `state` nonce and keep it in the caller's session
//! 2. Send the browser to [`OAuthClient::authorization_url`]
//! 3. Google redirects back to the registered redirect URI with `code` and `state`
//! 4. The caller checks `state` and calls [`OAuthClient::exchange_code`]
//! 5. Later, [`OAuthClient::refresh_token`] trades the refresh token for a new access token
//!
//! `access_type=offline` with `prompt=consent` makes Google issue a refresh
//! token on every consent, not only the first one.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng as _;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};

use super::config::{GoogleConfig, GoogleEndpoints, OAuthCredentials};

/// Length of the `state` nonce in bytes, before base64 encoding.
const STATE_LENGTH: usize = 16;

/// Response from Google's token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// OAuth client for Google's consent screen and token endpoint.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    credentials: OAuthCredentials,
    endpoints: GoogleEndpoints,
    scopes: Vec<String>,
    http_client: reqwest::Client,
}

impl OAuthClient {
    /// Creates a client from a validated configuration.
    pub fn new(config: &GoogleConfig) -> ProviderResult<Self> {
        config.validate().map_err(ProviderError::configuration)?;

        Ok(Self {
            credentials: config.credentials.clone(),
            endpoints: config.endpoints.clone(),
            scopes: config.scopes.clone(),
            http_client: config.http_client()?,
        })
    }

    /// Generates a random `state` value for CSRF protection.
    pub fn generate_state() -> String {
        let mut rng = rand::rng();
        let bytes: Vec<u8> = (0..STATE_LENGTH).map(|_| rng.random()).collect();
        URL_SAFE_NO_PAD.encode(&bytes)
    }

    /// Builds the consent-screen URL carrying `state`.
    pub fn authorization_url(&self, state: &str) -> String {
        let scope = self.scopes.join(" ");
        let separator = if self.endpoints.auth_url.contains('?') { '&' } else { '?' };

        format!(
            "{}{}client_id={}&redirect_uri={}&response_type=code&scope={}&\
            access_type=offline&prompt=consent&include_granted_scopes=true&state={}",
            self.endpoints.auth_url,
            separator,
            urlencoding::encode(&self.credentials.client_id),
            urlencoding::encode(&self.credentials.redirect_uri),
            urlencoding::encode(&scope),
            urlencoding::encode(state),
        )
    }

    /// Exchanges an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> ProviderResult<TokenResponse> {
        let params = [
            ("code", code),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("redirect_uri", self.credentials.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let tokens = self.post_token_request(&params, "token exchange").await?;
        info!(
            has_refresh_token = tokens.refresh_token.is_some(),
            expires_in = ?tokens.expires_in,
            "obtained tokens from authorization code"
        );
        Ok(tokens)
    }

    /// Trades a refresh token for a new access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> ProviderResult<TokenResponse> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let tokens = self.post_token_request(&params, "token refresh").await?;
        info!(expires_in = ?tokens.expires_in, "refreshed access token");
        Ok(tokens)
    }

    async fn post_token_request(
        &self,
        params: &[(&str, &str)],
        context: &str,
    ) -> ProviderResult<TokenResponse> {
        debug!(url = %self.endpoints.token_url, "{}", context);

        let response = self
            .http_client
            .post(&self.endpoints.token_url)
            .form(params)
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(context, e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProviderError::network(format!("{}: failed to read response: {}", context, e))
        })?;

        if !status.is_success() {
            return Err(ProviderError::authentication(format!(
                "{} failed: {}",
                context, body
            ))
            .with_status(status.as_u16()));
        }

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("{}: invalid token response: {}", context, e))
                .with_source(e)
        })
    }
}
