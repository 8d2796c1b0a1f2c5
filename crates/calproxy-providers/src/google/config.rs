//! Google provider configuration.

use std::time::Duration;

use url::Url;

use crate::error::{ProviderError, ProviderResult};

/// Google consent screen.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
/// Google token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// Base URL for Google Calendar API v3.
pub const GOOGLE_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";

/// OAuth 2.0 web-client credentials.
#[derive(Clone)]
pub struct OAuthCredentials {
    /// The OAuth 2.0 client ID from Google Cloud Console.
    pub client_id: String,
    /// The OAuth 2.0 client secret from Google Cloud Console.
    pub client_secret: String,
    /// Callback URI registered for this client.
    pub redirect_uri: String,
}

impl OAuthCredentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
        }
    }

    /// Checks that every field is present and the redirect URI is absolute.
    pub fn validate(&self) -> Result<(), String> {
        if self.client_id.trim().is_empty() {
            return Err("client_id is required".to_string());
        }
        if self.client_secret.trim().is_empty() {
            return Err("client_secret is required".to_string());
        }
        if self.redirect_uri.trim().is_empty() {
            return Err("redirect_uri is required".to_string());
        }
        Url::parse(&self.redirect_uri).map_err(|e| format!("redirect_uri: {}", e))?;
        Ok(())
    }
}

// The secret never reaches logs.
impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// Provider endpoint URLs. Overridable so tests can point at a local mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleEndpoints {
    pub auth_url: String,
    pub token_url: String,
    pub calendar_api: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            calendar_api: GOOGLE_CALENDAR_API.to_string(),
        }
    }
}

impl GoogleEndpoints {
    /// Points every endpoint at one base URL (`{base}/auth`, `{base}/token`,
    /// `{base}/calendar/v3`).
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            auth_url: format!("{}/auth", base),
            token_url: format!("{}/token", base),
            calendar_api: format!("{}/calendar/v3", base),
        }
    }

    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    pub fn with_calendar_api(mut self, url: impl Into<String>) -> Self {
        self.calendar_api = url.into();
        self
    }

    fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("auth_url", &self.auth_url),
            ("token_url", &self.token_url),
            ("calendar_api", &self.calendar_api),
        ] {
            Url::parse(value).map_err(|e| format!("{}: {}", name, e))?;
        }
        Ok(())
    }
}

/// Configuration for the Google provider clients.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub credentials: OAuthCredentials,

    pub endpoints: GoogleEndpoints,

    /// OAuth scopes to request.
    ///
    /// Defaults to read-only calendar access.
    pub scopes: Vec<String>,

    /// Calendar to list. Defaults to `"primary"`.
    pub calendar_id: String,

    /// Upper bound on every provider call.
    pub timeout: Duration,

    /// User agent string for provider requests.
    pub user_agent: String,
}

impl GoogleConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    /// OAuth scope for read-only calendar access.
    pub const DEFAULT_SCOPE: &'static str = "https://www.googleapis.com/auth/calendar.readonly";

    pub fn new(credentials: OAuthCredentials) -> Self {
        Self {
            credentials,
            endpoints: GoogleEndpoints::default(),
            scopes: vec![Self::DEFAULT_SCOPE.to_string()],
            calendar_id: "primary".to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("calproxy/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_endpoints(mut self, endpoints: GoogleEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    pub fn with_calendar_id(mut self, id: impl Into<String>) -> Self {
        self.calendar_id = id.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.credentials
            .validate()
            .map_err(|e| format!("invalid credentials: {}", e))?;

        self.endpoints
            .validate()
            .map_err(|e| format!("invalid endpoint: {}", e))?;

        if self.scopes.is_empty() {
            return Err("at least one OAuth scope is required".to_string());
        }

        if self.timeout.is_zero() {
            return Err("timeout must be greater than zero".to_string());
        }

        Ok(())
    }

    /// Builds the shared HTTP client for provider calls.
    pub(crate) fn http_client(&self) -> ProviderResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| {
                ProviderError::configuration(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })
    }
}
