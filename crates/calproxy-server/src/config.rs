//! Server configuration, read once at startup from the environment.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use calproxy_providers::google::{GoogleConfig, GoogleEndpoints, OAuthCredentials};
use thiserror::Error;
use url::Url;

/// Frontend origin used when `FRONTEND_URL` is unset.
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

/// Session secret used when `SESSION_SECRET` is unset. Only fit for development.
pub const DEFAULT_SESSION_SECRET: &str = "change-me";

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(name: &'static str, reason: impl ToString) -> Self {
        Self::Invalid {
            name,
            reason: reason.to_string(),
        }
    }
}

/// Immutable server configuration shared with every handler.
#[derive(Clone)]
pub struct ServerConfig {
    pub google: GoogleConfig,

    /// Where the browser lands after a successful sign-in. Also the only
    /// origin allowed by CORS.
    pub frontend_url: Url,

    /// Secret the session-cookie signing key is derived from.
    pub session_secret: String,

    /// Enables `Secure` and `SameSite=None` on the session cookie.
    pub production: bool,

    pub bind_addr: SocketAddr,

    /// Idle lifetime of a server-side session.
    pub session_ttl: Duration,
}

impl ServerConfig {
    /// Creates a development configuration around the given provider settings.
    pub fn new(google: GoogleConfig) -> Self {
        Self {
            google,
            frontend_url: Url::parse(DEFAULT_FRONTEND_URL).expect("default frontend URL is valid"),
            session_secret: DEFAULT_SESSION_SECRET.to_string(),
            production: false,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }

    pub fn with_frontend_url(mut self, url: Url) -> Self {
        self.frontend_url = url;
        self
    }

    pub fn with_session_secret(mut self, secret: impl Into<String>) -> Self {
        self.session_secret = secret.into();
        self
    }

    pub fn with_production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, treating empty values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let credentials = OAuthCredentials::new(
            required("GOOGLE_CLIENT_ID")?,
            required("GOOGLE_CLIENT_SECRET")?,
            required("GOOGLE_REDIRECT_URI")?,
        );

        let mut endpoints = GoogleEndpoints::default();
        if let Some(url) = get("GOOGLE_AUTH_URL") {
            endpoints = endpoints.with_auth_url(url);
        }
        if let Some(url) = get("GOOGLE_TOKEN_URL") {
            endpoints = endpoints.with_token_url(url);
        }
        if let Some(url) = get("GOOGLE_CALENDAR_API") {
            endpoints = endpoints.with_calendar_api(url);
        }

        let mut google = GoogleConfig::new(credentials).with_endpoints(endpoints);
        if let Some(secs) = get("PROVIDER_TIMEOUT_SECS") {
            google = google.with_timeout(Duration::from_secs(parse_secs(
                "PROVIDER_TIMEOUT_SECS",
                &secs,
            )?));
        }
        google
            .validate()
            .map_err(|reason| ConfigError::invalid("GOOGLE_*", reason))?;

        let frontend_url = get("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string());
        let frontend_url =
            Url::parse(&frontend_url).map_err(|e| ConfigError::invalid("FRONTEND_URL", e))?;

        let host: IpAddr = get("SERVER_HOST")
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
            .parse()
            .map_err(|e| ConfigError::invalid("SERVER_HOST", e))?;
        let port: u16 = match get("SERVER_PORT") {
            Some(port) => port
                .parse()
                .map_err(|e| ConfigError::invalid("SERVER_PORT", e))?,
            None => DEFAULT_PORT,
        };

        let session_ttl = match get("SESSION_TTL_SECS") {
            Some(secs) => Duration::from_secs(parse_secs("SESSION_TTL_SECS", &secs)?),
            None => Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        };

        let production = get("APP_ENV").is_some_and(|env| env.eq_ignore_ascii_case("production"));

        Ok(Self {
            google,
            frontend_url,
            session_secret: get("SESSION_SECRET")
                .unwrap_or_else(|| DEFAULT_SESSION_SECRET.to_string()),
            production,
            bind_addr: SocketAddr::new(host, port),
            session_ttl,
        })
    }

    /// True when the session secret was left at its development default.
    pub fn uses_default_secret(&self) -> bool {
        self.session_secret == DEFAULT_SESSION_SECRET
    }

    /// Frontend URL with `auth=success` appended, for the post-login redirect.
    pub fn success_redirect(&self) -> String {
        let mut url = self.frontend_url.clone();
        url.query_pairs_mut().append_pair("auth", "success");
        url.to_string()
    }

    /// Value for `Access-Control-Allow-Origin`: the frontend origin without
    /// path or trailing slash.
    pub fn allowed_origin(&self) -> String {
        self.frontend_url.origin().ascii_serialization()
    }
}

// The session secret never reaches logs.
impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("google", &self.google)
            .field("frontend_url", &self.frontend_url.as_str())
            .field("session_secret", &"<redacted>")
            .field("production", &self.production)
            .field("bind_addr", &self.bind_addr)
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}

fn parse_secs(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    let secs: u64 = value.parse().map_err(|e| ConfigError::invalid(name, e))?;
    if secs == 0 {
        return Err(ConfigError::invalid(name, "must be greater than zero"));
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("GOOGLE_CLIENT_ID", "client"),
        ("GOOGLE_CLIENT_SECRET", "secret"),
        ("GOOGLE_REDIRECT_URI", "http://localhost:4000/api/auth/google/callback"),
    ];

    #[test]
    fn defaults_apply() {
        let config = ServerConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();
        assert_eq!(config.frontend_url.as_str(), "http://localhost:5173/");
        assert_eq!(config.bind_addr, "0.0.0.0:4000".parse().unwrap());
        assert_eq!(config.session_ttl, Duration::from_secs(86_400));
        assert_eq!(config.google.timeout, Duration::from_secs(10));
        assert!(!config.production);
        assert!(config.uses_default_secret());
    }

    #[test]
    fn missing_required_fails_fast() {
        for skip in 0..REQUIRED.len() {
            let pairs: Vec<_> = REQUIRED
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, p)| *p)
                .collect();
            let err = ServerConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert!(matches!(err, ConfigError::Missing(name) if name == REQUIRED[skip].0));
        }
    }

    #[test]
    fn empty_required_counts_as_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[1] = ("GOOGLE_CLIENT_SECRET", "  ");
        let err = ServerConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("GOOGLE_CLIENT_SECRET")));
    }

    #[test]
    fn overrides_apply() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("FRONTEND_URL", "https://app.example.com"),
            ("SESSION_SECRET", "s3cret"),
            ("APP_ENV", "production"),
            ("SERVER_PORT", "8080"),
            ("SERVER_HOST", "127.0.0.1"),
            ("PROVIDER_TIMEOUT_SECS", "3"),
            ("SESSION_TTL_SECS", "60"),
            ("GOOGLE_TOKEN_URL", "http://127.0.0.1:9000/token"),
        ]);
        let config = ServerConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.allowed_origin(), "https://app.example.com");
        assert!(config.production);
        assert!(!config.uses_default_secret());
        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.google.timeout, Duration::from_secs(3));
        assert_eq!(config.session_ttl, Duration::from_secs(60));
        assert_eq!(config.google.endpoints.token_url, "http://127.0.0.1:9000/token");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("SERVER_PORT", "eighty"));
        let err = ServerConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "SERVER_PORT", .. }));

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PROVIDER_TIMEOUT_SECS", "0"));
        assert!(ServerConfig::from_lookup(lookup_from(&pairs)).is_err());

        let mut pairs = REQUIRED.to_vec();
        pairs[2] = ("GOOGLE_REDIRECT_URI", "/relative/callback");
        assert!(ServerConfig::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("SESSION_SECRET", "hunter2"));
        let config = ServerConfig::from_lookup(lookup_from(&pairs)).unwrap();
        let out = format!("{:?}", config);
        assert!(!out.contains("hunter2"));
        assert!(!out.contains("\"secret\""));
    }

    #[test]
    fn success_redirect_appends_query() {
        let config = ServerConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();
        assert_eq!(config.success_redirect(), "http://localhost:5173/?auth=success");

        let config = config.with_frontend_url(Url::parse("https://app.example.com/home?tab=1").unwrap());
        assert_eq!(
            config.success_redirect(),
            "https://app.example.com/home?tab=1&auth=success"
        );
    }
}
