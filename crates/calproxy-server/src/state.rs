//! Shared handler state.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use calproxy_providers::ProviderResult;
use calproxy_providers::google::{GoogleCalendarClient, OAuthClient};

use crate::config::ServerConfig;
use crate::cookies::cookie_key;
use crate::session::{MemorySessionStore, SessionStore};

/// State handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub oauth: OAuthClient,
    pub calendar: GoogleCalendarClient,
    pub sessions: Arc<dyn SessionStore>,
    cookie_key: Key,
}

impl AppState {
    /// Builds state with an in-memory session store.
    pub fn new(config: ServerConfig) -> ProviderResult<Self> {
        let sessions = Arc::new(MemorySessionStore::new(config.session_ttl));
        Self::with_store(config, sessions)
    }

    /// Builds state around a caller-provided session store.
    pub fn with_store(
        config: ServerConfig,
        sessions: Arc<dyn SessionStore>,
    ) -> ProviderResult<Self> {
        let oauth = OAuthClient::new(&config.google)?;
        let calendar = GoogleCalendarClient::new(&config.google)?;
        let cookie_key = cookie_key(&config.session_secret);

        Ok(Self {
            config: Arc::new(config),
            oauth,
            calendar,
            sessions,
            cookie_key,
        })
    }
}

// SignedCookieJar extracts its key from state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
