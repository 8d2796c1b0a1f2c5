//! Google OAuth 2.0 and Calendar API.
//!
//! - [`OAuthClient`] builds the consent URL and talks to the token endpoint
//! - [`TokenBundle`] holds a session's tokens and decides when to refresh
//! - [`GoogleCalendarClient`] lists upcoming events with a bearer token
//!
//! # Example
//!
//! ```ignore
//! use calproxy_providers::google::{GoogleConfig, OAuthClient, OAuthCredentials};
//!
//! let config = GoogleConfig::new(OAuthCredentials::new(
//!     "your-client-id.apps.googleusercontent.com",
//!     "your-client-secret",
//!     "http://localhost:4000/api/auth/google/callback",
//! ));
//!
//! let oauth = OAuthClient::new(&config)?;
//! let state = OAuthClient::generate_state();
//! let url = oauth.authorization_url(&state);
//! ```

mod client;
mod config;
mod oauth;
mod tokens;

pub use client::{DEFAULT_MAX_RESULTS, GoogleCalendarClient, ListQuery};
pub use config::{
    GOOGLE_AUTH_URL, GOOGLE_CALENDAR_API, GOOGLE_TOKEN_URL, GoogleConfig, GoogleEndpoints,
    OAuthCredentials,
};
pub use oauth::{OAuthClient, TokenResponse};
pub use tokens::{EXPIRY_MARGIN_MS, TokenBundle, expiry_from, now_millis};
