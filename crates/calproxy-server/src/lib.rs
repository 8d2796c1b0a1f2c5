//! HTTP backend: Google sign-in, server-side sessions, calendar proxy.
//!
//! The backend owns the OAuth client secret and the user's tokens. The
//! browser only ever holds a signed session cookie.
//!
//! # Routes
//!
//! | method | path                          | purpose                              |
//! |--------|-------------------------------|--------------------------------------|
//! | GET    | `/api/auth/google`            | start sign-in (302 to consent)       |
//! | GET    | `/api/auth/google/callback`   | finish sign-in (302 to frontend)     |
//! | GET    | `/api/calendar/events`        | upcoming events, provider JSON as is |
//! | POST   | `/api/auth/logout`            | destroy the session                  |
//! | GET    | `/api/health`                 | liveness                             |
//!
//! # Example
//!
//! ```rust,no_run
//! use calproxy_server::{AppState, HttpServer, ServerConfig, ShutdownHandle, router};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::from_env()?;
//!     let addr = config.bind_addr;
//!     let server = HttpServer::bind(addr, router(AppState::new(config)?)).await?;
//!
//!     let shutdown = ShutdownHandle::new();
//!     shutdown.listen_for_signals();
//!     server.run(shutdown).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod cookies;
mod cors;
mod error;
mod routes;
mod server;
mod session;
mod signals;
mod state;
mod token;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};

pub use config::{ConfigError, ServerConfig};
pub use cookies::{SESSION_COOKIE, cookie_key, session_cookie};
pub use error::{ApiError, ServerError, ServerResult};
pub use server::HttpServer;
pub use session::{BoxFuture, MemorySessionStore, Session, SessionError, SessionId, SessionStore};
pub use signals::ShutdownHandle;
pub use state::AppState;
pub use token::{AccessToken, ensure_access_token};

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/google", get(routes::auth::start))
        .route("/api/auth/google/callback", get(routes::auth::callback))
        .route("/api/auth/logout", post(routes::auth::logout))
        .route("/api/calendar/events", get(routes::calendar::list_events))
        .route("/api/health", get(routes::health::health))
        .layer(middleware::from_fn_with_state(state.clone(), cors::cors))
        .with_state(state)
}
