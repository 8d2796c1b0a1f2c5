//! Provider clients for the calendar proxy.
//!
//! - [`google::OAuthClient`] - consent URL, code exchange, token refresh
//! - [`google::GoogleCalendarClient`] - upcoming-events listing
//! - [`google::TokenBundle`] - per-session tokens with expiry tracking
//! - [`ProviderError`] - error type for every provider call
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐     ┌──────────────────────┐
//! │  Google OAuth     │     │  Google Calendar     │
//! │  token endpoint   │     │  API v3              │
//! └─────────┬─────────┘     └──────────┬───────────┘
//!           │                          │
//!           ▼                          ▼
//! ┌───────────────────┐     ┌──────────────────────┐
//! │   OAuthClient     │     │ GoogleCalendarClient │
//! └─────────┬─────────┘     └──────────┬───────────┘
//!           │ TokenResponse            │ raw JSON body
//!           ▼                          │
//!     ┌─────────────┐                  │
//!     │ TokenBundle │── access token ──┘
//!     └─────────────┘
//! ```

pub mod error;
pub mod google;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
