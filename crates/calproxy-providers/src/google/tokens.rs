//! The token bundle kept per browser session.
//!
//! Expiry is an absolute epoch-millisecond timestamp computed when the
//! grant is received: issue time + `expires_in` × 1000. A bundle is reused
//! only while it is more than [`EXPIRY_MARGIN_MS`] away from that instant.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::oauth::TokenResponse;

/// Safety margin absorbing clock skew and request latency.
pub const EXPIRY_MARGIN_MS: i64 = 30_000;

/// Current time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Computes an absolute expiry from a declared lifetime in seconds.
///
/// A missing or negative lifetime yields an already-expired bundle. Huge
/// lifetimes saturate at `i64::MAX`.
pub fn expiry_from(issued_at_ms: i64, expires_in_secs: Option<i64>) -> i64 {
    let lifetime_ms = expires_in_secs.unwrap_or(0).max(0).saturating_mul(1000);
    issued_at_ms.saturating_add(lifetime_ms)
}

/// Access/refresh token pair with its expiry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBundle {
    /// Bearer credential for calendar calls.
    pub access_token: String,

    /// Absent when the user had already consented and the provider
    /// did not issue a new one.
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Access-token expiry in epoch milliseconds.
    #[serde(default)]
    pub expiry_date: Option<i64>,
}

impl TokenBundle {
    /// Builds a bundle from an authorization-code grant received at `now_ms`.
    pub fn from_grant(grant: TokenResponse, now_ms: i64) -> Self {
        Self {
            expiry_date: Some(expiry_from(now_ms, grant.expires_in)),
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
        }
    }

    /// Returns the access token if it can still be presented at `now_ms`.
    pub fn usable_access_token(&self, now_ms: i64) -> Option<&str> {
        let expiry = self.expiry_date?;
        if self.access_token.is_empty() || now_ms >= expiry.saturating_sub(EXPIRY_MARGIN_MS) {
            return None;
        }
        Some(&self.access_token)
    }

    /// Applies a refresh grant received at `now_ms`.
    ///
    /// The refresh token is kept: this provider does not rotate it.
    pub fn apply_refresh(&mut self, grant: TokenResponse, now_ms: i64) {
        self.expiry_date = Some(expiry_from(now_ms, grant.expires_in));
        self.access_token = grant.access_token;
    }

    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

// Tokens never reach logs.
impl std::fmt::Debug for TokenBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBundle")
            .field("access_token", &"<redacted>")
            .field("has_refresh_token", &self.has_refresh_token())
            .field("expiry_date", &self.expiry_date)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn grant(access: &str, refresh: Option<&str>, expires_in: Option<i64>) -> TokenResponse {
        TokenResponse {
            access_token: access.to_string(),
            refresh_token: refresh.map(String::from),
            expires_in,
            token_type: Some("Bearer".to_string()),
            scope: None,
        }
    }

    #[test]
    fn expiry_is_issue_time_plus_lifetime() {
        assert_eq!(expiry_from(NOW, Some(3600)), NOW + 3_600_000);
        assert_eq!(expiry_from(NOW, None), NOW);
    }

    #[test]
    fn huge_lifetime_saturates() {
        assert_eq!(expiry_from(NOW, Some(i64::MAX / 1000)), i64::MAX);
        assert_eq!(expiry_from(NOW, Some(i64::MAX)), i64::MAX);

        let bundle = TokenBundle::from_grant(grant("A", None, Some(i64::MAX / 1000)), NOW);
        assert_eq!(bundle.usable_access_token(NOW), Some("A"));
    }

    #[test]
    fn negative_lifetime_is_already_expired() {
        assert_eq!(expiry_from(NOW, Some(-60)), NOW);
        let bundle = TokenBundle::from_grant(grant("A", None, Some(-60)), NOW);
        assert_eq!(bundle.usable_access_token(NOW), None);
    }

    #[test]
    fn bundle_from_grant() {
        let bundle = TokenBundle::from_grant(grant("A", Some("R"), Some(3600)), NOW);
        assert_eq!(bundle.access_token, "A");
        assert_eq!(bundle.refresh_token.as_deref(), Some("R"));
        assert_eq!(bundle.expiry_date, Some(NOW + 3_600_000));
    }

    #[test]
    fn token_usable_outside_margin() {
        let bundle = TokenBundle::from_grant(grant("A", None, Some(31)), NOW);
        assert_eq!(bundle.usable_access_token(NOW), Some("A"));
    }

    #[test]
    fn token_unusable_inside_margin() {
        // expiry - now == margin exactly: not usable
        let bundle = TokenBundle::from_grant(grant("A", None, Some(30)), NOW);
        assert_eq!(bundle.usable_access_token(NOW), None);
        assert_eq!(bundle.usable_access_token(NOW - 1), Some("A"));
    }

    #[test]
    fn token_unusable_when_expired_or_missing_expiry() {
        let bundle = TokenBundle::from_grant(grant("A", None, Some(3600)), NOW);
        assert_eq!(bundle.usable_access_token(NOW + 3_600_000), None);

        let no_expiry = TokenBundle {
            access_token: "A".to_string(),
            refresh_token: None,
            expiry_date: None,
        };
        assert_eq!(no_expiry.usable_access_token(NOW), None);
    }

    #[test]
    fn empty_access_token_is_unusable() {
        let bundle = TokenBundle::from_grant(grant("", None, Some(3600)), NOW);
        assert_eq!(bundle.usable_access_token(NOW), None);
    }

    #[test]
    fn refresh_keeps_refresh_token() {
        let mut bundle = TokenBundle::from_grant(grant("A", Some("R"), Some(3600)), NOW);
        bundle.apply_refresh(grant("B", None, Some(1800)), NOW + 10);
        assert_eq!(bundle.access_token, "B");
        assert_eq!(bundle.refresh_token.as_deref(), Some("R"));
        assert_eq!(bundle.expiry_date, Some(NOW + 10 + 1_800_000));
    }

    #[test]
    fn debug_redacts_tokens() {
        let bundle = TokenBundle::from_grant(grant("secret-access", Some("secret-refresh"), None), NOW);
        let out = format!("{:?}", bundle);
        assert!(!out.contains("secret-access"));
        assert!(!out.contains("secret-refresh"));
    }

    #[test]
    fn serde_round_trip_keeps_missing_fields_optional() {
        let bundle: TokenBundle = serde_json::from_str(r#"{"access_token": "A"}"#).unwrap();
        assert!(bundle.refresh_token.is_none());
        assert!(bundle.expiry_date.is_none());
    }
}
