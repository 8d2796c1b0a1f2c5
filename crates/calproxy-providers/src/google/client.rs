//! Google Calendar API client.
//!
//! Listing results are passed back as the raw response body so callers can
//! forward Google's payload unchanged.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, warn};

use crate::error::{ProviderError, ProviderResult};

use super::config::GoogleConfig;

/// Default page size for upcoming-events listings.
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Query parameters for an events listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Lower bound on event end time.
    pub time_min: DateTime<Utc>,
    pub max_results: u32,
    /// Expand recurring events into instances.
    pub single_events: bool,
    pub order_by_start_time: bool,
}

impl ListQuery {
    /// The next [`DEFAULT_MAX_RESULTS`] events starting from `now`, ordered by
    /// start time with recurrences expanded.
    pub fn upcoming(now: DateTime<Utc>) -> Self {
        Self {
            time_min: now,
            max_results: DEFAULT_MAX_RESULTS,
            single_events: true,
            order_by_start_time: true,
        }
    }

    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("maxResults", self.max_results.to_string()),
            ("singleEvents", self.single_events.to_string()),
            (
                "timeMin",
                self.time_min.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
        ];
        // Google rejects orderBy=startTime unless singleEvents is set.
        if self.order_by_start_time && self.single_events {
            params.push(("orderBy", "startTime".to_string()));
        }
        params
    }
}

/// Google Calendar API client.
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    api_base: String,
    calendar_id: String,
}

impl GoogleCalendarClient {
    pub fn new(config: &GoogleConfig) -> ProviderResult<Self> {
        config.validate().map_err(ProviderError::configuration)?;

        Ok(Self {
            http_client: config.http_client()?,
            api_base: config.endpoints.calendar_api.trim_end_matches('/').to_string(),
            calendar_id: config.calendar_id.clone(),
        })
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.api_base,
            urlencoding::encode(&self.calendar_id)
        )
    }

    /// Lists events and returns the response body verbatim.
    ///
    /// The body is checked to be JSON but not otherwise interpreted.
    pub async fn list_events(
        &self,
        access_token: &str,
        query: &ListQuery,
    ) -> ProviderResult<String> {
        let url = self.events_url();
        debug!(calendar = %self.calendar_id, max_results = query.max_results, "listing events");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(access_token)
            .query(&query.to_params())
            .send()
            .await
            .map_err(|e| ProviderError::from_transport("events list", e))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            warn!(?retry_after, "calendar API rate limit");
            return Err(ProviderError::rate_limited(format!(
                "rate limit exceeded{}",
                retry_after
                    .map(|s| format!(", retry after {} seconds", s))
                    .unwrap_or_default()
            ))
            .with_status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| {
            ProviderError::network(format!("events list: failed to read response: {}", e))
        })?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::authentication(format!(
                "access token rejected: {}",
                body
            ))
            .with_status(status.as_u16()));
        }

        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(ProviderError::authorization(format!(
                "access denied to calendar {}: {}",
                self.calendar_id, body
            ))
            .with_status(status.as_u16()));
        }

        if !status.is_success() {
            return Err(ProviderError::server(format!(
                "calendar API error {}: {}",
                status, body
            ))
            .with_status(status.as_u16()));
        }

        serde_json::from_str::<serde::de::IgnoredAny>(&body).map_err(|e| {
            ProviderError::invalid_response(format!("events list is not JSON: {}", e))
                .with_source(e)
        })?;

        Ok(body)
    }
}
