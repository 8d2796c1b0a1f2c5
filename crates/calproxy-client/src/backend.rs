//! HTTP client for the calproxy backend.
//!
//! Requests carry the browser's session cookie, so the CLI acts on the
//! same server-side session as the web frontend.

use std::time::Duration;

use calproxy_core::EventList;
use reqwest::header::COOKIE;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Backend address used when none is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:4000";

/// Name of the backend's session cookie.
pub const SESSION_COOKIE: &str = "calproxy.sid";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct OkBody {
    ok: bool,
}

/// Client for the backend's JSON API.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base: Url,
    session: Option<String>,
}

impl BackendClient {
    pub fn new(base: Url, timeout: Duration) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("calproxy-cli/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base,
            session: None,
        })
    }

    /// Sets the session cookie value (as stored by the browser).
    pub fn with_session(mut self, cookie_value: impl Into<String>) -> Self {
        self.session = Some(cookie_value.into()).filter(|v: &String| !v.is_empty());
        self
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Where a browser should go to sign in.
    pub fn login_url(&self) -> ClientResult<Url> {
        self.endpoint("/api/auth/google")
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base
            .join(path)
            .map_err(|e| ClientError::Config(format!("invalid backend URL: {}", e)))
    }

    fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        debug!(%method, %url, "backend request");

        let mut request = self.http.request(method, url);
        if let Some(session) = &self.session {
            request = request.header(COOKIE, format!("{}={}", SESSION_COOKIE, session));
        }
        Ok(request)
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await.map_err(ClientError::from_transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);

        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::AuthRequired(message));
        }
        Err(ClientError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    /// Fetches upcoming events.
    pub async fn events(&self) -> ClientResult<EventList> {
        let response = self
            .send(self.request(Method::GET, "/api/calendar/events")?)
            .await?;
        let body = response
            .text()
            .await
            .map_err(ClientError::from_transport)?;
        EventList::from_json(&body)
            .map_err(|e| ClientError::InvalidResponse(format!("events listing: {}", e)))
    }

    /// Ends the backend session.
    pub async fn logout(&self) -> ClientResult<()> {
        let response = self
            .send(self.request(Method::POST, "/api/auth/logout")?)
            .await?;
        expect_ok(response).await
    }

    /// Checks that the backend is up.
    pub async fn health(&self) -> ClientResult<()> {
        let response = self.send(self.request(Method::GET, "/api/health")?).await?;
        expect_ok(response).await
    }
}

async fn expect_ok(response: Response) -> ClientResult<()> {
    let body: OkBody = response
        .json()
        .await
        .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
    if !body.ok {
        return Err(ClientError::InvalidResponse("backend reported ok=false".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> BackendClient {
        BackendClient::new(Url::parse(&server.uri()).unwrap(), Duration::from_secs(2))
            .unwrap()
            .with_session("s1.sig")
    }

    #[test]
    fn login_url_joins_base() {
        let client = BackendClient::new(
            Url::parse(DEFAULT_BACKEND_URL).unwrap(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            client.login_url().unwrap().as_str(),
            "http://localhost:4000/api/auth/google"
        );
    }

    #[test]
    fn empty_session_is_ignored() {
        let client = BackendClient::new(
            Url::parse(DEFAULT_BACKEND_URL).unwrap(),
            Duration::from_secs(1),
        )
        .unwrap()
        .with_session("");
        assert!(!client.has_session());
    }

    #[tokio::test]
    async fn events_sends_session_cookie_and_parses_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/calendar/events"))
            .and(header("cookie", "calproxy.sid=s1.sig"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"kind":"calendar#events","items":[
                    {"id":"e1","summary":"Standup","status":"confirmed",
                     "start":{"dateTime":"2026-03-02T09:00:00Z"},
                     "end":{"dateTime":"2026-03-02T09:15:00Z"}}]}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let list = client_for(&server).events().await.unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].summary, "Standup");
        assert!(list.items[0].is_confirmed());
    }

    #[tokio::test]
    async fn unauthenticated_maps_to_auth_required() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/calendar/events"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string(r#"{"error":"not authenticated"}"#),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).events().await.unwrap_err();
        assert!(matches!(err, ClientError::AuthRequired(ref m) if m == "not authenticated"));
    }

    #[tokio::test]
    async fn server_failure_maps_to_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/calendar/events"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_string(r#"{"error":"failed to fetch events"}"#),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).events().await.unwrap_err();
        assert!(matches!(err, ClientError::Backend { status: 500, .. }));
        assert_eq!(
            err.to_string(),
            "backend error (HTTP 500): failed to fetch events"
        );
    }

    #[tokio::test]
    async fn logout_and_health_expect_ok() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/logout"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.logout().await.unwrap();
        client.health().await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_backend_is_connection_error() {
        let client = BackendClient::new(
            Url::parse("http://127.0.0.1:1").unwrap(),
            Duration::from_secs(2),
        )
        .unwrap();
        let err = client.health().await.unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));
    }
}
