//! Server-side sessions.
//!
//! A session is looked up by an opaque random identifier carried in the
//! signed session cookie. It holds the pending sign-in nonce and, once the
//! user has consented, the provider token bundle.
//!
//! [`SessionStore`] is the storage seam; [`MemorySessionStore`] keeps
//! sessions in process memory and forgets them after an idle TTL.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use calproxy_providers::google::TokenBundle;
use rand::Rng as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, trace};

/// A boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

const SESSION_ID_BYTES: usize = 32;

/// Per-browser session data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Single-use nonce for the sign-in in flight.
    pub state: Option<String>,
    pub tokens: Option<TokenBundle>,
}

impl Session {
    /// Removes and returns the pending nonce.
    pub fn take_state(&mut self) -> Option<String> {
        self.state.take()
    }
}

/// Opaque session identifier.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let mut bytes = [0u8; SESSION_ID_BYTES];
        rng.fill(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// Session ids are bearer credentials; log only a prefix.
impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "SessionId({}…)", prefix)
    }
}

/// Error from a session backend.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session backend failure: {0}")]
    Backend(String),
}

/// Session persistence.
///
/// Handlers load a session, mutate it, and save it back. Saving a session
/// is what brings it into existence.
pub trait SessionStore: Send + Sync + 'static {
    fn load<'a>(&'a self, id: &'a SessionId)
    -> BoxFuture<'a, Result<Option<Session>, SessionError>>;

    fn save<'a>(&'a self, id: &'a SessionId, session: Session)
    -> BoxFuture<'a, Result<(), SessionError>>;

    fn destroy<'a>(&'a self, id: &'a SessionId) -> BoxFuture<'a, Result<(), SessionError>>;
}

#[derive(Debug)]
struct Entry {
    session: Session,
    touched_at: Instant,
}

impl Entry {
    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.touched_at) >= ttl
    }
}

/// In-memory session store with an idle TTL.
///
/// Expired entries are purged lazily: on lookup of that entry, and across
/// the whole map on every save.
#[derive(Debug)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<SessionId, Entry>>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Number of stored sessions, expired ones included until purged.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn load<'a>(
        &'a self,
        id: &'a SessionId,
    ) -> BoxFuture<'a, Result<Option<Session>, SessionError>> {
        Box::pin(async move {
            let now = Instant::now();
            let mut entries = self.entries.write().await;

            match entries.get_mut(id) {
                Some(entry) if entry.is_expired(self.ttl, now) => {
                    debug!(?id, "session expired");
                    entries.remove(id);
                    Ok(None)
                }
                Some(entry) => {
                    entry.touched_at = now;
                    Ok(Some(entry.session.clone()))
                }
                None => Ok(None),
            }
        })
    }

    fn save<'a>(
        &'a self,
        id: &'a SessionId,
        session: Session,
    ) -> BoxFuture<'a, Result<(), SessionError>> {
        Box::pin(async move {
            let now = Instant::now();
            let mut entries = self.entries.write().await;

            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired(self.ttl, now));
            let purged = before - entries.len();
            if purged > 0 {
                trace!(purged, "purged expired sessions");
            }

            entries.insert(
                id.clone(),
                Entry {
                    session,
                    touched_at: now,
                },
            );
            Ok(())
        })
    }

    fn destroy<'a>(&'a self, id: &'a SessionId) -> BoxFuture<'a, Result<(), SessionError>> {
        Box::pin(async move {
            self.entries.write().await.remove(id);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_state(state: &str) -> Session {
        Session {
            state: Some(state.to_string()),
            tokens: None,
        }
    }

    #[test]
    fn session_ids_are_unique() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 43);
    }

    #[test]
    fn debug_hides_full_session_id() {
        let id = SessionId::from("abcdefghijklmnop".to_string());
        assert_eq!(format!("{:?}", id), "SessionId(abcdef…)");
    }

    #[test]
    fn take_state_clears_nonce() {
        let mut session = session_with_state("abc123");
        assert_eq!(session.take_state().as_deref(), Some("abc123"));
        assert!(session.state.is_none());
    }

    #[tokio::test]
    async fn save_load_destroy() {
        let store = MemorySessionStore::new(Duration::from_secs(60));
        let id = SessionId::generate();

        assert!(store.load(&id).await.unwrap().is_none());

        store.save(&id, session_with_state("n1")).await.unwrap();
        let loaded = store.load(&id).await.unwrap().unwrap();
        assert_eq!(loaded.state.as_deref(), Some("n1"));

        store.destroy(&id).await.unwrap();
        assert!(store.load(&id).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_sessions_expire() {
        let store = MemorySessionStore::new(Duration::from_secs(60));
        let id = SessionId::generate();
        store.save(&id, Session::default()).await.unwrap();

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(store.load(&id).await.unwrap().is_some());

        // The load above renewed the idle timer.
        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(store.load(&id).await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(store.load(&id).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn save_purges_other_expired_sessions() {
        let store = MemorySessionStore::new(Duration::from_secs(10));
        let stale = SessionId::generate();
        store.save(&stale, Session::default()).await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;
        let fresh = SessionId::generate();
        store.save(&fresh, Session::default()).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert!(store.load(&fresh).await.unwrap().is_some());
    }
}
