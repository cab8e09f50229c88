use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    #[serde(with = "time::serde::iso8601")]
    pub created: OffsetDateTime,
    #[serde(with = "time::serde::iso8601")]
    pub expires: OffsetDateTime,
}

impl Session {
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now >= self.expires
    }
}

/// Admin sessions keyed by an opaque token.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, ttl: Duration) -> Session;

    /// The session behind `token` if it exists and has not expired.
    async fn validate(&self, token: &str) -> Option<Session>;

    /// `true` if a session was removed.
    async fn delete(&self, token: &str) -> bool;

    /// Removes expired sessions, returning how many were dropped.
    async fn sweep_expired(&self) -> usize;
}

#[derive(Default, Debug)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, ttl: Duration) -> Session {
        let created = OffsetDateTime::now_utc();
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            created,
            expires: created + ttl,
        };

        self.sessions.write().insert(session.token.clone(), session.clone());
        debug!(expires = %session.expires, "session created");
        session
    }

    async fn validate(&self, token: &str) -> Option<Session> {
        let now = OffsetDateTime::now_utc();
        self.sessions
            .read()
            .get(token)
            .filter(|session| !session.is_expired_at(now))
            .cloned()
    }

    async fn delete(&self, token: &str) -> bool {
        self.sessions.write().remove(token).is_some()
    }

    async fn sweep_expired(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        let removed = before - sessions.len();
        if removed > 0 {
            debug!(removed, "expired sessions swept");
        }
        removed
    }
}
