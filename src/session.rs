// src/session.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::{OwnedMutexGuard, RwLock};

use crate::models::session::SessionState;

/// Opaque session identifier, injected into request extensions by the
/// session middleware.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Key-value storage for per-session quiz progress.
///
/// A session id with no stored state is not logged in.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, id: &SessionId) -> Option<SessionState>;

    /// Stores `state`, replacing anything previously kept for `id`.
    async fn put(&self, id: &SessionId, state: SessionState);

    async fn clear(&self, id: &SessionId);

    /// Drops expired entries, returning how many were removed.
    async fn purge_expired(&self) -> usize;

    /// A session is logged in iff it holds a state (and therefore a username).
    async fn is_authenticated(&self, id: &SessionId) -> bool {
        self.get(id).await.is_some()
    }
}

struct Entry {
    state: SessionState,
    expires_at: DateTime<Utc>,
}

/// Process-local session store with a sliding expiry.
/// Every successful `get` or `put` pushes the entry's expiry `ttl` into the
/// future, matching the session cookie that is re-issued on every response.
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

    pub fn with_ttl_secs(secs: u64) -> Self {
        let ttl = i64::try_from(secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        Self::new(ttl)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    #[cfg(test)]
    async fn expires_at(&self, id: &SessionId) -> Option<DateTime<Utc>> {
        self.entries.read().await.get(id).map(|entry| entry.expires_at)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, id: &SessionId) -> Option<SessionState> {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(id).filter(|entry| entry.expires_at > now)?;
        entry.expires_at = self.expiry_from(now);
        Some(entry.state.clone())
    }

    async fn put(&self, id: &SessionId, state: SessionState) {
        let expires_at = self.expiry_from(Utc::now());
        self.entries
            .write()
            .await
            .insert(id.clone(), Entry { state, expires_at });
    }

    async fn clear(&self, id: &SessionId) {
        self.entries.write().await.remove(id);
    }

    async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }
}

/// One async mutex per session id.
///
/// The session middleware holds the guard for the whole request, so the
/// get / mutate / put sequence of a handler never interleaves with another
/// request on the same session.
#[derive(Default)]
pub struct SessionLocks {
    locks: Mutex<HashMap<SessionId, Arc<tokio::sync::Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, id: &SessionId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks.entry(id.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Forgets locks nobody is holding or waiting on.
    pub fn prune(&self) -> usize {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        let before = locks.len();
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - locks.len()
    }
}

/// Background task: periodically evicts expired sessions and idle locks.
pub async fn purge_loop(
    store: Arc<dyn SessionStore>,
    locks: Arc<SessionLocks>,
    every: std::time::Duration,
) {
    let mut interval = tokio::time::interval(every);
    loop {
        interval.tick().await;
        let sessions = store.purge_expired().await;
        let idle_locks = locks.prune();
        if sessions > 0 {
            tracing::debug!(
                "Purged {} expired sessions and {} idle locks",
                sessions,
                idle_locks
            );
        }
    }
}
