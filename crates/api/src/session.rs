//! In-memory store for wizard sessions.
//!
//! Each session sits behind its own mutex so one slow request (a payment in
//! flight) never blocks another visitor. Nothing is persisted; sessions live
//! until they finish, sit idle past the eviction window, or the process exits.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use juniordream_core::error::CoreError;
use juniordream_core::types::SessionId;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use uuid::Uuid;

/// Handle to a single stored session.
pub type SessionHandle<T> = Arc<Mutex<T>>;

/// A stored session and when it was last looked up.
struct StoredSession<T> {
    handle: SessionHandle<T>,
    last_seen: Instant,
}

pub struct SessionStore<T> {
    /// Entity name used in `NotFound` errors.
    entity: &'static str,
    sessions: RwLock<HashMap<SessionId, StoredSession<T>>>,
}

impl<T> SessionStore<T> {
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Store `value` under a fresh id.
    pub async fn insert(&self, value: T) -> (SessionId, SessionHandle<T>) {
        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(value));
        self.sessions.write().await.insert(
            id,
            StoredSession {
                handle: Arc::clone(&handle),
                last_seen: Instant::now(),
            },
        );
        (id, handle)
    }

    /// Look up a session and mark it as seen, or `NotFound`.
    pub async fn get(&self, id: SessionId) -> Result<SessionHandle<T>, CoreError> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions.get_mut(&id).ok_or(CoreError::NotFound {
            entity: self.entity,
            id,
        })?;
        stored.last_seen = Instant::now();
        Ok(Arc::clone(&stored.handle))
    }

    /// Drop a session. Handles already held stay usable.
    pub async fn remove(&self, id: SessionId) -> Option<SessionHandle<T>> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|stored| stored.handle)
    }

    /// Drop every session not seen for at least `max_idle`.
    ///
    /// Sessions whose handle is still held elsewhere (a request or a backend
    /// call in flight) are kept. Returns the number evicted.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, stored| {
            Arc::strong_count(&stored.handle) > 1 || stored.last_seen.elapsed() < max_idle
        });
        before - sessions.len()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn insert_get_remove() {
        let store: SessionStore<u32> = SessionStore::new("Counter");
        assert!(store.is_empty().await);

        let (id, handle) = store.insert(7).await;
        *handle.lock().await += 1;
        assert_eq!(*store.get(id).await.unwrap().lock().await, 8);
        assert_eq!(store.len().await, 1);

        assert!(store.remove(id).await.is_some());
        assert_matches!(
            store.get(id).await,
            Err(CoreError::NotFound { entity: "Counter", .. })
        );
        assert_eq!(*handle.lock().await, 8);
    }

    #[tokio::test(start_paused = true)]
    async fn evicts_only_idle_sessions() {
        let store: SessionStore<u32> = SessionStore::new("Counter");
        let (stale, _) = store.insert(1).await;
        let (fresh, _) = store.insert(2).await;

        tokio::time::advance(Duration::from_secs(50)).await;
        store.get(fresh).await.unwrap();
        tokio::time::advance(Duration::from_secs(20)).await;

        assert_eq!(store.evict_idle(Duration::from_secs(60)).await, 1);
        assert_matches!(store.get(stale).await, Err(CoreError::NotFound { .. }));
        assert!(store.get(fresh).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_sessions_still_in_use() {
        let store: SessionStore<u32> = SessionStore::new("Counter");
        let (id, held) = store.insert(1).await;

        tokio::time::advance(Duration::from_secs(120)).await;
        assert_eq!(store.evict_idle(Duration::from_secs(60)).await, 0);

        drop(held);
        assert_eq!(store.evict_idle(Duration::from_secs(60)).await, 1);
        assert!(store.is_empty().await);
        assert_matches!(store.get(id).await, Err(CoreError::NotFound { .. }));
    }
}
