use std::collections::HashMap;
use std::sync::{Arc, PoisonError};
use std::time::Duration;

use docchat_core::Config;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::info;

use crate::state::SessionState;
use crate::SessionId;

/// A session behind its own lock; sessions never share a guard.
pub type SharedSession = Arc<Mutex<SessionState>>;

struct Entry {
    session: SharedSession,
    last_seen: std::sync::Mutex<Instant>,
}

impl Entry {
    fn new(session: SharedSession) -> Self {
        Self {
            session,
            last_seen: std::sync::Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) -> SharedSession {
        *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
        self.session.clone()
    }

    fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(*self.last_seen.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// In-memory sessions keyed by id. Every lookup refreshes the session's
/// last-seen time, which `evict_idle` compares against.
pub struct SessionStore {
    config: Arc<Config>,
    sessions: RwLock<HashMap<SessionId, Entry>>,
}

impl SessionStore {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Return the session for `id`, inserting a default one only if absent.
    /// The flag is true when this call created it.
    pub async fn initialize(&self, id: SessionId) -> (SharedSession, bool) {
        if let Some(existing) = self.sessions.read().await.get(&id) {
            return (existing.touch(), false);
        }

        let mut sessions = self.sessions.write().await;
        // Another request may have inserted it between the two locks.
        if let Some(existing) = sessions.get(&id) {
            return (existing.touch(), false);
        }
        let session = Arc::new(Mutex::new(SessionState::new(id, &self.config)));
        sessions.insert(id, Entry::new(session.clone()));
        info!(session = %id, "session initialized");
        (session, true)
    }

    pub async fn get(&self, id: SessionId) -> Option<SharedSession> {
        self.sessions.read().await.get(&id).map(Entry::touch)
    }

    /// Drop a session, blanking its keys first. Returns false if absent.
    pub async fn remove(&self, id: SessionId) -> bool {
        let removed = self.sessions.write().await.remove(&id);
        match removed {
            Some(entry) => {
                entry.session.lock().await.clear_secrets();
                info!(session = %id, "session removed");
                true
            }
            None => false,
        }
    }

    /// Drop every session not looked up within `max_idle`, blanking its
    /// keys. Returns how many were dropped.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let expired: Vec<(SessionId, SharedSession)> = {
            let mut sessions = self.sessions.write().await;
            let ids: Vec<SessionId> = sessions
                .iter()
                .filter(|(_, entry)| entry.idle_for(now) >= max_idle)
                .map(|(id, _)| *id)
                .collect();
            ids.into_iter()
                .filter_map(|id| sessions.remove(&id).map(|entry| (id, entry.session)))
                .collect()
        };

        for (id, session) in &expired {
            session.lock().await.clear_secrets();
            info!(session = %id, "idle session evicted");
        }
        expired.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docchat_core::Provider;
    use uuid::Uuid;

    fn store() -> SessionStore {
        SessionStore::new(Arc::new(Config::default()))
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let store = store();
        let id = Uuid::new_v4();

        let (first, created) = store.initialize(id).await;
        assert!(created);
        {
            let mut s = first.lock().await;
            s.chat_history.append_exchange("q", "a");
            s.pdf_processed = true;
        }

        let (second, created) = store.initialize(id).await;
        assert!(!created);
        assert!(Arc::ptr_eq(&first, &second));
        let s = second.lock().await;
        assert_eq!(s.chat_history.len(), 2);
        assert!(s.pdf_processed);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = store();
        let (a, _) = store.initialize(Uuid::new_v4()).await;
        let (b, _) = store.initialize(Uuid::new_v4()).await;
        a.lock().await.pdf_content = "only in a".into();
        assert_eq!(b.lock().await.pdf_content, "");
    }

    #[tokio::test]
    async fn remove_clears_secrets() {
        let store = store();
        let id = Uuid::new_v4();
        let (session, _) = store.initialize(id).await;
        session.lock().await.set_api_key(Provider::OpenAi, "sk-live");

        assert!(store.remove(id).await);
        assert!(store.get(id).await.is_none());
        // Outstanding handles see the blanked key.
        assert_eq!(session.lock().await.api_key(Provider::OpenAi), None);
        assert!(!store.remove(id).await);
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_sessions_are_evicted_with_their_keys() {
        let store = store();
        let (busy_id, stale_id) = (Uuid::new_v4(), Uuid::new_v4());
        store.initialize(busy_id).await;
        let (stale, _) = store.initialize(stale_id).await;
        stale.lock().await.set_api_key(Provider::Cohere, "co-live");

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(store.get(busy_id).await.is_some());
        tokio::time::advance(Duration::from_secs(40)).await;

        assert_eq!(store.evict_idle(Duration::from_secs(60)).await, 1);
        assert!(store.get(stale_id).await.is_none());
        assert!(store.get(busy_id).await.is_some());
        assert_eq!(stale.lock().await.api_key(Provider::Cohere), None);
    }

    #[tokio::test(start_paused = true)]
    async fn reinitialize_counts_as_activity() {
        let store = store();
        let id = Uuid::new_v4();
        store.initialize(id).await;
        tokio::time::advance(Duration::from_secs(50)).await;
        store.initialize(id).await;
        tokio::time::advance(Duration::from_secs(50)).await;
        assert_eq!(store.evict_idle(Duration::from_secs(60)).await, 0);
        assert_eq!(store.len().await, 1);
    }
}
