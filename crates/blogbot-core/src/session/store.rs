//! In-memory session store
//!
//! Thread-safe session storage using DashMap, with idle expiry.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::time::interval;
use tracing::{debug, info};

use super::types::{ConversationKey, Session};

/// In-memory store of unfinished conversations
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<ConversationKey, Session>>,
    ttl: chrono::Duration,
}

impl SessionStore {
    /// Create a store whose sessions expire after `ttl_secs` of inactivity
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl: chrono::Duration::seconds(ttl_secs.min(u64::from(u32::MAX)) as i64),
        }
    }

    /// Get a session if it exists and has not expired
    pub fn get(&self, key: &ConversationKey) -> Option<Session> {
        let session = self.sessions.get(key).map(|s| s.clone())?;
        if session.is_expired(Utc::now(), self.ttl) {
            self.sessions.remove(key);
            debug!("Dropped expired session on lookup: {}", key);
            return None;
        }
        Some(session)
    }

    /// Insert or replace a session
    pub fn set(&self, session: Session) {
        self.sessions.insert(session.key, session);
    }

    /// Remove a session entirely
    pub fn remove(&self, key: &ConversationKey) -> Option<Session> {
        self.sessions.remove(key).map(|(_, s)| s)
    }

    /// Get session count
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Remove every session idle longer than the TTL at `now`
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| !session.is_expired(now, self.ttl));
        before.saturating_sub(self.sessions.len())
    }

    /// Start a background task that sweeps expired sessions every `every`
    pub fn spawn_sweeper(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = interval(every);
            loop {
                interval.tick().await;
                let removed = store.sweep_expired(Utc::now());
                if removed > 0 {
                    info!("Cleaned up {} expired session(s)", removed);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::DialogueState;

    fn key(chat_id: i64) -> ConversationKey {
        ConversationKey::new(chat_id, chat_id as u64)
    }

    #[test]
    fn test_set_and_get() {
        let store = SessionStore::new(3600);
        assert!(store.is_empty());

        store.set(Session::new(key(1), DialogueState::TitleInput));
        let session = store.get(&key(1)).unwrap();
        assert_eq!(session.state, DialogueState::TitleInput);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_conversations_are_isolated() {
        let store = SessionStore::new(3600);
        store.set(Session::new(
            key(1),
            DialogueState::BodyInput {
                title: "first".to_string(),
            },
        ));
        store.set(Session::new(key(2), DialogueState::GenerateInput));

        assert_eq!(
            store.get(&key(1)).unwrap().state,
            DialogueState::BodyInput {
                title: "first".to_string()
            }
        );
        assert_eq!(store.get(&key(2)).unwrap().state, DialogueState::GenerateInput);
        assert!(store.get(&ConversationKey::new(1, 2)).is_none());
    }

    #[test]
    fn test_remove_session() {
        let store = SessionStore::new(3600);
        store.set(Session::new(key(1), DialogueState::SelectMode));

        let removed = store.remove(&key(1));
        assert!(removed.is_some());
        assert!(store.get(&key(1)).is_none());
        assert!(store.remove(&key(1)).is_none());
    }

    #[test]
    fn test_sweep_expired() {
        let store = SessionStore::new(60);
        store.set(Session::new(key(1), DialogueState::SelectMode));

        let mut stale = Session::new(key(2), DialogueState::TitleInput);
        stale.updated_at = Utc::now() - chrono::Duration::seconds(120);
        store.set(stale);

        assert_eq!(store.sweep_expired(Utc::now()), 1);
        assert!(store.get(&key(1)).is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_expired_session_is_absent_on_get() {
        let store = SessionStore::new(60);
        let mut stale = Session::new(key(3), DialogueState::GenerateInput);
        stale.updated_at = Utc::now() - chrono::Duration::seconds(61);
        store.set(stale);

        assert!(store.get(&key(3)).is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_sweeper_task_removes_expired() {
        let store = SessionStore::new(0);
        let mut stale = Session::new(key(4), DialogueState::TitleInput);
        stale.updated_at = Utc::now() - chrono::Duration::seconds(5);
        store.set(stale);

        let handle = store.spawn_sweeper(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        assert!(store.is_empty());
    }
}
