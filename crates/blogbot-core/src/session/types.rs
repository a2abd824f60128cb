//! Session types

use chrono::{DateTime, Duration, Utc};
use std::fmt;

use crate::dialogue::DialogueState;

/// Identity of one conversation: a user talking in a chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub chat_id: i64,
    pub user_id: u64,
}

impl ConversationKey {
    pub fn new(chat_id: i64, user_id: u64) -> Self {
        Self { chat_id, user_id }
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chat={} user={}", self.chat_id, self.user_id)
    }
}

/// An unfinished conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Conversation this session belongs to
    pub key: ConversationKey,
    /// Current dialogue state, carrying the fields collected so far
    pub state: DialogueState,
    /// Session creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session for a conversation
    pub fn new(key: ConversationKey, state: DialogueState) -> Self {
        let now = Utc::now();
        Self {
            key,
            state,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `state` and refresh the idle timer
    pub fn advance(&mut self, state: DialogueState) {
        self.state = state;
        self.updated_at = Utc::now();
    }

    /// Whether the session has been idle longer than `ttl` at `now`
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.updated_at > ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let key = ConversationKey::new(10, 20);
        let session = Session::new(key, DialogueState::TitleInput);
        assert_eq!(session.key, key);
        assert_eq!(session.state, DialogueState::TitleInput);
        assert_eq!(session.created_at, session.updated_at);
    }

    #[test]
    fn test_advance_updates_timestamp() {
        let mut session = Session::new(ConversationKey::new(1, 1), DialogueState::TitleInput);
        let before = session.updated_at;
        session.advance(DialogueState::BodyInput {
            title: "Hello".to_string(),
        });
        assert!(session.updated_at >= before);
        assert!(matches!(session.state, DialogueState::BodyInput { .. }));
    }

    #[test]
    fn test_is_expired() {
        let session = Session::new(ConversationKey::new(1, 1), DialogueState::SelectMode);
        let ttl = Duration::seconds(60);
        assert!(!session.is_expired(session.updated_at + Duration::seconds(30), ttl));
        assert!(session.is_expired(session.updated_at + Duration::seconds(61), ttl));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(ConversationKey::new(-100, 7).to_string(), "chat=-100 user=7");
    }
}
