//! Static allow-list of actors permitted to publish

use std::collections::HashSet;

/// Telegram user IDs allowed to start a conversation
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    ids: HashSet<u64>,
}

impl AllowList {
    /// Create an allow-list from user IDs
    pub fn new(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Whether `actor_id` may use the bot
    pub fn is_authorized(&self, actor_id: u64) -> bool {
        self.ids.contains(&actor_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_is_authorized() {
        let gate = AllowList::new([111, 222]);
        assert!(gate.is_authorized(111));
        assert!(gate.is_authorized(222));
        assert_eq!(gate.len(), 2);
    }

    #[test]
    fn test_non_member_is_denied() {
        let gate = AllowList::new([111]);
        assert!(!gate.is_authorized(112));
        assert!(!gate.is_authorized(0));
    }

    #[test]
    fn test_empty_list_denies_everyone() {
        let gate = AllowList::default();
        assert!(gate.is_empty());
        assert!(!gate.is_authorized(111));
    }
}
