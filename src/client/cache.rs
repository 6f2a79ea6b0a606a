//! Per-conversation message cache with optimistic-send reconciliation.
//!
//! Pure state, no I/O: the surrounding client decides when to hit the
//! network. Each conversation key maps to an ordered message list and
//! a last-fetch timestamp; lists survive switching conversations and
//! are only dropped by `clear_all` (logout).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::Local;

use crate::shared::wire::MessageView;

/// How long a fetched list counts as fresh.
pub const CACHE_DURATION: Duration = Duration::from_secs(5 * 60);

const TEMP_ID_PREFIX: &str = "tmp-";

/// Client-side address of a conversation: a room, or the counterpart
/// user of a private exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversationKey {
    Room(i64),
    User(i64),
}

#[derive(Default)]
struct Conversation {
    messages: Vec<MessageView>,
    last_fetch: Option<Instant>,
}

pub struct MessageCache {
    conversations: HashMap<ConversationKey, Conversation>,
    freshness: Duration,
    /// Monotonic counter for provisional ids; never reused within the
    /// cache's lifetime, so two rapid sends cannot collide.
    next_temp_id: u64,
}

impl MessageCache {
    pub fn new() -> Self {
        Self::with_freshness(CACHE_DURATION)
    }

    pub fn with_freshness(freshness: Duration) -> Self {
        Self {
            conversations: HashMap::new(),
            freshness,
            next_temp_id: 0,
        }
    }

    fn is_provisional(id: &str) -> bool {
        id.starts_with(TEMP_ID_PREFIX)
    }

    /// The cached list for a key, if one exists (fresh or not).
    pub fn cached(&self, key: ConversationKey) -> Option<&[MessageView]> {
        self.conversations
            .get(&key)
            .map(|c| c.messages.as_slice())
    }

    /// The cached list, but only while within the freshness window.
    pub fn fresh_cached(&self, key: ConversationKey) -> Option<&[MessageView]> {
        let conversation = self.conversations.get(&key)?;
        let fetched_at = conversation.last_fetch?;
        if fetched_at.elapsed() < self.freshness {
            Some(conversation.messages.as_slice())
        } else {
            None
        }
    }

    /// Replace a key's list with a server fetch and stamp freshness.
    ///
    /// Provisional entries still awaiting reconciliation are carried
    /// over rather than dropped, so a fetch that completes between an
    /// optimistic append and its confirmation cannot lose the entry.
    pub fn store_fetched(&mut self, key: ConversationKey, fetched: Vec<MessageView>) {
        let conversation = self.conversations.entry(key).or_default();
        let pending: Vec<MessageView> = conversation
            .messages
            .iter()
            .filter(|m| Self::is_provisional(&m.id))
            .cloned()
            .collect();
        conversation.messages = fetched;
        conversation.messages.extend(pending);
        conversation.last_fetch = Some(Instant::now());
    }

    /// Append a provisional entry for a locally-authored message and
    /// return its temporary id. The entry renders immediately, before
    /// any network call.
    pub fn add_optimistic(
        &mut self,
        key: ConversationKey,
        text: &str,
        sender_name: Option<String>,
    ) -> String {
        let temp_id = format!("{TEMP_ID_PREFIX}{}", self.next_temp_id);
        self.next_temp_id += 1;

        self.conversations
            .entry(key)
            .or_default()
            .messages
            .push(MessageView {
                id: temp_id.clone(),
                text: text.to_string(),
                time: Local::now().format("%H:%M:%S").to_string(),
                from_me: true,
                sender_name,
            });
        temp_id
    }

    /// Replace the provisional entry in place with the server-confirmed
    /// one. Position is preserved, not re-sorted. A miss (e.g. the list
    /// was cleared meanwhile) is a no-op.
    pub fn confirm_send(&mut self, key: ConversationKey, temp_id: &str, confirmed: MessageView) {
        if let Some(conversation) = self.conversations.get_mut(&key) {
            if let Some(entry) = conversation.messages.iter_mut().find(|m| m.id == temp_id) {
                *entry = confirmed;
            }
        }
    }

    /// Remove the provisional entry after a failed send, leaving the
    /// list as if the send never happened.
    pub fn rollback_send(&mut self, key: ConversationKey, temp_id: &str) {
        if let Some(conversation) = self.conversations.get_mut(&key) {
            conversation.messages.retain(|m| m.id != temp_id);
        }
    }

    /// Drop the freshness stamp for one key so the next fetch bypasses
    /// the cache. The cached list itself is kept.
    pub fn force_refresh(&mut self, key: ConversationKey) {
        if let Some(conversation) = self.conversations.get_mut(&key) {
            conversation.last_fetch = None;
        }
    }

    /// Drop all cached lists and freshness stamps (logout).
    pub fn clear_all(&mut self) {
        self.conversations.clear();
    }
}

impl Default for MessageCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const KEY: ConversationKey = ConversationKey::Room(7);

    fn server_message(id: &str, text: &str) -> MessageView {
        MessageView {
            id: id.to_string(),
            text: text.to_string(),
            time: "12:00:00".to_string(),
            from_me: false,
            sender_name: Some("bob".to_string()),
        }
    }

    #[test]
    fn optimistic_send_success_leaves_exactly_the_confirmed_entry() {
        let mut cache = MessageCache::new();
        let temp_id = cache.add_optimistic(KEY, "hi", Some("alice".into()));

        let mut confirmed = server_message("42", "hi");
        confirmed.from_me = true;
        cache.confirm_send(KEY, &temp_id, confirmed);

        let messages = cache.cached(KEY).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, "42");
    }

    #[test]
    fn optimistic_send_failure_leaves_the_cache_empty() {
        let mut cache = MessageCache::new();
        let temp_id = cache.add_optimistic(KEY, "hi", None);
        cache.rollback_send(KEY, &temp_id);
        assert!(cache.cached(KEY).unwrap().is_empty());
    }

    #[test]
    fn confirm_preserves_position_among_other_messages() {
        let mut cache = MessageCache::new();
        cache.store_fetched(KEY, vec![server_message("1", "first")]);
        let temp_id = cache.add_optimistic(KEY, "mine", None);
        cache.store_fetched(
            KEY,
            vec![server_message("1", "first"), server_message("2", "second")],
        );

        cache.confirm_send(KEY, &temp_id, server_message("3", "mine"));
        let ids: Vec<&str> = cache
            .cached(KEY)
            .unwrap()
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn fetch_completing_after_append_keeps_the_provisional_entry() {
        let mut cache = MessageCache::new();
        let temp_id = cache.add_optimistic(KEY, "pending", None);
        // A stale fetch lands before the send is reconciled.
        cache.store_fetched(KEY, vec![server_message("1", "old")]);

        let ids: Vec<&str> = cache
            .cached(KEY)
            .unwrap()
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", temp_id.as_str()]);
    }

    #[test]
    fn temp_ids_never_collide() {
        let mut cache = MessageCache::new();
        let a = cache.add_optimistic(KEY, "one", None);
        let b = cache.add_optimistic(KEY, "two", None);
        assert_ne!(a, b);
    }

    #[test]
    fn fresh_list_is_served_until_the_window_elapses() {
        let mut cache = MessageCache::new();
        cache.store_fetched(KEY, vec![server_message("1", "hello")]);
        assert!(cache.fresh_cached(KEY).is_some());

        let mut stale = MessageCache::with_freshness(Duration::ZERO);
        stale.store_fetched(KEY, vec![server_message("1", "hello")]);
        assert!(stale.fresh_cached(KEY).is_none());
        // The list itself is still there, just no longer fresh.
        assert_eq!(stale.cached(KEY).unwrap().len(), 1);
    }

    #[test]
    fn force_refresh_invalidates_freshness_but_keeps_the_list() {
        let mut cache = MessageCache::new();
        cache.store_fetched(KEY, vec![server_message("1", "hello")]);
        cache.force_refresh(KEY);
        assert!(cache.fresh_cached(KEY).is_none());
        assert_eq!(cache.cached(KEY).unwrap().len(), 1);
    }

    #[test]
    fn switching_keys_never_clears_other_lists() {
        let mut cache = MessageCache::new();
        cache.store_fetched(KEY, vec![server_message("1", "room")]);
        let other = ConversationKey::User(2);
        cache.store_fetched(other, vec![server_message("2", "private")]);

        assert_eq!(cache.cached(KEY).unwrap().len(), 1);
        assert_eq!(cache.cached(other).unwrap().len(), 1);
    }

    #[test]
    fn clear_all_drops_everything() {
        let mut cache = MessageCache::new();
        cache.store_fetched(KEY, vec![server_message("1", "room")]);
        cache.add_optimistic(ConversationKey::User(2), "pending", None);
        cache.clear_all();
        assert!(cache.cached(KEY).is_none());
        assert!(cache.cached(ConversationKey::User(2)).is_none());
    }
}
