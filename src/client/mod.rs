//! The chat client: HTTP API calls plus cached conversation state
//! with optimistic send reconciliation.

pub mod api;
pub mod cache;

use crate::shared::wire::{MessageView, SendMessageRequest};

pub use api::{ChatApi, ClientError};
pub use cache::{ConversationKey, MessageCache};

/// High-level client tying the HTTP API to the message cache.
///
/// All cache mutations happen through `&mut self`, so a single client
/// is a single logical thread of execution: the narrow cache
/// operations keep concurrent fetch/send for one key safe on the
/// server side, and the cache merge keeps a late fetch from dropping
/// a still-pending provisional entry.
pub struct ChatClient {
    api: ChatApi,
    cache: MessageCache,
    username: Option<String>,
}

impl ChatClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            api: ChatApi::new(base_url),
            cache: MessageCache::new(),
            username: None,
        }
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ClientError> {
        let auth = self.api.login(username, password).await?;
        self.username = Some(auth.username);
        Ok(())
    }

    pub async fn signup(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        let auth = self.api.signup(username, email, password).await?;
        self.username = Some(auth.username);
        Ok(())
    }

    /// Forget the token and drop all cached conversation state.
    ///
    /// Client-side only: the server session stays valid until its TTL
    /// elapses.
    pub fn logout(&mut self) {
        self.api.clear_token();
        self.username = None;
        self.cache.clear_all();
    }

    /// Fetch a conversation, serving from the cache while it is fresh.
    pub async fn fetch_messages(
        &mut self,
        key: ConversationKey,
    ) -> Result<Vec<MessageView>, ClientError> {
        if let Some(cached) = self.cache.fresh_cached(key) {
            tracing::debug!("serving {key:?} from cache");
            return Ok(cached.to_vec());
        }

        let fetched = match key {
            ConversationKey::Room(room_id) => self.api.room_messages(room_id).await?,
            ConversationKey::User(user_id) => self.api.private_messages(user_id).await?,
        };
        self.cache.store_fetched(key, fetched);
        Ok(self.cache.cached(key).unwrap_or_default().to_vec())
    }

    /// Invalidate freshness for one key so the next fetch hits the
    /// server.
    pub fn force_refresh(&mut self, key: ConversationKey) {
        self.cache.force_refresh(key);
    }

    /// Optimistic send: append a provisional entry, call the server,
    /// then replace it in place on success or remove it on failure.
    pub async fn send_message(
        &mut self,
        key: ConversationKey,
        content: &str,
    ) -> Result<MessageView, ClientError> {
        let temp_id = self
            .cache
            .add_optimistic(key, content, self.username.clone());

        let request = match key {
            ConversationKey::Room(room_id) => SendMessageRequest {
                content: content.to_string(),
                room_id: Some(room_id),
                recipient_id: None,
            },
            ConversationKey::User(user_id) => SendMessageRequest {
                content: content.to_string(),
                room_id: None,
                recipient_id: Some(user_id),
            },
        };

        match self.api.send_message(&request).await {
            Ok(response) => {
                let confirmed = MessageView {
                    id: response.message_id.to_string(),
                    text: content.to_string(),
                    time: response.sent_at.format("%H:%M:%S").to_string(),
                    from_me: true,
                    sender_name: self.username.clone(),
                };
                self.cache.confirm_send(key, &temp_id, confirmed.clone());
                Ok(confirmed)
            }
            Err(e) => {
                self.cache.rollback_send(key, &temp_id);
                Err(e)
            }
        }
    }

    /// The cached list for a key, provisional entries included.
    pub fn cached_messages(&self, key: ConversationKey) -> &[MessageView] {
        self.cache.cached(key).unwrap_or_default()
    }
}
