//! ChatClient integration tests: cache freshness and the optimistic
//! send protocol against a live server.

mod common;

use common::{seed_room, signup, spawn_app};
use ubchat::client::{ChatClient, ClientError, ConversationKey};

#[tokio::test]
async fn optimistic_send_ends_with_the_server_assigned_id() {
    let app = spawn_app().await;
    let bob = signup(&app, "bob").await;

    let mut alice = ChatClient::new(&app.base_url);
    alice.signup("alice", "alice@example.com", "password123").await.unwrap();

    let key = ConversationKey::User(bob.id);
    let confirmed = alice.send_message(key, "hi").await.unwrap();

    let cached = alice.cached_messages(key);
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].id, confirmed.id);
    assert!(!cached[0].id.starts_with("tmp-"));
    assert!(cached[0].from_me);
}

#[tokio::test]
async fn failed_send_leaves_no_trace_in_the_cache() {
    let app = spawn_app().await;
    let bob = signup(&app, "bob").await;

    let mut alice = ChatClient::new(&app.base_url);
    alice.signup("alice", "alice@example.com", "password123").await.unwrap();

    let key = ConversationKey::User(bob.id);
    // Empty content is rejected server-side with a 400.
    let result = alice.send_message(key, "").await;
    assert!(matches!(result, Err(ClientError::Api { .. })));
    assert!(alice.cached_messages(key).is_empty());
}

#[tokio::test]
async fn fetch_serves_from_cache_until_forced_to_refresh() {
    let app = spawn_app().await;
    let room_id = seed_room(&app, "general").await;

    let mut alice = ChatClient::new(&app.base_url);
    alice.signup("alice", "alice@example.com", "password123").await.unwrap();
    let mut bob = ChatClient::new(&app.base_url);
    bob.signup("bob", "bob@example.com", "password123").await.unwrap();

    let key = ConversationKey::Room(room_id);
    assert!(alice.fetch_messages(key).await.unwrap().is_empty());

    bob.send_message(key, "hello room").await.unwrap();

    // Within the freshness window the stale cached list is returned.
    assert!(alice.fetch_messages(key).await.unwrap().is_empty());

    alice.force_refresh(key);
    let refreshed = alice.fetch_messages(key).await.unwrap();
    assert_eq!(refreshed.len(), 1);
    assert_eq!(refreshed[0].text, "hello room");
    assert!(!refreshed[0].from_me);
    assert_eq!(refreshed[0].sender_name.as_deref(), Some("bob"));
}

#[tokio::test]
async fn logout_clears_all_cached_conversations() {
    let app = spawn_app().await;
    let room_id = seed_room(&app, "general").await;
    let bob = signup(&app, "bob").await;

    let mut alice = ChatClient::new(&app.base_url);
    alice.signup("alice", "alice@example.com", "password123").await.unwrap();

    let room_key = ConversationKey::Room(room_id);
    let pair_key = ConversationKey::User(bob.id);
    alice.send_message(room_key, "to the room").await.unwrap();
    alice.send_message(pair_key, "to bob").await.unwrap();

    alice.logout();
    assert!(alice.cached_messages(room_key).is_empty());
    assert!(alice.cached_messages(pair_key).is_empty());

    // Logged out: requests fail before reaching the network.
    let result = alice.fetch_messages(room_key).await;
    assert!(matches!(result, Err(ClientError::NotAuthenticated)));
}
