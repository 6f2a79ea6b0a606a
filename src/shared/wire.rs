//! Wire contracts for the HTTP API.
//!
//! One explicit type per boundary: requests, responses, and the
//! display view-model. The storage row lives with the message store;
//! the total mapping between the two is in `backend::messages::views`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /message`.
///
/// Exactly one of `room_id` / `recipient_id` must be set; the dispatch
/// handler rejects anything else. The sender is never part of the
/// request: it comes from the authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<i64>,
}

/// Success body of `POST /message`, echoing the store-assigned identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub success: bool,
    pub message_id: i64,
    pub sent_at: DateTime<Utc>,
}

/// Display view-model for one message, as returned by the retrieval
/// endpoints and held in the client cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    /// Stringified store id, or a `tmp-*` id for a provisional entry.
    pub id: String,
    pub text: String,
    /// Time of day derived from `sent_at`, `HH:MM:SS`.
    pub time: String,
    pub from_me: bool,
    pub sender_name: Option<String>,
}

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /signup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Success body of `POST /login` and `POST /signup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub id: i64,
    pub username: String,
    pub external_id: String,
}

/// One row of `GET /users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub user_id: i64,
    pub username: String,
    /// Last login formatted `DD/MM/YYYY HH:MM`, if the user ever logged in.
    pub last_login: Option<String>,
}

/// One row of `GET /rooms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummary {
    pub room_id: i64,
    pub name: String,
}

/// Error body returned on every failure path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
