//! Message dispatch and retrieval handlers.
//!
//! Dispatch is a single pass: authenticate, validate, persist, then
//! (for private messages) fire a best-effort push notification. The
//! insert is the atomic commit point: nothing before it has side
//! effects, nothing after it can undo it, and a notification failure
//! never fails the request.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::backend::auth::users;
use crate::backend::error::ApiError;
use crate::backend::notify::PushMessage;
use crate::backend::server::state::AppState;
use crate::backend::session::{authenticate, SessionUser};
use crate::shared::wire::{MessageView, SendMessageRequest, SendMessageResponse};

use super::{db, views};

fn require_user(headers: &HeaderMap, state: &AppState) -> Result<SessionUser, ApiError> {
    authenticate(headers, &state.sessions).ok_or(ApiError::Unauthorized)
}

/// `POST /message`: validate, persist, and (for private messages)
/// notify the recipient.
pub async fn send_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    let user = require_user(&headers, &state)?;

    if request.content.is_empty() {
        return Err(ApiError::Validation(
            "Missing required fields (content)".into(),
        ));
    }
    // A message is either a room broadcast or a private message,
    // never both, never neither.
    match (request.room_id, request.recipient_id) {
        (Some(_), Some(_)) => {
            return Err(ApiError::Validation(
                "Specify either room_id or recipient_id, not both".into(),
            ));
        }
        (None, None) => {
            return Err(ApiError::Validation(
                "Either room_id or recipient_id is required".into(),
            ));
        }
        _ => {}
    }

    // Sender identity comes from the session, never from the body.
    let (message_id, sent_at) = db::insert_message(
        &state.db,
        user.id,
        &request.content,
        request.room_id,
        request.recipient_id,
    )
    .await?;

    tracing::info!(
        "message {} sent by user {} to {}",
        message_id,
        user.id,
        request
            .room_id
            .map(|r| format!("room {r}"))
            .unwrap_or_else(|| "private".to_string()),
    );

    if let Some(recipient_id) = request.recipient_id {
        notify_recipient(&state, &user, recipient_id, message_id, &request.content).await;
    }

    Ok(Json(SendMessageResponse {
        success: true,
        message_id,
        sent_at,
    }))
}

/// Best-effort push dispatch for a private message. Runs after the
/// durable commit; every failure is logged and swallowed.
async fn notify_recipient(
    state: &AppState,
    sender: &SessionUser,
    recipient_id: i64,
    message_id: i64,
    content: &str,
) {
    let recipient = match users::get_push_identity(&state.db, recipient_id).await {
        Ok(Some(recipient)) => recipient,
        Ok(None) => {
            tracing::warn!("no push identity for recipient {recipient_id}");
            return;
        }
        Err(e) => {
            tracing::warn!("push identity lookup failed for {recipient_id}: {e}");
            return;
        }
    };

    let push = PushMessage {
        sender_id: sender.id,
        sender_name: sender.username.clone(),
        recipient_id,
        message_id,
        content: content.to_string(),
    };
    if let Err(e) = state.notifier.publish(&recipient.external_id, &push).await {
        tracing::warn!("push notification failed (message already stored): {e}");
    }
}

#[derive(Debug, Deserialize)]
pub struct RoomQuery {
    #[serde(rename = "roomId")]
    pub room_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecipientQuery {
    #[serde(rename = "recipientId")]
    pub recipient_id: Option<String>,
}

/// Parse a target identifier supplied as a query parameter.
fn parse_id(raw: Option<&str>, missing: &str, invalid: &str) -> Result<i64, ApiError> {
    let raw = raw.ok_or_else(|| ApiError::Validation(missing.to_string()))?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::Validation(invalid.to_string())),
    }
}

/// `GET /messages?roomId=…`: room history, ascending chronological.
pub async fn room_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RoomQuery>,
) -> Result<Json<Vec<MessageView>>, ApiError> {
    let user = require_user(&headers, &state)?;
    let room_id = parse_id(
        query.room_id.as_deref(),
        "Room ID is required",
        "Invalid room ID",
    )?;

    let rows = db::list_by_room(&state.db, room_id).await?;
    tracing::debug!("got {} messages for room {room_id}", rows.len());
    Ok(Json(views::to_views(&rows, user.id)))
}

/// `GET /private-messages?recipientId=…`: both directions of the
/// pair conversation, ascending chronological.
pub async fn private_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RecipientQuery>,
) -> Result<Json<Vec<MessageView>>, ApiError> {
    let user = require_user(&headers, &state)?;
    let recipient_id = parse_id(
        query.recipient_id.as_deref(),
        "Recipient ID is required",
        "Invalid recipient ID",
    )?;

    let rows = db::list_by_pair(&state.db, user.id, recipient_id).await?;
    tracing::debug!(
        "got {} private messages between {} and {recipient_id}",
        rows.len(),
        user.id
    );
    Ok(Json(views::to_views(&rows, user.id)))
}
