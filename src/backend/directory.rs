//! Directory handlers: the user list and the room list.
//!
//! Plain authenticated table scans, no business logic.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use crate::backend::error::ApiError;
use crate::backend::server::state::AppState;
use crate::backend::session::authenticate;
use crate::shared::wire::{RoomSummary, UserSummary};

/// `GET /users`: everyone except the caller, most recent login first.
pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let user = authenticate(&headers, &state.sessions).ok_or(ApiError::Unauthorized)?;

    let rows = sqlx::query_as::<_, (i64, String, Option<chrono::DateTime<chrono::Utc>>)>(
        r#"
        SELECT user_id, username, last_login
        FROM users
        WHERE user_id != ?
        ORDER BY last_login DESC
        "#,
    )
    .bind(user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(
        rows.into_iter()
            .map(|(user_id, username, last_login)| UserSummary {
                user_id,
                username,
                last_login: last_login.map(|t| t.format("%d/%m/%Y %H:%M").to_string()),
            })
            .collect(),
    ))
}

/// `GET /rooms`: all rooms.
pub async fn list_rooms(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<RoomSummary>>, ApiError> {
    authenticate(&headers, &state.sessions).ok_or(ApiError::Unauthorized)?;

    let rows = sqlx::query_as::<_, (i64, String)>("SELECT room_id, name FROM rooms")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(
        rows.into_iter()
            .map(|(room_id, name)| RoomSummary { room_id, name })
            .collect(),
    ))
}
