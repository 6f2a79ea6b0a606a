//! Message store: one write path, two retrieval queries.
//!
//! The store does not police addressing: exactly-one-of
//! `room_id`/`recipient_id` is the dispatch handler's invariant.
//! Messages are immutable once inserted; nothing here updates or
//! deletes them.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// A stored message joined with the sender's display name, as the
/// retrieval queries produce it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MessageRow {
    pub message_id: i64,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub sender_id: i64,
    pub sender_name: String,
}

/// Insert a message and return its store-assigned identity.
///
/// The timestamp is assigned server-side at insert time. This is the
/// single atomic commit point of the dispatch path.
pub async fn insert_message(
    pool: &SqlitePool,
    sender_id: i64,
    content: &str,
    room_id: Option<i64>,
    recipient_id: Option<i64>,
) -> Result<(i64, DateTime<Utc>), sqlx::Error> {
    let sent_at = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO messages (room_id, sender_id, recipient_id, content, sent_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(room_id)
    .bind(sender_id)
    .bind(recipient_id)
    .bind(content)
    .bind(sent_at)
    .execute(pool)
    .await?;

    Ok((result.last_insert_rowid(), sent_at))
}

/// All messages of a room, ascending by send time, joined with the
/// sender's username.
pub async fn list_by_room(
    pool: &SqlitePool,
    room_id: i64,
) -> Result<Vec<MessageRow>, sqlx::Error> {
    sqlx::query_as::<_, MessageRow>(
        r#"
        SELECT m.message_id, m.content, m.sent_at, m.sender_id, u.username AS sender_name
        FROM messages m
        JOIN users u ON m.sender_id = u.user_id
        WHERE m.room_id = ?
        ORDER BY m.sent_at ASC, m.message_id ASC
        "#,
    )
    .bind(room_id)
    .fetch_all(pool)
    .await
}

/// All private messages between two users, in either direction,
/// ascending by send time. Room-tagged messages are excluded even if
/// sender and recipient happen to match.
pub async fn list_by_pair(
    pool: &SqlitePool,
    user_a: i64,
    user_b: i64,
) -> Result<Vec<MessageRow>, sqlx::Error> {
    sqlx::query_as::<_, MessageRow>(
        r#"
        SELECT m.message_id, m.content, m.sent_at, m.sender_id, u.username AS sender_name
        FROM messages m
        JOIN users u ON m.sender_id = u.user_id
        WHERE m.room_id IS NULL
          AND ((m.sender_id = ?1 AND m.recipient_id = ?2)
            OR (m.sender_id = ?2 AND m.recipient_id = ?1))
        ORDER BY m.sent_at ASC, m.message_id ASC
        "#,
    )
    .bind(user_a)
    .bind(user_b)
    .fetch_all(pool)
    .await
}
