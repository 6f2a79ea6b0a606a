//! User model and database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// A user row. The numeric `user_id` is the internal identity;
/// `external_id` is the opaque push-notification subscriber key and
/// never changes once issued.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub external_id: String,
    pub created_on: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Push-notification identity of a message recipient.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PushIdentity {
    pub external_id: String,
    pub username: String,
}

pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
    external_id: &str,
) -> Result<User, sqlx::Error> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO users (username, email, password_hash, external_id, created_on)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(external_id)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(User {
        user_id: result.last_insert_rowid(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        external_id: external_id.to_string(),
        created_on: now,
        last_login: None,
    })
}

pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT user_id, username, email, password_hash, external_id, created_on, last_login
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT user_id, username, email, password_hash, external_id, created_on, last_login
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Stamp a successful login.
pub async fn touch_last_login(pool: &SqlitePool, user_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_login = ? WHERE user_id = ?")
        .bind(Utc::now())
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Look up the push-notification identity of a user, if the user exists.
pub async fn get_push_identity(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Option<PushIdentity>, sqlx::Error> {
    sqlx::query_as::<_, PushIdentity>(
        "SELECT external_id, username FROM users WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
