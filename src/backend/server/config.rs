//! Server configuration from environment variables.

use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::backend::session::store::DEFAULT_SESSION_TTL;

/// Everything the server reads from the environment.
///
/// - `DATABASE_URL`: SQLite URL, defaults to a local file database.
/// - `SERVER_PORT`: listen port, defaults to 3000.
/// - `SESSION_TTL_SECS`: session lifetime, defaults to 3600.
/// - `PUSHER_INSTANCE_ID` / `PUSHER_SECRET_KEY`: push service
///   credentials; push notifications are disabled when either is unset.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub session_ttl: Duration,
    pub beams: Option<BeamsConfig>,
}

#[derive(Debug, Clone)]
pub struct BeamsConfig {
    pub instance_id: String,
    pub secret_key: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:ubchat.db?mode=rwc".to_string());
        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        let session_ttl = std::env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SESSION_TTL);

        let beams = match (
            std::env::var("PUSHER_INSTANCE_ID"),
            std::env::var("PUSHER_SECRET_KEY"),
        ) {
            (Ok(instance_id), Ok(secret_key)) => Some(BeamsConfig {
                instance_id,
                secret_key,
            }),
            _ => {
                tracing::warn!("push credentials not set, notifications disabled");
                None
            }
        };

        Self {
            database_url,
            port,
            session_ttl,
            beams,
        }
    }
}

/// Create the database pool and apply migrations. Called once at
/// startup; the pool is then cloned into every handler.
pub async fn load_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("connecting to database at {database_url}");
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    tracing::info!("running database migrations");
    sqlx::migrate!().run(&pool).await?;

    Ok(pool)
}
