//! Server initialization.

use axum::Router;

use crate::backend::notify::{BeamsClient, PushNotifier};
use crate::backend::routes::create_router;
use crate::backend::session::SessionStore;

use super::config::{load_database, ServerConfig};
use super::state::AppState;

/// Build the application from its configuration: connect the database,
/// create the session store and notifier, and wire up the router.
pub async fn create_app(config: &ServerConfig) -> Result<Router, sqlx::Error> {
    tracing::info!("initializing ubchat backend");

    let db = load_database(&config.database_url).await?;
    let sessions = SessionStore::new(config.session_ttl);
    let notifier = match &config.beams {
        Some(beams) => PushNotifier::Beams(BeamsClient::new(&beams.instance_id, &beams.secret_key)),
        None => PushNotifier::Disabled,
    };

    let state = AppState {
        db,
        sessions,
        notifier,
    };

    tracing::info!("router configured");
    Ok(create_router(state))
}
