//! Application state.
//!
//! `AppState` is the central container handed to the router. All three
//! handles are built once at startup and cloned per request: the sqlx
//! pool and the session store are `Arc`-backed, so clones share the
//! underlying connections and token map. No other cross-request state
//! exists: handlers are independent.

use axum::extract::FromRef;

use sqlx::SqlitePool;

use crate::backend::notify::PushNotifier;
use crate::backend::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    /// Durable store for users, rooms, and messages.
    pub db: SqlitePool,
    /// Ephemeral token -> user-snapshot cache.
    pub sessions: SessionStore,
    /// Best-effort push delivery for private messages.
    pub notifier: PushNotifier,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db.clone()
    }
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for PushNotifier {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.notifier.clone()
    }
}
