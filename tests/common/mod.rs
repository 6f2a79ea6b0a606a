//! Shared test harness: a real server on an ephemeral port, backed by
//! an in-memory SQLite database.

#![allow(dead_code)]

use std::time::Duration;

use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use ubchat::backend::notify::PushNotifier;
use ubchat::backend::routes::create_router;
use ubchat::backend::server::state::AppState;
use ubchat::backend::session::SessionStore;
use ubchat::shared::wire::AuthResponse;

pub struct TestApp {
    /// Base URL of the running server, e.g. `http://127.0.0.1:54321`.
    pub base_url: String,
    pub db: SqlitePool,
    pub sessions: SessionStore,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(SessionStore::default(), PushNotifier::Disabled).await
}

pub async fn spawn_app_with(sessions: SessionStore, notifier: PushNotifier) -> TestApp {
    // A single connection keeps the in-memory database shared across
    // all requests.
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    sqlx::migrate!()
        .run(&db)
        .await
        .expect("failed to run migrations");

    let state = AppState {
        db: db.clone(),
        sessions: sessions.clone(),
        notifier,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server crashed");
    });

    TestApp {
        base_url: format!("http://{addr}"),
        db,
        sessions,
    }
}

pub fn expired_sessions() -> SessionStore {
    SessionStore::new(Duration::ZERO)
}

/// Register a user through the real endpoint and hand back the
/// session token plus ids.
pub async fn signup(app: &TestApp, username: &str) -> AuthResponse {
    let response = reqwest::Client::new()
        .post(format!("{}/signup", app.base_url))
        .json(&serde_json::json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "password123",
        }))
        .send()
        .await
        .expect("signup request failed");
    assert_eq!(response.status(), 200, "signup should succeed");
    response.json().await.expect("invalid signup response")
}

/// Insert a room directly; room creation has no endpoint.
pub async fn seed_room(app: &TestApp, name: &str) -> i64 {
    let result = sqlx::query("INSERT INTO rooms (name, created_on) VALUES (?, ?)")
        .bind(name)
        .bind(Utc::now())
        .execute(&app.db)
        .await
        .expect("failed to seed room");
    result.last_insert_rowid()
}
