//! Router configuration.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::backend::auth::{login, signup};
use crate::backend::directory::{list_rooms, list_users};
use crate::backend::messages::{private_messages, room_messages, send_message};
use crate::backend::server::state::AppState;

/// All HTTP routes:
///
/// - `POST /signup`, `POST /login`: account + session creation
/// - `POST /message`: message dispatch
/// - `GET /messages?roomId=…`: room history
/// - `GET /private-messages?recipientId=…`: pair history
/// - `GET /users`, `GET /rooms`: directories
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/message", post(send_message))
        .route("/messages", get(room_messages))
        .route("/private-messages", get(private_messages))
        .route("/users", get(list_users))
        .route("/rooms", get(list_rooms))
        .fallback(|| async { (axum::http::StatusCode::NOT_FOUND, "404 Not Found") })
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
