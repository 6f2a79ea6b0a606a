//! Signup and login handlers.
//!
//! Both end the same way: a fresh UUID bearer token is stored in the
//! session store with the standard TTL, and the token plus a user
//! summary goes back to the caller. Invalid credentials return 401
//! with the same code regardless of which check failed, to avoid user
//! enumeration.

use axum::extract::State;
use axum::Json;
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::server::state::AppState;
use crate::backend::session::SessionUser;
use crate::shared::wire::{AuthResponse, LoginRequest, SignupRequest};

use super::users;

/// `POST /signup`: register a user and open a session.
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if request.username.is_empty() || request.email.is_empty() || request.password.is_empty() {
        return Err(ApiError::Validation("All fields are required".into()));
    }

    if users::get_user_by_username(&state.db, &request.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict {
            code: "USERNAME_EXISTS",
            message: "This username is already taken".into(),
        });
    }
    if users::get_user_by_email(&state.db, &request.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict {
            code: "EMAIL_EXISTS",
            message: "This email is already registered".into(),
        });
    }

    let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)?;
    let external_id = Uuid::new_v4().to_string();
    let user = users::create_user(
        &state.db,
        &request.username,
        &request.email,
        &password_hash,
        &external_id,
    )
    .await?;

    tracing::info!("new user registered: {} (id {})", user.username, user.user_id);
    open_session(&state, &user)
}

/// `POST /login`: verify credentials and open a session.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = users::get_user_by_username(&state.db, &request.username)
        .await?
        .ok_or_else(|| {
            tracing::warn!("login failed, unknown user: {}", request.username);
            ApiError::Unauthorized
        })?;

    if !bcrypt::verify(&request.password, &user.password_hash)? {
        tracing::warn!("login failed, bad password for: {}", request.username);
        return Err(ApiError::Unauthorized);
    }

    users::touch_last_login(&state.db, user.user_id).await?;
    tracing::info!("user logged in: {}", user.username);
    open_session(&state, &user)
}

/// Generate a token, snapshot the user into the session store, and
/// build the auth response. There is no matching close: sessions only
/// ever end by TTL expiry.
fn open_session(state: &AppState, user: &users::User) -> Result<Json<AuthResponse>, ApiError> {
    let token = Uuid::new_v4().to_string();
    state.sessions.put(
        &token,
        SessionUser {
            id: user.user_id,
            username: user.username.clone(),
            email: user.email.clone(),
            external_id: user.external_id.clone(),
        },
    )?;

    Ok(Json(AuthResponse {
        token,
        id: user.user_id,
        username: user.username.clone(),
        external_id: user.external_id.clone(),
    }))
}
