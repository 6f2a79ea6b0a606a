//! Backend error taxonomy.
//!
//! Every handler returns `Result<_, ApiError>`; the `IntoResponse`
//! impl turns each variant into the `{code, message}` JSON body and
//! an HTTP status. Storage failures are surfaced as a generic server
//! error so internal details never leak to the caller.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::shared::wire::ErrorBody;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed, or expired bearer token.
    #[error("unauthorized")]
    Unauthorized,

    /// Missing required field or malformed identifier.
    #[error("validation error: {0}")]
    Validation(String),

    /// Duplicate username/email on signup.
    #[error("{message}")]
    Conflict {
        code: &'static str,
        message: String,
    },

    /// Underlying store unavailable or constraint violation.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Session store unavailable on the write path (login/signup).
    #[error("session error: {0}")]
    Session(#[from] crate::backend::session::SessionStoreError),

    /// Password hashing failure.
    #[error("hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Storage(_) | Self::Session(_) | Self::Hashing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::Unauthorized => ErrorBody {
                code: "UNAUTHORIZED".into(),
                message: "Session expired".into(),
            },
            Self::Validation(message) => ErrorBody {
                code: "INVALID_REQUEST".into(),
                message: message.clone(),
            },
            Self::Conflict { code, message } => ErrorBody {
                code: (*code).into(),
                message: message.clone(),
            },
            // Internal details stay in the logs.
            Self::Storage(_) | Self::Session(_) | Self::Hashing(_) => ErrorBody {
                code: "INTERNAL_ERROR".into(),
                message: "Internal server error".into(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Storage(e) => tracing::error!("storage error: {e:?}"),
            Self::Session(e) => tracing::error!("session store error: {e:?}"),
            Self::Hashing(e) => tracing::error!("hashing error: {e:?}"),
            Self::Unauthorized => tracing::warn!("unauthorized request"),
            _ => {}
        }
        (self.status_code(), Json(self.body())).into_response()
    }
}
