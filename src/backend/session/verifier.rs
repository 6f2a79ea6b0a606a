//! Session verifier: inbound request -> authenticated user, or not.
//!
//! A plain lookup with no side effects. Authentication fails closed:
//! a missing or malformed header skips the store entirely, and a
//! store-access failure degrades to "nobody is logged in" rather than
//! surfacing an error.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use super::store::{SessionStore, SessionUser};

/// Extract the bearer token from the `Authorization` header.
///
/// Returns `None` when the header is absent, not valid UTF-8, missing
/// the `Bearer ` prefix, or empty after stripping it.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?
        .strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Resolve the request's bearer token through the session store.
pub fn authenticate(headers: &HeaderMap, sessions: &SessionStore) -> Option<SessionUser> {
    let token = bearer_token(headers)?;
    match sessions.get(token) {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("session store unavailable, failing closed: {e}");
            None
        }
    }
}
