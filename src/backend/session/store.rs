//! Session store: opaque token -> user snapshot, with a fixed TTL.
//!
//! Sessions are write-once, read-many, auto-expiring. There is no
//! delete: logout only clears client-side state, so a token stays
//! valid until its TTL elapses. Expiry is absolute from creation;
//! `get` never renews it.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default session lifetime: one hour, matching the login TTL.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

/// Snapshot of the user taken at authentication time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Push-notification subscriber key, immutable once issued.
    pub external_id: String,
}

#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// A writer panicked while holding the lock. Treated by callers as
    /// "store unreachable": authentication fails closed.
    #[error("session store lock poisoned")]
    Poisoned,
}

struct Entry {
    user: SessionUser,
    expires_at: Instant,
}

/// Shared, thread-safe token map. Constructed once at startup and
/// cloned into every handler; clones share the same underlying map.
#[derive(Clone)]
pub struct SessionStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Store `user` under `token` with the store's default TTL,
    /// silently overwriting any existing entry for the same token.
    pub fn put(&self, token: &str, user: SessionUser) -> Result<(), SessionStoreError> {
        self.put_with_ttl(token, user, self.ttl)
    }

    pub fn put_with_ttl(
        &self,
        token: &str,
        user: SessionUser,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| SessionStoreError::Poisoned)?;
        // Writes are rare (one per login); reclaim expired entries here
        // so `get` can stay side-effect-free.
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            token.to_string(),
            Entry {
                user,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    /// Look up a token. Returns `None` for absent and expired tokens
    /// alike: the caller cannot distinguish the two, by contract.
    pub fn get(&self, token: &str) -> Result<Option<SessionUser>, SessionStoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| SessionStoreError::Poisoned)?;
        Ok(entries
            .get(token)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.user.clone()))
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}
