//! Bearer-token sessions: the TTL store and the request verifier.

pub mod store;
pub mod verifier;

pub use store::{SessionStore, SessionStoreError, SessionUser};
pub use verifier::{authenticate, bearer_token};
