//! ubchat: a minimal web chat service and its client library.
//!
//! The crate is split the same way the deployment is:
//!
//! - [`backend`]: the Axum HTTP server, with the session store and verifier,
//!   message dispatch/retrieval handlers, auth, and the best-effort
//!   push-notification client.
//! - [`client`]: the chat client, HTTP calls plus the per-conversation
//!   message cache with optimistic send reconciliation.
//! - [`shared`]: the wire contracts both sides agree on.

pub mod backend;
pub mod client;
pub mod shared;
