//! The HTTP backend: request handlers and the stores behind them.

pub mod auth;
pub mod directory;
pub mod error;
pub mod messages;
pub mod notify;
pub mod routes;
pub mod server;
pub mod session;
