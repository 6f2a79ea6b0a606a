//! User accounts: credential storage and the signup/login handlers.

pub mod handlers;
pub mod users;

pub use handlers::{login, signup};
