//! The messaging exchange: durable store, dispatch, and retrieval.

pub mod db;
pub mod handlers;
pub mod views;

pub use handlers::{private_messages, room_messages, send_message};
