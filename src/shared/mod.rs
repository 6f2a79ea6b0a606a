//! Types shared between the server and the client.

pub mod wire;

pub use wire::{
    AuthResponse, ErrorBody, LoginRequest, MessageView, RoomSummary, SendMessageRequest,
    SendMessageResponse, SignupRequest, UserSummary,
};
