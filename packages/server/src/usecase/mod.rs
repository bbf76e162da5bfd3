//! UseCase layer.
//!
//! - `channel`: per-channel fan-out and membership
//! - `chat`: channel registry and dispatcher
//! - `session`: per-connection join/message/close state machine
//! - `get_messages`, `get_channels`: read-through queries for the HTTP API

pub mod channel;
pub mod chat;
pub mod error;
pub mod get_channels;
pub mod get_messages;
pub mod session;

pub use channel::{Channel, Delivery};
pub use chat::Chat;
pub use error::{ChatError, SessionError};
pub use get_channels::GetChannelsUseCase;
pub use get_messages::GetMessagesUseCase;
pub use session::{ChatSession, SessionState};
