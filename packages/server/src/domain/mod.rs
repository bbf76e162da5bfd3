//! Domain layer for the chat server.
//!
//! This module contains business types and the storage interfaces the
//! use cases depend on. It knows nothing about WebSocket framing or SQL.

pub mod connection;
pub mod entity;
pub mod error;
pub mod repository;
pub mod value_object;

pub use connection::{Connection, PusherChannel};
pub use entity::{ChannelRecord, ChatMessage};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use repository::{ChannelRepository, MessageRepository};
pub use value_object::{
    BOT_USERNAME, ChannelId, ChannelName, ConnectionId, MAX_CHANNEL_NAME_LENGTH,
    MAX_MESSAGE_LENGTH, MessageContent, MessageId, Timestamp, Username,
};
