//! Domain error types.

use thiserror::Error;

/// Errors raised when constructing value objects from raw input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueObjectError {
    #[error("username must not be empty")]
    EmptyUsername,

    #[error("username '{0}' is reserved")]
    ReservedUsername(String),

    #[error("channel name must not be empty")]
    EmptyChannelName,

    #[error("channel name is too long ({actual} > {max} characters)")]
    ChannelNameTooLong { max: usize, actual: usize },

    #[error("channel name '{0}' contains characters outside [A-Za-z0-9._-]")]
    InvalidChannelName(String),
}

/// Errors raised by message and channel stores.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// The backing store rejected or failed the operation
    #[error("storage error: {0}")]
    Storage(String),

    /// A record with the same unique key already exists
    #[error("'{0}' already exists")]
    Conflict(String),

    /// A stored row could not be turned back into a domain value
    #[error("corrupted record: {0}")]
    Corrupted(String),
}

/// Errors raised when pushing a payload to a live connection.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessagePushError {
    /// The connection's outbound queue has been closed
    #[error("connection '{0}' is closed")]
    Disconnected(String),
}
