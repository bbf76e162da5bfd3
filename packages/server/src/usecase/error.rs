//! UseCase layer error types.

use thiserror::Error;

use crate::domain::ValueObjectError;

/// Errors raised by [`Chat`](super::Chat) and [`Channel`](super::Channel).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatError {
    /// No channel with that name is registered
    #[error("unknown channel '{0}'")]
    UnknownChannel(String),

    /// The outbound record could not be serialized
    #[error("failed to encode message: {0}")]
    Encode(String),
}

/// Errors raised while handling one inbound frame. None of them end the session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The frame is not a JSON object with optional string fields
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("invalid username: {0}")]
    InvalidUsername(ValueObjectError),

    #[error(transparent)]
    Chat(#[from] ChatError),
}
