//! Handle to one live WebSocket connection.

use tokio::sync::mpsc;

use super::{error::MessagePushError, value_object::ConnectionId};

/// Queue feeding a connection's socket writer task.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// A live socket as seen by a channel: an identity plus its outbound queue.
///
/// Pushing never blocks; the per-connection pusher task drains the queue into
/// the socket.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    sender: PusherChannel,
}

impl Connection {
    pub fn new(sender: PusherChannel) -> Self {
        Self {
            id: ConnectionId::generate(),
            sender,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue `payload` for delivery on this socket.
    pub fn push(&self, payload: &str) -> Result<(), MessagePushError> {
        self.sender
            .send(payload.to_string())
            .map_err(|_| MessagePushError::Disconnected(self.id.to_string()))
    }
}
