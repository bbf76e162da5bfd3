//! Domain entities.

use super::value_object::{ChannelId, ChannelName, MessageContent, MessageId, Timestamp, Username};

/// A chat message as sent by a participant or the bot.
///
/// `id` stays `None` until the message store has accepted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Option<MessageId>,
    pub username: Username,
    pub content: MessageContent,
    pub created_at: Timestamp,
}

impl ChatMessage {
    pub fn new(username: Username, content: MessageContent, created_at: Timestamp) -> Self {
        Self {
            id: None,
            username,
            content,
            created_at,
        }
    }

    /// Attach the identifier assigned by the store.
    pub fn with_id(mut self, id: MessageId) -> Self {
        self.id = Some(id);
        self
    }
}

/// Persistent description of a channel. Live membership is not part of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRecord {
    pub id: Option<ChannelId>,
    pub name: ChannelName,
    pub created_at: Timestamp,
}

impl ChannelRecord {
    pub fn new(name: ChannelName, created_at: Timestamp) -> Self {
        Self {
            id: None,
            name,
            created_at,
        }
    }

    pub fn with_id(mut self, id: ChannelId) -> Self {
        self.id = Some(id);
        self
    }
}
