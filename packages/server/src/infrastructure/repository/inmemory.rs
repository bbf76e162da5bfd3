//! InMemory Repository 実装
//!
//! ドメイン層が定義する MessageRepository / ChannelRepository trait の具体的な実装。
//! Vec をインメモリ DB として使用し、ID は 1 から順に採番します。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChannelId, ChannelRecord, ChannelRepository, ChatMessage, MessageId, MessageRepository,
    RepositoryError,
};

/// インメモリ Message Repository 実装
#[derive(Debug, Default)]
pub struct InMemoryMessageRepository {
    messages: Mutex<Vec<ChatMessage>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(&self, message: &ChatMessage) -> Result<MessageId, RepositoryError> {
        let mut messages = self.messages.lock().await;
        let id = MessageId::new(messages.len() as i64 + 1);
        messages.push(message.clone().with_id(id));
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        let messages = self.messages.lock().await;
        Ok(messages.clone())
    }
}

/// インメモリ Channel Repository 実装
///
/// チャンネル名の一意制約を持つ。
#[derive(Debug, Default)]
pub struct InMemoryChannelRepository {
    channels: Mutex<Vec<ChannelRecord>>,
}

impl InMemoryChannelRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChannelRepository for InMemoryChannelRepository {
    async fn insert(&self, channel: &ChannelRecord) -> Result<ChannelId, RepositoryError> {
        let mut channels = self.channels.lock().await;
        if channels.iter().any(|c| c.name == channel.name) {
            return Err(RepositoryError::Conflict(channel.name.to_string()));
        }
        let id = ChannelId::new(channels.len() as i64 + 1);
        channels.push(channel.clone().with_id(id));
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<ChannelRecord>, RepositoryError> {
        let channels = self.channels.lock().await;
        Ok(channels.clone())
    }
}
