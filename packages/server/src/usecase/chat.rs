//! UseCase: チャンネルの登録と振り分け
//!
//! チャンネル名から [`Channel`] を引き当て、送信要求を転送します。
//! チャンネルは名前ごとに一度だけ作成され、既存のチャンネルを置き換えることはありません。

use std::{collections::HashMap, sync::Arc};

use banter_shared::time::Clock;
use tokio::sync::RwLock;

use crate::domain::{
    ChannelName, ChannelRecord, ChannelRepository, MessageRepository, RepositoryError, Timestamp,
    Username,
};

use super::{
    channel::{Channel, Delivery},
    error::ChatError,
};

/// Registry of every channel known to this process.
pub struct Chat {
    channels: RwLock<HashMap<ChannelName, Arc<Channel>>>,
    messages: Arc<dyn MessageRepository>,
    channel_store: Arc<dyn ChannelRepository>,
    clock: Arc<dyn Clock>,
}

impl Chat {
    /// Create an empty registry.
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        channel_store: Arc<dyn ChannelRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            messages,
            channel_store,
            clock,
        }
    }

    /// Create a registry pre-seeded with every channel in `channel_store`.
    pub async fn load(
        messages: Arc<dyn MessageRepository>,
        channel_store: Arc<dyn ChannelRepository>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, RepositoryError> {
        let records = channel_store.list_all().await?;
        let chat = Self::new(messages, channel_store, clock);

        {
            let mut channels = chat.channels.write().await;
            for record in records {
                let channel = chat.build_channel(record.name.clone(), record.created_at);
                channels.entry(record.name).or_insert_with(|| Arc::new(channel));
            }
            tracing::info!("Loaded {} channel(s) from storage", channels.len());
        }

        Ok(chat)
    }

    fn build_channel(&self, name: ChannelName, created_at: Timestamp) -> Channel {
        Channel::new(name, created_at, self.messages.clone(), self.clock.clone())
    }

    /// Return the channel called `name`, creating and persisting it if absent.
    ///
    /// An existing channel is returned untouched, together with its members.
    pub async fn add_channel(&self, name: ChannelName) -> Arc<Channel> {
        if let Some(existing) = self.channel(&name).await {
            return existing;
        }

        let channel = {
            let mut channels = self.channels.write().await;
            if let Some(existing) = channels.get(&name) {
                return existing.clone();
            }
            let created_at = Timestamp::new(self.clock.now_millis());
            let channel = Arc::new(self.build_channel(name.clone(), created_at));
            channels.insert(name.clone(), channel.clone());
            channel
        };

        let record = ChannelRecord::new(name, channel.created_at());
        match self.channel_store.insert(&record).await {
            Ok(_) => tracing::info!("Channel '{}' created", record.name),
            Err(e) => tracing::warn!("Failed to persist channel '{}': {}", record.name, e),
        }

        channel
    }

    /// Look up a channel without creating it.
    pub async fn channel(&self, name: &ChannelName) -> Option<Arc<Channel>> {
        let channels = self.channels.read().await;
        channels.get(name).cloned()
    }

    /// Names of all registered channels, sorted.
    pub async fn channel_names(&self) -> Vec<ChannelName> {
        let channels = self.channels.read().await;
        let mut names: Vec<ChannelName> = channels.keys().cloned().collect();
        names.sort();
        names
    }

    /// Broadcast `message` from `sender` on `channel`.
    ///
    /// # Errors
    ///
    /// [`ChatError::UnknownChannel`] if no channel of that name is registered;
    /// nothing is persisted or broadcast in that case.
    pub async fn send(
        &self,
        sender: &Username,
        message: &str,
        channel: &ChannelName,
    ) -> Result<Delivery, ChatError> {
        let target = self
            .channel(channel)
            .await
            .ok_or_else(|| ChatError::UnknownChannel(channel.to_string()))?;
        target.send(sender, message).await
    }

    /// Broadcast `message` from the bot user on `channel`.
    pub async fn bot(&self, message: &str, channel: &ChannelName) -> Result<Delivery, ChatError> {
        self.send(&Username::bot(), message, channel).await
    }
}
