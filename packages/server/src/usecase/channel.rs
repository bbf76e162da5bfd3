//! UseCase: チャンネル単位のブロードキャスト
//!
//! 1 つのチャンネルに接続中の参加者（ユーザー名 → 接続）を管理し、
//! 送信者以外の全員にメッセージを配信します。全てのメッセージ（Bot の通知を含む）は
//! 配信前に保存を試みますが、保存の失敗は配信を妨げません。

use std::{collections::HashMap, sync::Arc};

use banter_shared::time::Clock;
use tokio::sync::Mutex;

use crate::{
    domain::{
        ChannelName, ChatMessage, Connection, ConnectionId, MessageContent, MessageRepository,
        Timestamp, Username,
    },
    infrastructure::dto::websocket::MessageRecord,
};

use super::error::ChatError;

/// Outcome of one fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// The message as broadcast (with its store id when persisting succeeded)
    pub message: ChatMessage,
    /// Recipients whose queue accepted the record
    pub delivered: Vec<Username>,
    /// Recipients whose connection was already closed
    pub failed: Vec<Username>,
}

/// One named broadcast group and its live connections.
pub struct Channel {
    name: ChannelName,
    created_at: Timestamp,
    /// At most one connection per username; a later join replaces the earlier one
    connections: Mutex<HashMap<Username, Connection>>,
    messages: Arc<dyn MessageRepository>,
    clock: Arc<dyn Clock>,
}

impl Channel {
    pub fn new(
        name: ChannelName,
        created_at: Timestamp,
        messages: Arc<dyn MessageRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            name,
            created_at,
            connections: Mutex::new(HashMap::new()),
            messages,
            clock,
        }
    }

    pub fn name(&self) -> &ChannelName {
        &self.name
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Register `connection` under `username`.
    ///
    /// Returns the connection previously registered under that name, if any.
    /// The replaced socket is not notified.
    pub async fn join(&self, username: Username, connection: Connection) -> Option<Connection> {
        let mut connections = self.connections.lock().await;
        tracing::debug!(
            "Registering '{}' on channel '{}' (connection {})",
            username,
            self.name,
            connection.id()
        );
        connections.insert(username, connection)
    }

    /// Remove `username` if it is still registered with `connection_id`.
    ///
    /// Returns `false` when the name is absent or now belongs to another socket.
    pub async fn leave(&self, username: &Username, connection_id: ConnectionId) -> bool {
        let mut connections = self.connections.lock().await;
        match connections.get(username) {
            Some(current) if current.id() == connection_id => {
                connections.remove(username);
                tracing::debug!("Removed '{}' from channel '{}'", username, self.name);
                true
            }
            _ => false,
        }
    }

    /// Usernames currently connected, sorted.
    pub async fn members(&self) -> Vec<Username> {
        let connections = self.connections.lock().await;
        let mut members: Vec<Username> = connections.keys().cloned().collect();
        members.sort();
        members
    }

    /// Send `raw_message` as the reserved bot user.
    pub async fn bot(&self, raw_message: &str) -> Result<Delivery, ChatError> {
        self.send(&Username::bot(), raw_message).await
    }

    /// Persist `raw_message` (truncated) and push it to every member except `sender`.
    pub async fn send(&self, sender: &Username, raw_message: &str) -> Result<Delivery, ChatError> {
        let message = ChatMessage::new(
            sender.clone(),
            MessageContent::truncated(raw_message),
            Timestamp::new(self.clock.now_millis()),
        );

        // Persist before taking the connection lock.
        let message = match self.messages.insert(&message).await {
            Ok(id) => message.with_id(id),
            Err(e) => {
                tracing::warn!(
                    "Failed to persist message from '{}' on channel '{}' ({:?}): {}",
                    sender,
                    self.name,
                    message.content.as_str(),
                    e
                );
                message
            }
        };

        let payload = serde_json::to_string(&MessageRecord::from(&message))
            .map_err(|e| ChatError::Encode(e.to_string()))?;

        let mut delivered = Vec::new();
        let mut failed = Vec::new();
        {
            let connections = self.connections.lock().await;
            for (username, connection) in connections.iter() {
                if username == sender {
                    continue;
                }
                match connection.push(&payload) {
                    Ok(()) => delivered.push(username.clone()),
                    Err(e) => {
                        tracing::warn!(
                            "Failed to push message to '{}' on channel '{}': {}",
                            username,
                            self.name,
                            e
                        );
                        failed.push(username.clone());
                    }
                }
            }
        }

        tracing::debug!(
            "Broadcast from '{}' on channel '{}' reached {} recipient(s), {} failed",
            sender,
            self.name,
            delivered.len(),
            failed.len()
        );

        Ok(Delivery {
            message,
            delivered,
            failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessageId, RepositoryError, repository::MockMessageRepository},
        infrastructure::repository::InMemoryMessageRepository,
    };
    use banter_shared::time::FixedClock;
    use tokio::sync::mpsc::{self, UnboundedReceiver, error::TryRecvError};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - send: 切り詰め、保存、送信者以外へのブロードキャスト
    // - join / leave: 後勝ちの登録と、接続 ID を確認した削除
    // - 保存失敗・送信失敗が配信全体を止めないこと
    // ========================================

    const NOW: i64 = 1672531200000;

    fn username(name: &str) -> Username {
        Username::new(name.to_string()).unwrap()
    }

    fn connection() -> (Connection, UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Connection::new(tx), rx)
    }

    fn create_channel(messages: Arc<dyn MessageRepository>) -> Channel {
        Channel::new(
            ChannelName::new("general".to_string()).unwrap(),
            Timestamp::new(NOW),
            messages,
            Arc::new(FixedClock::new(NOW)),
        )
    }

    fn received(rx: &mut UnboundedReceiver<String>) -> MessageRecord {
        let raw = rx.try_recv().expect("expected a queued record");
        serde_json::from_str(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_send_reaches_everyone_but_sender() {
        // テスト項目: A が送信すると B と C に 1 件ずつ届き、A には届かない
        // given (前提条件):
        let channel = create_channel(Arc::new(InMemoryMessageRepository::new()));
        let (conn_a, mut rx_a) = connection();
        let (conn_b, mut rx_b) = connection();
        let (conn_c, mut rx_c) = connection();
        channel.join(username("A"), conn_a).await;
        channel.join(username("B"), conn_b).await;
        channel.join(username("C"), conn_c).await;

        // when (操作):
        let delivery = channel.send(&username("A"), "hello").await.unwrap();

        // then (期待する結果):
        for rx in [&mut rx_b, &mut rx_c] {
            let record = received(rx);
            assert_eq!(record.username, "A");
            assert_eq!(record.content, "hello");
            assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        }
        assert_eq!(rx_a.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(delivery.delivered.len(), 2);
        assert!(delivery.failed.is_empty());
    }

    #[tokio::test]
    async fn test_send_truncates_and_persists() {
        // テスト項目: 256 文字を超える本文は切り詰めて保存・配信される
        // given (前提条件):
        let repository = Arc::new(InMemoryMessageRepository::new());
        let channel = create_channel(repository.clone());
        let (conn_b, mut rx_b) = connection();
        channel.join(username("B"), conn_b).await;
        let raw = format!("{}{}", "x".repeat(256), "overflow");

        // when (操作):
        let delivery = channel.send(&username("A"), &raw).await.unwrap();

        // then (期待する結果):
        let record = received(&mut rx_b);
        assert_eq!(record.content, "x".repeat(256));
        assert_eq!(record.id, Some(1));
        assert_eq!(record.created, "2023-01-01T00:00:00.000Z");
        assert_eq!(delivery.message.id, Some(MessageId::new(1)));

        let stored = repository.list_all().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].content.as_str(), "x".repeat(256));
    }

    #[tokio::test]
    async fn test_send_with_no_members_is_noop_broadcast() {
        // テスト項目: 参加者がいないチャンネルへの送信はエラーにならず保存だけ行われる
        // given (前提条件):
        let repository = Arc::new(InMemoryMessageRepository::new());
        let channel = create_channel(repository.clone());

        // when (操作):
        let delivery = channel.send(&username("A"), "anyone?").await.unwrap();

        // then (期待する結果):
        assert!(delivery.delivered.is_empty());
        assert_eq!(repository.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_persistence_failure_does_not_block_broadcast() {
        // テスト項目: 保存に失敗してもブロードキャストは行われ、id は null になる
        // given (前提条件):
        let mut repository = MockMessageRepository::new();
        repository
            .expect_insert()
            .times(1)
            .returning(|_| Err(RepositoryError::Storage("disk full".to_string())));
        let channel = create_channel(Arc::new(repository));
        let (conn_b, mut rx_b) = connection();
        channel.join(username("B"), conn_b).await;

        // when (操作):
        let result = channel.send(&username("A"), "still here").await;

        // then (期待する結果):
        assert!(result.is_ok());
        let record = received(&mut rx_b);
        assert_eq!(record.id, None);
        assert_eq!(record.content, "still here");
    }

    #[tokio::test]
    async fn test_closed_recipient_does_not_abort_fanout() {
        // テスト項目: 切断済みの宛先があっても残りの宛先には配信される
        // given (前提条件):
        let channel = create_channel(Arc::new(InMemoryMessageRepository::new()));
        let (conn_b, rx_b) = connection();
        let (conn_c, mut rx_c) = connection();
        let (conn_d, mut rx_d) = connection();
        channel.join(username("B"), conn_b).await;
        channel.join(username("C"), conn_c).await;
        channel.join(username("D"), conn_d).await;
        drop(rx_b);

        // when (操作):
        let delivery = channel.send(&username("A"), "hi").await.unwrap();

        // then (期待する結果):
        assert_eq!(delivery.failed, vec![username("B")]);
        assert_eq!(delivery.delivered.len(), 2);
        assert_eq!(received(&mut rx_c).content, "hi");
        assert_eq!(received(&mut rx_d).content, "hi");
    }

    #[tokio::test]
    async fn test_bot_reaches_every_member() {
        // テスト項目: Bot のメッセージは全参加者に Bot 名義で届く
        // given (前提条件):
        let channel = create_channel(Arc::new(InMemoryMessageRepository::new()));
        let (conn_a, mut rx_a) = connection();
        channel.join(username("A"), conn_a).await;

        // when (操作):
        channel.bot("A has joined.").await.unwrap();

        // then (期待する結果):
        let record = received(&mut rx_a);
        assert_eq!(record.username, "Bot");
        assert_eq!(record.content, "A has joined.");
    }

    #[tokio::test]
    async fn test_rejoin_replaces_previous_socket() {
        // テスト項目: 同じユーザー名で再参加すると新しい接続だけに配信される
        // given (前提条件):
        let channel = create_channel(Arc::new(InMemoryMessageRepository::new()));
        let (old_conn, mut old_rx) = connection();
        let (new_conn, mut new_rx) = connection();
        let old_id = old_conn.id();
        channel.join(username("A"), old_conn).await;

        // when (操作):
        let replaced = channel.join(username("A"), new_conn).await;
        channel.send(&username("B"), "ping").await.unwrap();

        // then (期待する結果):
        assert_eq!(replaced.map(|c| c.id()), Some(old_id));
        assert_eq!(received(&mut new_rx).content, "ping");
        assert_eq!(old_rx.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(channel.members().await, vec![username("A")]);
    }

    #[tokio::test]
    async fn test_leave_only_removes_own_registration() {
        // テスト項目: 置き換えられた古い接続の leave では新しい登録は削除されない
        // given (前提条件):
        let channel = create_channel(Arc::new(InMemoryMessageRepository::new()));
        let (old_conn, _old_rx) = connection();
        let (new_conn, _new_rx) = connection();
        let old_id = old_conn.id();
        let new_id = new_conn.id();
        channel.join(username("A"), old_conn).await;
        channel.join(username("A"), new_conn).await;

        // when (操作):
        let stale = channel.leave(&username("A"), old_id).await;
        let members_after_stale = channel.members().await;
        let current = channel.leave(&username("A"), new_id).await;

        // then (期待する結果):
        assert!(!stale);
        assert_eq!(members_after_stale, vec![username("A")]);
        assert!(current);
        assert!(channel.members().await.is_empty());
    }
}
