//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ChannelId, ChannelRecord, ChatMessage, MessageId, RepositoryError};

/// Message Repository trait
///
/// チャットメッセージの永続化インターフェース。
/// ブロードキャスト処理はこの trait だけに依存し、具体的なデータベースには依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// メッセージを保存し、採番された ID を返す
    async fn insert(&self, message: &ChatMessage) -> Result<MessageId, RepositoryError>;

    /// 保存済みの全メッセージを保存順に取得
    async fn list_all(&self) -> Result<Vec<ChatMessage>, RepositoryError>;
}

/// Channel Repository trait
///
/// チャンネル定義（名前と作成日時）の永続化インターフェース。
/// 接続中の参加者は永続化しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// チャンネルを保存し、採番された ID を返す
    async fn insert(&self, channel: &ChannelRecord) -> Result<ChannelId, RepositoryError>;

    /// 保存済みの全チャンネルを作成順に取得
    async fn list_all(&self) -> Result<Vec<ChannelRecord>, RepositoryError>;
}
