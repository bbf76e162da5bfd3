//! UseCase: 保存済みメッセージの一覧取得

use std::sync::Arc;

use crate::domain::{ChatMessage, MessageRepository, RepositoryError};

/// メッセージ一覧取得のユースケース
pub struct GetMessagesUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MessageRepository>,
}

impl GetMessagesUseCase {
    /// 新しい GetMessagesUseCase を作成
    pub fn new(repository: Arc<dyn MessageRepository>) -> Self {
        Self { repository }
    }

    /// 全メッセージを保存順に取得
    pub async fn execute(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        self.repository.list_all().await
    }
}
