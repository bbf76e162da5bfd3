//! UseCase: 保存済みチャンネルの一覧取得

use std::sync::Arc;

use crate::domain::{ChannelRecord, ChannelRepository, RepositoryError};

/// チャンネル一覧取得のユースケース
pub struct GetChannelsUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChannelRepository>,
}

impl GetChannelsUseCase {
    /// 新しい GetChannelsUseCase を作成
    pub fn new(repository: Arc<dyn ChannelRepository>) -> Self {
        Self { repository }
    }

    /// 全チャンネルを作成順に取得
    pub async fn execute(&self) -> Result<Vec<ChannelRecord>, RepositoryError> {
        self.repository.list_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChannelName, Timestamp},
        infrastructure::repository::InMemoryChannelRepository,
    };

    #[tokio::test]
    async fn test_get_channels_lists_in_creation_order() {
        // テスト項目: 保存したチャンネルが作成順に返される
        // given (前提条件):
        let repository = Arc::new(InMemoryChannelRepository::new());
        for name in ["general", "random"] {
            repository
                .insert(&ChannelRecord::new(
                    ChannelName::new(name.to_string()).unwrap(),
                    Timestamp::new(1000),
                ))
                .await
                .unwrap();
        }
        let usecase = GetChannelsUseCase::new(repository);

        // when (操作):
        let channels = usecase.execute().await.unwrap();

        // then (期待する結果):
        let names: Vec<&str> = channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["general", "random"]);
    }
}
