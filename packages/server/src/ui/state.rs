//! Server state shared by every handler.

use std::sync::Arc;

use crate::{
    domain::ChannelName,
    usecase::{Chat, GetChannelsUseCase, GetMessagesUseCase},
};

/// Shared application state
pub struct AppState {
    /// Channel registry（接続中の参加者とブロードキャスト）
    pub chat: Arc<Chat>,
    /// Channel served at `/chat`
    pub default_channel: ChannelName,
    /// GetMessagesUseCase（メッセージ一覧取得のユースケース）
    pub get_messages_usecase: Arc<GetMessagesUseCase>,
    /// GetChannelsUseCase（チャンネル一覧取得のユースケース）
    pub get_channels_usecase: Arc<GetChannelsUseCase>,
}
