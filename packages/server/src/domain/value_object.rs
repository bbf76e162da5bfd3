//! Value objects for the chat domain.

use std::fmt;

use banter_shared::time::timestamp_to_rfc3339;
use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum number of characters kept from a chat message.
pub const MAX_MESSAGE_LENGTH: usize = 256;

/// Maximum number of characters allowed in a channel name.
pub const MAX_CHANNEL_NAME_LENGTH: usize = 64;

/// Reserved sender name for join/leave announcements.
pub const BOT_USERNAME: &str = "Bot";

/// Name a participant joined a channel under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Username(String);

impl Username {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyUsername);
        }
        Ok(Self(value))
    }

    /// Validate a name supplied by a client: like [`Username::new`], but the
    /// announcement sender's name is refused.
    pub fn participant(value: String) -> Result<Self, ValueObjectError> {
        let username = Self::new(value)?;
        if username.is_bot() {
            return Err(ValueObjectError::ReservedUsername(username.0));
        }
        Ok(username)
    }

    /// The reserved sender used for system announcements.
    pub fn bot() -> Self {
        Self(BOT_USERNAME.to_string())
    }

    pub fn is_bot(&self) -> bool {
        self.0 == BOT_USERNAME
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Username {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique channel key, also used as the `/chat/{channel}` path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelName(String);

impl ChannelName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyChannelName);
        }

        let length = value.chars().count();
        if length > MAX_CHANNEL_NAME_LENGTH {
            return Err(ValueObjectError::ChannelNameTooLong {
                max: MAX_CHANNEL_NAME_LENGTH,
                actual: length,
            });
        }

        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(ValueObjectError::InvalidChannelName(value));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ChannelName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Message body, never longer than [`MAX_MESSAGE_LENGTH`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    /// Keep the first [`MAX_MESSAGE_LENGTH`] characters of `raw` and drop the rest.
    pub fn truncated(raw: &str) -> Self {
        match raw.char_indices().nth(MAX_MESSAGE_LENGTH) {
            Some((cut, _)) => Self(raw[..cut].to_string()),
            None => Self(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unix timestamp in UTC milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn to_rfc3339(&self) -> String {
        timestamp_to_rfc3339(self.0)
    }
}

/// Identifier assigned to a message by the message store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(i64);

impl MessageId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Identifier assigned to a channel record by the channel store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(i64);

impl ChannelId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Identity of one accepted WebSocket, distinct across reconnects of the same user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rejects_empty() {
        // テスト項目: 空のユーザー名は作成できない
        // given (前提条件):
        let raw = String::new();

        // when (操作):
        let result = Username::new(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::EmptyUsername));
    }

    #[test]
    fn test_username_bot_is_reserved_name() {
        // テスト項目: Bot ユーザー名が予約名と一致する
        // given (前提条件):
        let alice = Username::new("alice".to_string()).unwrap();

        // when (操作):
        let bot = Username::bot();

        // then (期待する結果):
        assert_eq!(bot.as_str(), "Bot");
        assert!(bot.is_bot());
        assert!(!alice.is_bot());
    }

    #[test]
    fn test_participant_username_refuses_bot() {
        // テスト項目: クライアントが指定するユーザー名として Bot は使えない
        // given (前提条件):
        let reserved = BOT_USERNAME.to_string();

        // when (操作):
        let bot = Username::participant(reserved);
        let empty = Username::participant(String::new());
        let alice = Username::participant("alice".to_string());

        // then (期待する結果):
        assert_eq!(bot, Err(ValueObjectError::ReservedUsername("Bot".to_string())));
        assert_eq!(empty, Err(ValueObjectError::EmptyUsername));
        assert_eq!(alice.unwrap().as_str(), "alice");
        // stored announcements still load under the reserved name
        assert!(Username::new(BOT_USERNAME.to_string()).unwrap().is_bot());
    }

    #[test]
    fn test_channel_name_validation() {
        // テスト項目: チャンネル名の文字種と長さが検証される
        // given (前提条件):
        let too_long = "a".repeat(MAX_CHANNEL_NAME_LENGTH + 1);

        // when (操作):
        let valid = ChannelName::new("rust-lang_2.0".to_string());
        let empty = ChannelName::new(String::new());
        let spaced = ChannelName::new("general chat".to_string());
        let long = ChannelName::new(too_long);

        // then (期待する結果):
        assert!(valid.is_ok());
        assert_eq!(empty, Err(ValueObjectError::EmptyChannelName));
        assert!(matches!(
            spaced,
            Err(ValueObjectError::InvalidChannelName(_))
        ));
        assert_eq!(
            long,
            Err(ValueObjectError::ChannelNameTooLong {
                max: MAX_CHANNEL_NAME_LENGTH,
                actual: MAX_CHANNEL_NAME_LENGTH + 1
            })
        );
    }

    #[test]
    fn test_message_content_keeps_short_messages() {
        // テスト項目: 256 文字以下のメッセージはそのまま保持される
        // given (前提条件):
        let exact = "x".repeat(MAX_MESSAGE_LENGTH);

        // when (操作):
        let short = MessageContent::truncated("Hello!");
        let boundary = MessageContent::truncated(&exact);

        // then (期待する結果):
        assert_eq!(short.as_str(), "Hello!");
        assert_eq!(boundary.as_str(), exact);
    }

    #[test]
    fn test_message_content_truncates_to_first_256_chars() {
        // テスト項目: 256 文字を超えるメッセージは先頭 256 文字に切り詰められ、省略記号は付かない
        // given (前提条件):
        let head = "a".repeat(MAX_MESSAGE_LENGTH);
        let raw = format!("{}{}", head, "tail that gets dropped");

        // when (操作):
        let content = MessageContent::truncated(&raw);

        // then (期待する結果):
        assert_eq!(content.as_str(), head);
        assert!(!content.as_str().ends_with("..."));
    }

    #[test]
    fn test_message_content_truncates_on_char_boundaries() {
        // テスト項目: マルチバイト文字はバイトではなく文字単位で切り詰められる
        // given (前提条件):
        let raw = "あ".repeat(MAX_MESSAGE_LENGTH + 10);

        // when (操作):
        let content = MessageContent::truncated(&raw);

        // then (期待する結果):
        assert_eq!(content.as_str().chars().count(), MAX_MESSAGE_LENGTH);
        assert_eq!(content.as_str(), "あ".repeat(MAX_MESSAGE_LENGTH));
    }

    #[test]
    fn test_connection_ids_are_unique() {
        // テスト項目: 接続 ID は生成ごとに異なる
        // given (前提条件):
        let first = ConnectionId::generate();

        // when (操作):
        let second = ConnectionId::generate();

        // then (期待する結果):
        assert_ne!(first, second);
    }

    #[test]
    fn test_timestamp_renders_rfc3339() {
        // テスト項目: Timestamp が RFC 3339 文字列に変換される
        // given (前提条件):
        let timestamp = Timestamp::new(1672531200000);

        // when (操作):
        let rendered = timestamp.to_rfc3339();

        // then (期待する結果):
        assert_eq!(rendered, "2023-01-01T00:00:00.000Z");
    }
}
