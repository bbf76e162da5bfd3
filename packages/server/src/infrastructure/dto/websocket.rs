//! WebSocket frame DTOs.

use serde::{Deserialize, Serialize};

/// Client → server frame.
///
/// `username` (re)joins the channel under that name; `message` sends a chat
/// message once a username is bound. Either field may be absent.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct InboundFrame {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Server → client record for one chat message. Also served by `GET /api/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// `None` when the message could not be persisted
    pub id: Option<i64>,
    pub username: String,
    pub content: String,
    /// RFC 3339, UTC, millisecond precision
    pub created: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_frame_with_both_fields() {
        // テスト項目: username と message の両方を含むフレームを解析できる
        // given (前提条件):
        let raw = r#"{"username":"alice","message":"hi"}"#;

        // when (操作):
        let frame: InboundFrame = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        assert_eq!(frame.username.as_deref(), Some("alice"));
        assert_eq!(frame.message.as_deref(), Some("hi"));
    }

    #[test]
    fn test_inbound_frame_ignores_unknown_fields() {
        // テスト項目: 未知のフィールドだけのフレームは両フィールドが空になる
        // given (前提条件):
        let raw = r#"{"typing":true}"#;

        // when (操作):
        let frame: InboundFrame = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        assert_eq!(frame, InboundFrame::default());
    }

    #[test]
    fn test_inbound_frame_rejects_non_string_username() {
        // テスト項目: username が文字列でないフレームは解析エラーになる
        // given (前提条件):
        let raw = r#"{"username":42}"#;

        // when (操作):
        let result = serde_json::from_str::<InboundFrame>(raw);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_message_record_serializes_null_id() {
        // テスト項目: 未保存メッセージの id は null としてシリアライズされる
        // given (前提条件):
        let record = MessageRecord {
            id: None,
            username: "Bot".to_string(),
            content: "alice has joined.".to_string(),
            created: "2023-01-01T00:00:00.000Z".to_string(),
        };

        // when (操作):
        let json = serde_json::to_value(&record).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({
                "id": null,
                "username": "Bot",
                "content": "alice has joined.",
                "created": "2023-01-01T00:00:00.000Z",
            })
        );
    }
}
