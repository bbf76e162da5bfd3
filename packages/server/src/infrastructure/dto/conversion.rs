//! Conversion logic between DTOs and domain entities.

use crate::domain::entity;
use crate::infrastructure::dto::{http, websocket};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&entity::ChatMessage> for websocket::MessageRecord {
    fn from(model: &entity::ChatMessage) -> Self {
        Self {
            id: model.id.map(|id| id.value()),
            username: model.username.as_str().to_string(),
            content: model.content.as_str().to_string(),
            created: model.created_at.to_rfc3339(),
        }
    }
}

impl From<entity::ChatMessage> for websocket::MessageRecord {
    fn from(model: entity::ChatMessage) -> Self {
        Self::from(&model)
    }
}

impl From<entity::ChannelRecord> for http::ChannelDto {
    fn from(model: entity::ChannelRecord) -> Self {
        Self {
            id: model.id.map(|id| id.value()),
            created: model.created_at.to_rfc3339(),
            name: model.name.into_string(),
        }
    }
}
