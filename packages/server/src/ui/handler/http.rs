//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    infrastructure::dto::{
        http::{ChannelDto, MeDto},
        websocket::MessageRecord,
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// List every persisted message
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MessageRecord>>, StatusCode> {
    match state.get_messages_usecase.execute().await {
        // Domain Model から DTO への変換
        Ok(messages) => Ok(Json(messages.into_iter().map(MessageRecord::from).collect())),
        Err(e) => {
            tracing::error!("Failed to list messages: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// List every persisted channel
pub async fn get_channels(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ChannelDto>>, StatusCode> {
    match state.get_channels_usecase.execute().await {
        Ok(channels) => Ok(Json(channels.into_iter().map(ChannelDto::from).collect())),
        Err(e) => {
            tracing::error!("Failed to list channels: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Current user. Nothing authenticates requests, so this is always `{}`.
pub async fn get_me() -> Json<MeDto> {
    Json(MeDto::default())
}
