//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{
    domain::ChannelName,
    usecase::{Chat, GetChannelsUseCase, GetMessagesUseCase},
};

use super::{
    handler::{
        channel_websocket_handler, default_websocket_handler, get_channels, get_me, get_messages,
        health_check,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat server
///
/// This struct encapsulates the server's dependencies and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(chat, default_channel, get_messages_usecase, get_channels_usecase);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// Chat（チャンネルレジストリ）
    chat: Arc<Chat>,
    /// `/chat` で接続するチャンネル
    default_channel: ChannelName,
    /// GetMessagesUseCase（メッセージ一覧取得のユースケース）
    get_messages_usecase: Arc<GetMessagesUseCase>,
    /// GetChannelsUseCase（チャンネル一覧取得のユースケース）
    get_channels_usecase: Arc<GetChannelsUseCase>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `chat` - Channel registry shared by every connection
    /// * `default_channel` - Channel served at `/chat`
    /// * `get_messages_usecase` - UseCase for listing messages
    /// * `get_channels_usecase` - UseCase for listing channels
    pub fn new(
        chat: Arc<Chat>,
        default_channel: ChannelName,
        get_messages_usecase: Arc<GetMessagesUseCase>,
        get_channels_usecase: Arc<GetChannelsUseCase>,
    ) -> Self {
        Self {
            chat,
            default_channel,
            get_messages_usecase,
            get_channels_usecase,
        }
    }

    /// Build the router with every endpoint and the shared state attached.
    pub fn router(self) -> Router {
        let app_state = Arc::new(AppState {
            chat: self.chat,
            default_channel: self.default_channel,
            get_messages_usecase: self.get_messages_usecase,
            get_channels_usecase: self.get_channels_usecase,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/chat", get(default_websocket_handler))
            .route("/chat/{channel}", get(channel_websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/messages", get(get_messages))
            .route("/api/channels", get(get_channels))
            .route("/api/me", get(get_me))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the WebSocket chat server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let default_channel = self.default_channel.clone();
        let app = self.router();

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat server listening on {}", listener.local_addr()?);
        tracing::info!(
            "Connect to: ws://{}/chat ('{}') or ws://{}/chat/{{channel}}",
            bind_addr,
            default_channel,
            bind_addr
        );
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
