//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::Response,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ChannelName, Connection},
    ui::state::AppState,
    usecase::{Channel, ChatSession},
};

/// `/chat`: join the server's default channel
pub async fn default_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let name = state.default_channel.clone();
    upgrade(ws, state, name)
}

/// `/chat/{channel}`: join (and lazily create) the named channel
pub async fn channel_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(channel): Path<String>,
) -> Result<Response, StatusCode> {
    let name = match ChannelName::try_from(channel.clone()) {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!("Rejecting connection to channel '{}': {}", channel, e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };
    Ok(upgrade(ws, state, name))
}

/// The channel is only created once the handshake has completed.
fn upgrade(ws: WebSocketUpgrade, state: Arc<AppState>, name: ChannelName) -> Response {
    ws.on_upgrade(move |socket| async move {
        let channel = state.chat.add_channel(name).await;
        handle_socket(socket, state, channel).await
    })
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: records broadcast by the channel
/// (via rx channel) are sent to this client's WebSocket connection.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, channel: Arc<Channel>) {
    let (sender, mut receiver) = socket.split();

    // Create a queue for this connection to receive broadcasts
    let (tx, rx) = mpsc::unbounded_channel();
    let connection = Connection::new(tx);
    let connection_id = connection.id();
    tracing::info!(
        "Connection {} opened on channel '{}'",
        connection_id,
        channel.name()
    );

    let mut session = ChatSession::new(state.chat.clone(), channel.clone(), connection);
    let mut send_task = pusher_loop(rx, sender);

    // Read frames until the client goes away or the outbound side fails
    loop {
        tokio::select! {
            frame = receiver.next() => {
                let Some(frame) = frame else {
                    break;
                };
                match frame {
                    Ok(Message::Text(text)) => {
                        tracing::debug!("Received text from {}: {}", connection_id, text.as_str());
                        if let Err(e) = session.handle_text(text.as_str()).await {
                            tracing::warn!("Dropping frame from connection {}: {}", connection_id, e);
                        }
                    }
                    Ok(Message::Ping(_)) => {
                        // Ping/pong is handled automatically by the WebSocket protocol
                        tracing::debug!("Received ping");
                    }
                    Ok(Message::Close(_)) => {
                        tracing::info!("Connection {} requested close", connection_id);
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!("WebSocket error on connection {}: {}", connection_id, e);
                        break;
                    }
                }
            }
            _ = &mut send_task => {
                tracing::debug!("Outbound stream of connection {} ended", connection_id);
                break;
            }
        }
    }

    send_task.abort();

    if let Err(e) = session.close().await {
        tracing::warn!(
            "Failed to announce departure for connection {}: {}",
            connection_id,
            e
        );
    }
    tracing::info!(
        "Connection {} closed on channel '{}'",
        connection_id,
        channel.name()
    );
}
