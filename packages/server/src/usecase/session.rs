//! UseCase: WebSocket セッションの状態遷移
//!
//! 1 接続ごとに `Unjoined` → `Joined(username)` の状態を持ち、
//! 受信フレームに応じて参加・メッセージ送信を、切断時に退出処理を行います。

use std::sync::Arc;

use crate::{
    domain::{Connection, Username},
    infrastructure::dto::websocket::InboundFrame,
};

use super::{channel::Channel, chat::Chat, error::SessionError};

/// Where a connection stands in its channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No username bound yet; chat messages are ignored
    Unjoined,
    /// Registered in the channel under this username
    Joined(Username),
}

/// Per-connection state machine driven by inbound frames.
pub struct ChatSession {
    chat: Arc<Chat>,
    channel: Arc<Channel>,
    connection: Connection,
    state: SessionState,
}

impl ChatSession {
    pub fn new(chat: Arc<Chat>, channel: Arc<Channel>, connection: Connection) -> Self {
        Self {
            chat,
            channel,
            connection,
            state: SessionState::Unjoined,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Parse a text frame and apply it.
    ///
    /// # Errors
    ///
    /// [`SessionError::MalformedFrame`] if `text` is not a JSON object with
    /// optional string `username`/`message` fields. The session stays usable.
    pub async fn handle_text(&mut self, text: &str) -> Result<(), SessionError> {
        let frame: InboundFrame =
            serde_json::from_str(text).map_err(|e| SessionError::MalformedFrame(e.to_string()))?;
        self.handle_frame(frame).await
    }

    /// Apply a frame: `username` first (join), then `message` (send).
    pub async fn handle_frame(&mut self, frame: InboundFrame) -> Result<(), SessionError> {
        if let Some(raw) = frame.username {
            let username = Username::participant(raw).map_err(SessionError::InvalidUsername)?;
            self.join(username).await?;
        }

        if let Some(message) = frame.message {
            match &self.state {
                SessionState::Joined(username) => {
                    self.chat
                        .send(username, &message, self.channel.name())
                        .await?;
                }
                SessionState::Unjoined => {
                    tracing::debug!(
                        "Ignoring message from unjoined connection {} on '{}'",
                        self.connection.id(),
                        self.channel.name()
                    );
                }
            }
        }

        Ok(())
    }

    async fn join(&mut self, username: Username) -> Result<(), SessionError> {
        // Renaming drops the old name's registration for this socket.
        if let SessionState::Joined(previous) = &self.state {
            if previous != &username {
                self.channel.leave(previous, self.connection.id()).await;
            }
        }

        let replaced = self
            .channel
            .join(username.clone(), self.connection.clone())
            .await;
        if let Some(replaced) = replaced {
            if replaced.id() != self.connection.id() {
                tracing::info!(
                    "'{}' rejoined '{}' from connection {}, superseding {}",
                    username,
                    self.channel.name(),
                    self.connection.id(),
                    replaced.id()
                );
            }
        }

        self.state = SessionState::Joined(username.clone());
        tracing::info!("'{}' joined channel '{}'", username, self.channel.name());

        self.chat
            .bot(&format!("{} has joined.", username), self.channel.name())
            .await?;
        Ok(())
    }

    /// Tear the session down after the socket closed.
    ///
    /// Announces the departure only if this socket still owned its registration.
    pub async fn close(self) -> Result<(), SessionError> {
        let SessionState::Joined(username) = self.state else {
            return Ok(());
        };

        if !self.channel.leave(&username, self.connection.id()).await {
            tracing::debug!(
                "'{}' on '{}' was already superseded by a newer connection",
                username,
                self.channel.name()
            );
            return Ok(());
        }

        tracing::info!("'{}' left channel '{}'", username, self.channel.name());
        self.chat
            .bot(&format!("{} has left", username), self.channel.name())
            .await?;
        Ok(())
    }
}
