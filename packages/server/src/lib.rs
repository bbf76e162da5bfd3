//! Multi-channel WebSocket chat server.
//!
//! Clients connect to a channel over WebSocket, bind a username, and exchange
//! short text messages. Every message is persisted best-effort and broadcast
//! to the other participants of the same channel.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
