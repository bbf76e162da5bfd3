//! Request handlers, split by protocol.

pub mod http;
pub mod websocket;

pub use http::{get_channels, get_me, get_messages, health_check};
pub use websocket::{channel_websocket_handler, default_websocket_handler};
