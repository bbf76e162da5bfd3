//! Repository implementations.
//!
//! - `inmemory`: process-local stores, used for tests and `--in-memory` runs
//! - `sqlite`: SQLite-backed store

pub mod inmemory;
pub mod sqlite;

pub use inmemory::{InMemoryChannelRepository, InMemoryMessageRepository};
pub use sqlite::SqliteStore;
