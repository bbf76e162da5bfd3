//! SQLite-backed message and channel store.
//!
//! A single connection sits behind a mutex. Statements run on the blocking
//! pool so a slow disk never stalls the async workers.

mod migrations;

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use banter_shared::time::parse_rfc3339;
use rusqlite::{Connection, ErrorCode};
use tracing::{info, warn};

use crate::domain::{
    ChannelId, ChannelName, ChannelRecord, ChannelRepository, ChatMessage, MessageContent,
    MessageId, MessageRepository, RepositoryError, Timestamp, Username,
};

type MessageRow = (i64, String, String, String);
type ChannelRow = (i64, String, String);

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database file at `path` and apply the schema.
    pub fn open(path: &Path) -> Result<Self, RepositoryError> {
        let conn = Connection::open(path).map_err(storage_error)?;

        // WAL mode for concurrent readers
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(storage_error)?;

        migrations::run(&conn).map_err(storage_error)?;

        info!("Database opened at {}", path.display());
        Ok(Self::from_connection(conn))
    }

    /// Open a private in-memory database with the schema applied.
    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        let conn = Connection::open_in_memory().map_err(storage_error)?;
        migrations::run(&conn).map_err(storage_error)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run `f` against the connection on the blocking thread pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&Connection) -> Result<T, RepositoryError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| RepositoryError::Storage(format!("DB lock poisoned: {}", e)))?;
            f(&conn)
        })
        .await
        .map_err(|e| RepositoryError::Storage(format!("spawn_blocking join error: {}", e)))?
    }
}

#[async_trait]
impl MessageRepository for SqliteStore {
    async fn insert(&self, message: &ChatMessage) -> Result<MessageId, RepositoryError> {
        let username = message.username.as_str().to_string();
        let content = message.content.as_str().to_string();
        let created = message.created_at.to_rfc3339();

        let id = self
            .with_conn(move |conn| {
                conn.execute(
                    "INSERT INTO messages (username, content, created) VALUES (?1, ?2, ?3)",
                    (username, content, created),
                )
                .map_err(storage_error)?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        Ok(MessageId::new(id))
    }

    /// Rows that no longer validate are logged and left out.
    async fn list_all(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = self
            .with_conn(|conn| select_messages(conn).map_err(storage_error))
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| match message_from_row(row) {
                Ok(message) => Some(message),
                Err(e) => {
                    warn!("Skipping stored message: {}", e);
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl ChannelRepository for SqliteStore {
    async fn insert(&self, channel: &ChannelRecord) -> Result<ChannelId, RepositoryError> {
        let name = channel.name.to_string();
        let created = channel.created_at.to_rfc3339();

        let id = self
            .with_conn(move |conn| {
                let inserted = conn.execute(
                    "INSERT INTO channels (name, created) VALUES (?1, ?2)",
                    (name.as_str(), created),
                );
                match inserted {
                    Ok(_) => Ok(conn.last_insert_rowid()),
                    Err(e) if e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) => {
                        Err(RepositoryError::Conflict(name))
                    }
                    Err(e) => Err(storage_error(e)),
                }
            })
            .await?;
        Ok(ChannelId::new(id))
    }

    /// Rows that no longer validate are logged and left out.
    async fn list_all(&self) -> Result<Vec<ChannelRecord>, RepositoryError> {
        let rows = self
            .with_conn(|conn| select_channels(conn).map_err(storage_error))
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| match channel_from_row(row) {
                Ok(channel) => Some(channel),
                Err(e) => {
                    warn!("Skipping stored channel: {}", e);
                    None
                }
            })
            .collect())
    }
}

fn select_messages(conn: &Connection) -> rusqlite::Result<Vec<MessageRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, content, created FROM messages ORDER BY id")?;
    stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?
    .collect()
}

fn select_channels(conn: &Connection) -> rusqlite::Result<Vec<ChannelRow>> {
    let mut stmt = conn.prepare("SELECT id, name, created FROM channels ORDER BY id")?;
    stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?
    .collect()
}

fn message_from_row(
    (id, username, content, created): MessageRow,
) -> Result<ChatMessage, RepositoryError> {
    let username = Username::new(username)
        .map_err(|e| RepositoryError::Corrupted(format!("message {}: {}", id, e)))?;
    Ok(ChatMessage::new(
        username,
        MessageContent::truncated(&content),
        parse_created(id, &created)?,
    )
    .with_id(MessageId::new(id)))
}

fn channel_from_row((id, name, created): ChannelRow) -> Result<ChannelRecord, RepositoryError> {
    let name = ChannelName::new(name)
        .map_err(|e| RepositoryError::Corrupted(format!("channel {}: {}", id, e)))?;
    Ok(ChannelRecord::new(name, parse_created(id, &created)?).with_id(ChannelId::new(id)))
}

fn parse_created(id: i64, raw: &str) -> Result<Timestamp, RepositoryError> {
    parse_rfc3339(raw)
        .map(Timestamp::new)
        .ok_or_else(|| RepositoryError::Corrupted(format!("row {}: bad timestamp '{}'", id, raw)))
}

fn storage_error(e: rusqlite::Error) -> RepositoryError {
    RepositoryError::Storage(e.to_string())
}
