//! Multi-channel WebSocket chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin banter-server
//! cargo run --bin banter-server -- --host 0.0.0.0 --port 3000 --channel rust --channel random
//! cargo run --bin banter-server -- --in-memory
//! ```

use std::{path::PathBuf, sync::Arc};

use banter_server::{
    domain::{ChannelName, ChannelRepository, MessageRepository},
    infrastructure::repository::{
        InMemoryChannelRepository, InMemoryMessageRepository, SqliteStore,
    },
    ui::Server,
    usecase::{Chat, GetChannelsUseCase, GetMessagesUseCase},
};
use banter_shared::{logger::setup_logger, time::SystemClock};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "banter-server")]
#[command(about = "Multi-channel WebSocket chat server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// SQLite database file for messages and channels
    #[arg(short = 'd', long, default_value = "banter.db")]
    database: PathBuf,

    /// Keep messages and channels in memory only (ignores --database)
    #[arg(long)]
    in_memory: bool,

    /// Channel served at `/chat`
    #[arg(long, default_value = "general", value_parser = parse_channel_name)]
    default_channel: ChannelName,

    /// Extra channel to create at startup (repeatable)
    #[arg(short = 'c', long = "channel", value_parser = parse_channel_name)]
    channels: Vec<ChannelName>,
}

fn parse_channel_name(raw: &str) -> Result<ChannelName, String> {
    ChannelName::new(raw.to_string()).map_err(|e| e.to_string())
}

type Stores = (Arc<dyn MessageRepository>, Arc<dyn ChannelRepository>);

fn open_stores(args: &Args) -> Result<Stores, Box<dyn std::error::Error>> {
    if args.in_memory {
        tracing::info!("Using in-memory storage");
        let messages: Arc<dyn MessageRepository> = Arc::new(InMemoryMessageRepository::new());
        let channels: Arc<dyn ChannelRepository> = Arc::new(InMemoryChannelRepository::new());
        return Ok((messages, channels));
    }

    let store = Arc::new(SqliteStore::open(&args.database)?);
    let messages: Arc<dyn MessageRepository> = store.clone();
    let channels: Arc<dyn ChannelRepository> = store;
    Ok((messages, channels))
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize dependencies in order:
    // 1. Repositories
    // 2. Chat (channel registry, pre-seeded from storage)
    // 3. UseCases
    // 4. Server

    // 1. Create Repositories
    let (messages, channels) = open_stores(&args)?;

    // 2. Create Chat
    let chat = Arc::new(
        Chat::load(messages.clone(), channels.clone(), Arc::new(SystemClock)).await?,
    );
    chat.add_channel(args.default_channel.clone()).await;
    for name in args.channels {
        chat.add_channel(name).await;
    }
    let names: Vec<String> = chat
        .channel_names()
        .await
        .into_iter()
        .map(ChannelName::into_string)
        .collect();
    tracing::info!("Channels ready: {}", names.join(", "));

    // 3. Create UseCases
    let get_messages_usecase = Arc::new(GetMessagesUseCase::new(messages));
    let get_channels_usecase = Arc::new(GetChannelsUseCase::new(channels));

    // 4. Create and run the server
    let server = Server::new(
        chat,
        args.default_channel,
        get_messages_usecase,
        get_channels_usecase,
    );
    server.run(args.host, args.port).await
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    if let Err(e) = run(args).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
