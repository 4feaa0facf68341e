use anyhow::Result;
use clap::Parser;
use colored::*;
use huddle_core::RoomId;
use huddle_server::{ServerConfig, SignalingServer};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// Signaling coordinator for peer-to-peer audio/video rooms.
#[derive(Parser)]
#[command(name = "huddle")]
#[command(version, about)]
struct Cli {
    /// Address to listen on.
    #[arg(long, env = "HUDDLE_BIND", default_value = "0.0.0.0:3000")]
    bind: SocketAddr,

    /// Room joined by clients connecting to `/ws`.
    #[arg(long, env = "HUDDLE_DEFAULT_ROOM", default_value = "1")]
    default_room: String,

    /// Report undeliverable offers, answers and candidates back to the sender.
    #[arg(long, env = "HUDDLE_DELIVERY_RECEIPTS")]
    delivery_receipts: bool,

    /// Capacity of the membership event channel.
    #[arg(long, env = "HUDDLE_EVENT_CAPACITY", default_value_t = 256)]
    event_capacity: usize,
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            bind: cli.bind,
            default_room: RoomId::from(cli.default_room),
            delivery_receipts: cli.delivery_receipts,
            event_capacity: cli.event_capacity,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from(Cli::parse());

    println!("{}", "Starting huddle signaling server...".green().bold());
    println!("   Listening:    {}", config.bind.to_string().cyan());
    println!("   Default room: {}", config.default_room.to_string().cyan());
    if config.delivery_receipts {
        println!("   {}", "Delivery receipts enabled".yellow());
    }

    SignalingServer::new(config).run().await
}
