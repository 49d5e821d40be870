//! Noughts server binary.
//!
//! # Usage
//!
//! ```bash
//! # Listen on the default port
//! noughts-server
//!
//! # Shorter pause between games, verbose logs
//! noughts-server --bind 127.0.0.1:12345 --restart-delay-secs 2 --log-level debug
//! ```

use std::time::Duration;

use clap::Parser;
use noughts_server::{AuthorityConfig, Server, ServerRuntimeConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Noughts game server
#[derive(Parser, Debug)]
#[command(name = "noughts-server")]
#[command(about = "Two-player noughts and crosses over TCP")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = "0.0.0.0:12345")]
    bind: String,

    /// Seconds between the end of a game and the start of the next
    #[arg(long, default_value = "5")]
    restart_delay_secs: u64,

    /// Seconds a single socket write may take before the player is dropped
    #[arg(long, default_value = "5")]
    write_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("Noughts server starting");
    tracing::info!("Binding to {}", args.bind);

    let config = ServerRuntimeConfig {
        bind_address: args.bind,
        write_timeout: Duration::from_secs(args.write_timeout_secs),
        authority: AuthorityConfig { restart_delay: Duration::from_secs(args.restart_delay_secs) },
        ..Default::default()
    };

    let server = Server::bind(config).await?;

    tracing::info!("Server listening on {}", server.local_addr()?);

    server.run().await?;

    Ok(())
}
