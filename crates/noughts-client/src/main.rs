//! Noughts terminal client.
//!
//! ```bash
//! noughts-client --server 127.0.0.1:12345
//! ```

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Noughts terminal client
#[derive(Parser, Debug)]
#[command(name = "noughts-client")]
#[command(about = "Play noughts and crosses against another player")]
#[command(version)]
struct Args {
    /// Server address to connect to
    #[arg(short, long, default_value = "localhost:12345")]
    server: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // stdout belongs to the board; logs go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(noughts_client::runtime::run(&args.server).await?)
}
