//! Noughts game server.
//!
//! Plain TCP, one UTF-8 line per message, two seats, one game at a time.
//!
//! # Architecture
//!
//! The [`GameAuthority`] follows the Sans-IO pattern: it takes
//! [`ServerEvent`]s and returns [`ServerAction`]s without doing any I/O. The
//! [`GameHub`] wraps it in a mutex together with each connection's outbound
//! queue and executes the actions. [`Server`] accepts TCP connections and
//! hands each one to the hub.
//!
//! # Components
//!
//! - [`GameAuthority`]: seats, turns, results (pure logic, no I/O)
//! - [`SeatRegistry`]: session to seat mapping
//! - [`GameHub`]: shared state, session tasks, restart timer
//! - [`Server`]: production runtime on a tokio TCP listener
//! - [`SystemEnv`]: production environment (real time)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod authority;
mod error;
mod hub;
mod registry;
mod session;
mod system_env;

use std::{net::SocketAddr, time::Duration};

pub use authority::{
    AuthorityConfig, GameAuthority, LogLevel, ServerAction, ServerEvent, notice,
};
pub use error::{AuthorityError, ServerError};
pub use hub::{EVENT_HEADROOM, GameHub, SessionConfig};
pub use registry::{SEAT_COUNT, Seat, SeatRegistry};
pub use system_env::SystemEnv;
use tokio::net::TcpListener;

/// Server configuration for the production runtime.
#[derive(Debug, Clone)]
pub struct ServerRuntimeConfig {
    /// Address to bind to (e.g., "0.0.0.0:12345")
    pub bind_address: String,
    /// Lines that may wait in a session's outbound queue
    pub outbound_queue: usize,
    /// Longest a single socket write may take
    pub write_timeout: Duration,
    /// Game authority configuration (restart delay)
    pub authority: AuthorityConfig,
}

impl Default for ServerRuntimeConfig {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            bind_address: "0.0.0.0:12345".to_string(),
            outbound_queue: session.outbound_queue,
            write_timeout: session.write_timeout,
            authority: AuthorityConfig::default(),
        }
    }
}

/// Production Noughts server.
///
/// Wraps a [`GameHub`] with a tokio TCP listener and the system environment.
pub struct Server {
    listener: TcpListener,
    hub: GameHub<SystemEnv>,
}

impl Server {
    /// Create and bind a new server.
    pub async fn bind(config: ServerRuntimeConfig) -> Result<Self, ServerError> {
        let session = SessionConfig {
            outbound_queue: config.outbound_queue,
            write_timeout: config.write_timeout,
        };
        let hub = GameHub::new(SystemEnv::new(), config.authority, session)?;

        let listener = TcpListener::bind(&config.bind_address).await?;

        Ok(Self { listener, hub })
    }

    /// Run the server, accepting connections until the task is dropped.
    ///
    /// Accept errors are logged and do not stop the loop.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Server starting on {}", self.local_addr()?);

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    tracing::debug!(%peer, "connection accepted");

                    if let Err(e) = stream.set_nodelay(true) {
                        tracing::debug!(%peer, error = %e, "failed to set TCP_NODELAY");
                    }

                    let hub = self.hub.clone();
                    tokio::spawn(async move {
                        hub.serve(stream).await;
                    });
                },
                Err(e) => {
                    tracing::error!("Accept error: {}", e);
                },
            }
        }
    }

    /// Local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Shared state behind this server.
    pub fn hub(&self) -> &GameHub<SystemEnv> {
        &self.hub
    }
}
