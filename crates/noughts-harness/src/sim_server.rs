//! Simulation server wrapper for testing with turmoil.
//!
//! `SimServer` runs the production [`GameHub`] (authority, sessions, restart
//! timer) unchanged; only the listener and the clock are swapped for
//! turmoil's TCP and [`SimEnv`].

use std::io;

use noughts_server::{AuthorityConfig, GameHub, ServerError, SessionConfig};
use turmoil::net::TcpListener;

use crate::SimEnv;

/// Simulation server for testing with turmoil.
pub struct SimServer {
    listener: TcpListener,
    hub: GameHub<SimEnv>,
}

impl SimServer {
    /// Create and bind a new simulation server with default settings.
    pub async fn bind(address: &str) -> Result<Self, ServerError> {
        Self::bind_with_config(address, AuthorityConfig::default(), SessionConfig::default()).await
    }

    /// Create and bind a new simulation server with custom settings.
    pub async fn bind_with_config(
        address: &str,
        authority: AuthorityConfig,
        session: SessionConfig,
    ) -> Result<Self, ServerError> {
        let hub = GameHub::new(SimEnv::new(), authority, session)?;
        let listener = TcpListener::bind(address).await?;

        Ok(Self { listener, hub })
    }

    /// Accept connections forever, one session task each.
    pub async fn run(self) -> io::Result<()> {
        loop {
            let (stream, peer) = self.listener.accept().await?;
            tracing::debug!(%peer, "sim connection accepted");

            let hub = self.hub.clone();
            tokio::spawn(async move {
                hub.serve(stream).await;
            });
        }
    }
}
