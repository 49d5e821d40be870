//! Simulated player for turmoil scenarios.
//!
//! Drives the real client transport over a turmoil socket and feeds every
//! received message through a [`ClientState`], so scenarios can assert on
//! both the wire traffic and the client's view of the game.

use std::{io, time::Duration};

use noughts_client::{
    ClientEvent, ClientState,
    transport::{self, ConnectedClient},
};
use noughts_proto::{ClientMessage, ServerMessage, Tag};
use turmoil::net::TcpStream;

/// How long a player waits for the next message before giving up.
pub const RECV_TIMEOUT: Duration = Duration::from_secs(30);

/// A player connected to a simulated server.
pub struct SimPlayer {
    connection: ConnectedClient,
    state: ClientState,
    received: Vec<ServerMessage>,
}

impl SimPlayer {
    /// Connect to `address` inside the simulation.
    pub async fn connect(address: &str) -> io::Result<Self> {
        let stream = TcpStream::connect(address).await?;

        Ok(Self {
            connection: transport::attach(stream),
            state: ClientState::new(),
            received: Vec::new(),
        })
    }

    /// Send a message to the server.
    pub async fn send(&self, message: ClientMessage) -> io::Result<()> {
        self.connection
            .to_server
            .send(message)
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "connection task ended"))
    }

    /// Send a move.
    pub async fn play(&self, row: i32, col: i32) -> io::Result<()> {
        self.send(ClientMessage::Move { row, col }).await
    }

    /// Next message from the server.
    ///
    /// `None` when the server closed the connection or nothing arrived
    /// within [`RECV_TIMEOUT`].
    pub async fn recv(&mut self) -> Option<ServerMessage> {
        let message = tokio::time::timeout(RECV_TIMEOUT, self.connection.from_server.recv())
            .await
            .ok()
            .flatten()?;

        self.state.handle(ClientEvent::MessageReceived(message.clone()));
        self.received.push(message.clone());
        Some(message)
    }

    /// Read until a message with `tag` arrives, returning it.
    pub async fn recv_tag(&mut self, tag: Tag) -> Option<ServerMessage> {
        loop {
            let message = self.recv().await?;
            if message.tag() == tag {
                return Some(message);
            }
        }
    }

    /// Read until the server closes the connection.
    ///
    /// Returns `false` if the connection stayed open past [`RECV_TIMEOUT`].
    pub async fn recv_eof(&mut self) -> bool {
        loop {
            match tokio::time::timeout(RECV_TIMEOUT, self.connection.from_server.recv()).await {
                Ok(Some(message)) => {
                    self.state.handle(ClientEvent::MessageReceived(message.clone()));
                    self.received.push(message);
                },
                Ok(None) => return true,
                Err(_) => return false,
            }
        }
    }

    /// This player's view of the game.
    pub fn state(&self) -> &ClientState {
        &self.state
    }

    /// Every message received so far, in order.
    pub fn received(&self) -> &[ServerMessage] {
        &self.received
    }

    /// Close the connection.
    pub async fn disconnect(self) {
        self.connection.close().await;
    }
}
