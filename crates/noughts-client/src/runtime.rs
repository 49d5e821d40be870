//! Terminal runtime.
//!
//! Reads commands from stdin and messages from the server, feeds both into
//! [`ClientState`] and executes the resulting actions.

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    client::ClientState,
    event::{ClientAction, ClientEvent, View},
    input::Command,
    render,
    transport::{self, TransportError},
};

/// Runtime errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not reach the server.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Reading the terminal failed.
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}

/// Connect to `server` and play until the user quits or the server hangs up.
pub async fn run(server: &str) -> Result<(), ClientError> {
    let mut conn = transport::connect(server).await?;
    tracing::info!(%server, "connected");

    render::show_usage();

    let mut state = ClientState::new();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let event = tokio::select! {
            message = conn.from_server.recv() => match message {
                Some(message) => ClientEvent::MessageReceived(message),
                None => ClientEvent::Disconnected,
            },
            line = stdin.next_line() => match line? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => match line.parse::<Command>() {
                    Ok(command) => ClientEvent::CommandEntered(command),
                    Err(e) => {
                        render::show(&View::Hint(e.to_string()));
                        continue;
                    },
                },
                None => ClientEvent::CommandEntered(Command::Quit),
            },
        };

        for action in state.handle(event) {
            match action {
                ClientAction::Send(message) => {
                    if conn.to_server.send(message).await.is_err() {
                        render::show(&View::Disconnected);
                        return Ok(());
                    }
                },
                ClientAction::Show(view) => render::show(&view),
                ClientAction::Quit => {
                    conn.close().await;
                    return Ok(());
                },
            }
        }
    }
}
