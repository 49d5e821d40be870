//! TCP transport for the client.
//!
//! Provides [`ConnectedClient`], which moves typed messages between channels
//! and a socket. Lines are decoded here; game logic stays in the Sans-IO
//! [`crate::ClientState`].

use futures::StreamExt;
use noughts_proto::{ClientMessage, MAX_LINE_LEN, ServerMessage};
use thiserror::Error;
use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt},
    net::TcpStream,
    sync::mpsc,
    task::JoinHandle,
};
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Handle to a connected client.
///
/// Messages are sent and received via the channels; an internal task does
/// the socket I/O. `from_server` yields `None` once the server is gone.
pub struct ConnectedClient {
    /// Send messages to the server.
    pub to_server: mpsc::Sender<ClientMessage>,
    /// Receive messages from the server.
    pub from_server: mpsc::Receiver<ServerMessage>,
    task: JoinHandle<()>,
}

impl ConnectedClient {
    /// Flush pending messages, close the socket and wait for the I/O task.
    pub async fn close(self) {
        let Self { to_server, from_server, task } = self;
        drop(to_server);
        drop(from_server);

        if let Err(e) = task.await {
            tracing::debug!(error = %e, "connection task ended abnormally");
        }
    }
}

/// Connect to a Noughts server over TCP.
pub async fn connect(server_addr: &str) -> Result<ConnectedClient, TransportError> {
    let stream = TcpStream::connect(server_addr)
        .await
        .map_err(|e| TransportError::Connection(format!("{server_addr}: {e}")))?;

    if let Err(e) = stream.set_nodelay(true) {
        tracing::debug!(error = %e, "failed to set TCP_NODELAY");
    }

    Ok(attach(stream))
}

/// Run the client side of the protocol over an already open stream.
pub fn attach<S>(stream: S) -> ConnectedClient
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (to_server_tx, to_server_rx) = mpsc::channel(32);
    let (from_server_tx, from_server_rx) = mpsc::channel(32);

    let task = tokio::spawn(run_connection(stream, to_server_rx, from_server_tx));

    ConnectedClient { to_server: to_server_tx, from_server: from_server_rx, task }
}

/// Bridge between the channels and the socket until either side ends.
async fn run_connection<S>(
    stream: S,
    mut to_server: mpsc::Receiver<ClientMessage>,
    from_server: mpsc::Sender<ServerMessage>,
) where
    S: AsyncRead + AsyncWrite,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LEN));

    loop {
        tokio::select! {
            outgoing = to_server.recv() => {
                let Some(message) = outgoing else { break };
                let line = format!("{}\n", message.encode());
                if let Err(e) = writer.write_all(line.as_bytes()).await {
                    tracing::warn!(error = %e, "send failed");
                    break;
                }
            },
            incoming = lines.next() => match incoming {
                Some(Ok(line)) => match ServerMessage::decode(&line) {
                    Ok(message) => {
                        if from_server.send(message).await.is_err() {
                            break;
                        }
                    },
                    Err(e) => tracing::warn!(%line, error = %e, "ignoring undecodable line"),
                },
                Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                    tracing::warn!(max = MAX_LINE_LEN, "server sent an overlong line");
                    break;
                },
                Some(Err(LinesCodecError::Io(e))) => {
                    tracing::warn!(error = %e, "receive failed");
                    break;
                },
                None => {
                    tracing::debug!("server closed the connection");
                    break;
                },
            },
        }
    }

    if let Err(e) = writer.shutdown().await {
        tracing::debug!(error = %e, "shutdown failed");
    }
}

#[cfg(test)]
mod tests {
    use noughts_proto::{Mark, SeatId};
    use tokio::io::{AsyncBufReadExt, BufReader};

    use super::*;

    #[tokio::test]
    async fn messages_flow_both_ways() {
        let (client_side, server_side) = tokio::io::duplex(1024);
        let mut client = attach(client_side);
        let (server_read, mut server_write) = tokio::io::split(server_side);
        let mut server_lines = BufReader::new(server_read).lines();

        server_write.write_all(b"SIMBOLO|O\nID_JOGADOR|2\n").await.unwrap();
        assert_eq!(client.from_server.recv().await, Some(ServerMessage::Symbol(Mark::O)));
        assert_eq!(client.from_server.recv().await, Some(ServerMessage::PlayerId(SeatId::new(2))));

        client.to_server.send(ClientMessage::Move { row: 1, col: 2 }).await.unwrap();
        assert_eq!(server_lines.next_line().await.unwrap().as_deref(), Some("JOGADA|1|2"));
    }

    #[tokio::test]
    async fn undecodable_lines_are_skipped() {
        let (client_side, server_side) = tokio::io::duplex(1024);
        let mut client = attach(client_side);
        let (_server_read, mut server_write) = tokio::io::split(server_side);

        server_write.write_all(b"NONSENSE|1\nTURNO|1\n").await.unwrap();
        assert_eq!(client.from_server.recv().await, Some(ServerMessage::Turn(SeatId::new(1))));
    }

    #[tokio::test]
    async fn server_close_ends_stream() {
        let (client_side, server_side) = tokio::io::duplex(1024);
        let mut client = attach(client_side);

        drop(server_side);
        assert_eq!(client.from_server.recv().await, None);
        client.close().await;
    }

    #[tokio::test]
    async fn overlong_line_ends_stream() {
        let (client_side, server_side) = tokio::io::duplex(4 * MAX_LINE_LEN);
        let mut client = attach(client_side);
        let (_server_read, mut server_write) = tokio::io::split(server_side);

        server_write.write_all(b"TURNO|2\n").await.unwrap();
        let _ = server_write.write_all(&vec![b'a'; 2 * MAX_LINE_LEN]).await;

        assert_eq!(client.from_server.recv().await, Some(ServerMessage::Turn(SeatId::new(2))));
        assert_eq!(client.from_server.recv().await, None);
    }
}
