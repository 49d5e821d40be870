//! Connection sessions.
//!
//! Each connection is split in two tasks. The reader turns lines into
//! authority events; the writer drains the session's outbound queue onto the
//! socket. The hub holds the other ends: a [`SessionHandle`] with the queue
//! sender and a close signal.
//!
//! Dropping the handle ends the session from the server side. The writer
//! still flushes whatever was queued before the drop, then shuts the socket
//! down, so a final notice reaches the peer ahead of the close.

use std::time::Duration;

use futures::StreamExt;
use noughts_core::Environment;
use noughts_proto::{ClientMessage, MAX_LINE_LEN};
use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt},
    sync::{mpsc, oneshot},
};
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};

use crate::{authority::ServerEvent, hub::GameHub};

/// Queue full or writer gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Undeliverable;

/// Hub-side end of a session.
pub(crate) struct SessionHandle {
    outbound: mpsc::Sender<String>,
    _close: oneshot::Sender<()>,
}

impl SessionHandle {
    /// Create a handle and the receiving ends for the session tasks.
    pub(crate) fn new(queue: usize) -> (Self, mpsc::Receiver<String>, oneshot::Receiver<()>) {
        let (outbound, outbound_rx) = mpsc::channel(queue);
        let (close, close_rx) = oneshot::channel();
        (Self { outbound, _close: close }, outbound_rx, close_rx)
    }

    /// Enqueue one encoded line without waiting.
    ///
    /// Readers wait for queue room before submitting, so a full queue here
    /// means the writer is stuck and the session is treated as gone.
    pub(crate) fn send(&self, line: String) -> Result<(), Undeliverable> {
        self.outbound.try_send(line).map_err(|_| Undeliverable)
    }

    /// Another sender for the outbound queue.
    pub(crate) fn outbound(&self) -> mpsc::Sender<String> {
        self.outbound.clone()
    }
}

/// Serve one connection until either side ends it.
pub(crate) async fn run<E, S>(hub: GameHub<E>, stream: S)
where
    E: Environment,
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (read_half, write_half) = tokio::io::split(stream);
    let (session_id, outbound, closed) = hub.open_session().await;

    tracing::debug!(session_id, "session opened");

    let writer = tokio::spawn(write_loop(session_id, write_half, outbound, hub.write_timeout()));
    let reason = read_loop(&hub, session_id, read_half, closed).await;

    hub.close_session(session_id, reason).await;

    if let Err(e) = writer.await {
        tracing::warn!(session_id, error = %e, "writer task failed");
    }

    tracing::debug!(session_id, "session finished");
}

async fn read_loop<E, R>(
    hub: &GameHub<E>,
    session_id: u64,
    reader: R,
    mut closed: oneshot::Receiver<()>,
) -> String
where
    E: Environment,
    R: AsyncRead + Unpin,
{
    let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LEN));

    loop {
        tokio::select! {
            _ = &mut closed => return "closed by server".to_string(),
            line = lines.next() => match line {
                Some(Ok(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }

                    let event = match ClientMessage::decode(&line) {
                        Ok(message) => ServerEvent::MessageReceived { session_id, message },
                        Err(error) => {
                            tracing::debug!(session_id, %error, "malformed line");
                            ServerEvent::MalformedLine { session_id, error }
                        },
                    };
                    hub.wait_for_capacity().await;
                    hub.submit(event).await;
                },
                Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                    tracing::warn!(session_id, max = MAX_LINE_LEN, "line too long");
                    return format!("line longer than {MAX_LINE_LEN} bytes");
                },
                Some(Err(LinesCodecError::Io(e))) => return format!("read error: {e}"),
                None => return "peer closed".to_string(),
            },
        }
    }
}

async fn write_loop<W>(
    session_id: u64,
    mut writer: W,
    mut outbound: mpsc::Receiver<String>,
    write_timeout: Duration,
) where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = outbound.recv().await {
        let mut bytes = line.into_bytes();
        bytes.push(b'\n');

        match tokio::time::timeout(write_timeout, writer.write_all(&bytes)).await {
            Ok(Ok(())) => {},
            Ok(Err(e)) => {
                tracing::debug!(session_id, error = %e, "write failed");
                break;
            },
            Err(_) => {
                tracing::warn!(session_id, ?write_timeout, "write timed out");
                break;
            },
        }
    }

    // Receiver must go before the shutdown so a blocked peer cannot keep
    // later sends succeeding.
    drop(outbound);

    if let Err(e) = writer.shutdown().await {
        tracing::debug!(session_id, error = %e, "shutdown failed");
    }
}
