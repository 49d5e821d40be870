//! Shared server state and action execution.
//!
//! The hub is the single owner of the [`GameAuthority`] and of every
//! session's outbound handle, all behind one mutex. Each event is processed
//! and all of its actions executed inside one critical section, so every
//! session observes broadcasts in the order the authority produced them.
//!
//! Delivery never blocks. Readers wait for room in every outbound queue
//! before submitting, so a queue only fills when its writer is stuck. A
//! session whose queue is full or whose writer has gone is dropped on the
//! spot and its departure is fed back to the authority in the same pass.

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
    time::Duration,
};

use noughts_core::Environment;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::{Mutex, mpsc, oneshot},
    task::JoinHandle,
};

use crate::{
    authority::{AuthorityConfig, GameAuthority, LogLevel, ServerAction, ServerEvent},
    error::{AuthorityError, ServerError},
    session::{self, SessionHandle},
};

/// Free slots a reader waits for in each outbound queue before submitting.
///
/// Covers the most lines one event can put in a single queue.
pub const EVENT_HEADROOM: usize = 16;

/// Per-connection I/O settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Lines that may wait in a session's outbound queue
    pub outbound_queue: usize,
    /// Longest a single socket write may take
    pub write_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { outbound_queue: 64, write_timeout: Duration::from_secs(5) }
    }
}

struct HubState<E: Environment> {
    authority: GameAuthority<E>,
    sessions: HashMap<u64, SessionHandle>,
    restart: Option<JoinHandle<()>>,
    next_session_id: u64,
}

/// Shared game state plus the sessions attached to it.
///
/// Cheap to clone; clones share state.
pub struct GameHub<E: Environment> {
    state: Arc<Mutex<HubState<E>>>,
    env: E,
    config: SessionConfig,
}

impl<E: Environment> Clone for GameHub<E> {
    fn clone(&self) -> Self {
        Self { state: Arc::clone(&self.state), env: self.env.clone(), config: self.config.clone() }
    }
}

impl<E: Environment> GameHub<E> {
    /// Create a hub with an empty table.
    ///
    /// # Errors
    ///
    /// `ServerError::Config` if `outbound_queue` is below [`EVENT_HEADROOM`].
    pub fn new(
        env: E,
        authority: AuthorityConfig,
        config: SessionConfig,
    ) -> Result<Self, ServerError> {
        if config.outbound_queue < EVENT_HEADROOM {
            return Err(ServerError::Config(format!(
                "outbound queue must hold at least {EVENT_HEADROOM} lines, got {}",
                config.outbound_queue
            )));
        }

        let state = HubState {
            authority: GameAuthority::new(env.clone(), authority),
            sessions: HashMap::new(),
            restart: None,
            next_session_id: 1,
        };

        Ok(Self { state: Arc::new(Mutex::new(state)), env, config })
    }

    /// Serve one accepted connection until it ends.
    pub async fn serve<S>(&self, stream: S)
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        session::run(self.clone(), stream).await;
    }

    /// Number of sessions attached, seated or not.
    pub async fn session_count(&self) -> usize {
        self.state.lock().await.sessions.len()
    }

    pub(crate) fn write_timeout(&self) -> Duration {
        self.config.write_timeout
    }

    /// Attach a new session and announce it to the authority.
    pub(crate) async fn open_session(
        &self,
    ) -> (u64, mpsc::Receiver<String>, oneshot::Receiver<()>) {
        let mut state = self.state.lock().await;

        let session_id = state.next_session_id;
        state.next_session_id += 1;

        let (handle, outbound, closed) = SessionHandle::new(self.config.outbound_queue);
        state.sessions.insert(session_id, handle);

        self.dispatch(&mut state, ServerEvent::ConnectionAccepted { session_id });

        (session_id, outbound, closed)
    }

    /// Detach a session whose reader has finished.
    pub(crate) async fn close_session(&self, session_id: u64, reason: String) {
        let mut state = self.state.lock().await;
        state.sessions.remove(&session_id);
        self.dispatch(&mut state, ServerEvent::ConnectionClosed { session_id, reason });
    }

    /// Wait until every attached session can take [`EVENT_HEADROOM`] lines.
    ///
    /// Returns early for a queue whose writer has gone; delivery handles it.
    pub(crate) async fn wait_for_capacity(&self) {
        let queues: Vec<mpsc::Sender<String>> =
            self.state.lock().await.sessions.values().map(SessionHandle::outbound).collect();

        for queue in queues {
            let _ = queue.reserve_many(EVENT_HEADROOM.min(queue.max_capacity())).await;
        }
    }

    /// Process an event and execute its actions.
    pub(crate) async fn submit(&self, event: ServerEvent) {
        let mut state = self.state.lock().await;
        self.dispatch(&mut state, event);
    }

    fn dispatch(&self, state: &mut HubState<E>, event: ServerEvent) {
        let mut pending = VecDeque::from([event]);

        while let Some(event) = pending.pop_front() {
            let actions = match state.authority.process_event(event) {
                Ok(actions) => actions,
                Err(e @ AuthorityError::SessionAlreadyExists(_)) => {
                    tracing::error!(error = %e, "event rejected by authority");
                    continue;
                },
                Err(e) => {
                    tracing::debug!(error = %e, "event rejected by authority");
                    continue;
                },
            };

            for action in actions {
                self.execute(state, action, &mut pending);
            }
        }
    }

    fn execute(
        &self,
        state: &mut HubState<E>,
        action: ServerAction<E::Instant>,
        pending: &mut VecDeque<ServerEvent>,
    ) {
        match action {
            ServerAction::SendToSession { session_id, message } => {
                deliver(state, session_id, message.encode(), pending);
            },

            ServerAction::Broadcast { message } => {
                let line = message.encode();
                let seated: Vec<u64> = state.authority.seated_sessions().collect();
                for session_id in seated {
                    deliver(state, session_id, line.clone(), pending);
                }
            },

            ServerAction::CloseConnection { session_id, reason } => {
                tracing::info!(session_id, %reason, "closing connection");
                state.sessions.remove(&session_id);
            },

            ServerAction::ScheduleRestart { generation, delay } => {
                if let Some(timer) = state.restart.take() {
                    timer.abort();
                }

                let hub = self.clone();
                state.restart = Some(tokio::spawn(async move {
                    hub.env.sleep(delay).await;
                    hub.submit(ServerEvent::RestartTimerFired { generation }).await;
                }));
            },

            ServerAction::CancelRestart => {
                if let Some(timer) = state.restart.take() {
                    timer.abort();
                }
            },

            ServerAction::Log { level, message, .. } => match level {
                LogLevel::Debug => tracing::debug!("{}", message),
                LogLevel::Info => tracing::info!("{}", message),
                LogLevel::Warn => tracing::warn!("{}", message),
            },
        }
    }
}

/// Enqueue `line` for `session_id`, dropping the session if it cannot take it.
fn deliver<E: Environment>(
    state: &mut HubState<E>,
    session_id: u64,
    line: String,
    pending: &mut VecDeque<ServerEvent>,
) {
    let Some(handle) = state.sessions.get(&session_id) else {
        tracing::debug!(session_id, "dropping line for detached session");
        return;
    };

    if handle.send(line).is_err() {
        tracing::warn!(session_id, "outbound queue rejected line, dropping session");
        state.sessions.remove(&session_id);
        pending.push_back(ServerEvent::ConnectionClosed {
            session_id,
            reason: "delivery failed".to_string(),
        });
    }
}
