//! Game authority.
//!
//! Owns the seats and the game. Events in, actions out: the authority never
//! touches a socket or a timer. The runtime feeds it [`ServerEvent`]s and
//! executes the [`ServerAction`]s it returns, in order.
//!
//! # Lifecycle
//!
//! ```text
//! join, join ──> start ──> moves ──> win/draw ──(restart_delay)──> start
//!                             │
//!                           leave ──> interrupted, wait for a new seat
//! ```
//!
//! A game starts whenever the second seat fills. A finished game restarts
//! after `restart_delay` if both seats are still held when the timer fires;
//! the timer carries the game generation so a timer armed for an older game
//! does nothing.

use std::time::{Duration, Instant};

use noughts_core::{Environment, Game, MoveError, MoveOutcome, Phase};
use noughts_proto::{ClientMessage, MAX_CHAT_LEN, ProtocolError, ServerMessage, Tag};

use crate::{
    error::AuthorityError,
    registry::{Seat, SeatRegistry},
};

/// Fixed notice texts carried by free-text messages.
pub mod notice {
    /// Sent with `JOGO_INICIADO`
    pub const GAME_STARTED: &str = "Game started! Player X moves first.";
    /// Sent with `FIM_JOGO` when the board fills without a line
    pub const DRAW: &str = "Draw! The board is full.";
    /// Sent with `JOGADOR_SAIU`
    pub const PLAYER_LEFT: &str = "A player left. Game interrupted.";
    /// Sent with `SERVIDOR_CHEIO`
    pub const SERVER_FULL: &str = "Server is full. Try again later.";
    /// Move from the seat that does not hold the turn
    pub const NOT_YOUR_TURN: &str = "Not your turn!";
    /// Move onto an occupied or off-board cell
    pub const INVALID_MOVE: &str = "Invalid move! Try again.";
    /// Move while no game is being played
    pub const NOT_IN_PROGRESS: &str = "No game in progress.";
    /// `JOGADA` with missing or non-numeric coordinates
    pub const BAD_MOVE_FORMAT: &str = "Invalid move format!";
    /// Known tag with an otherwise malformed payload
    pub const BAD_FORMAT: &str = "Invalid message format!";

    /// Sent with `FIM_JOGO` when `mark` completes a line.
    pub fn win(mark: noughts_proto::Mark) -> String {
        format!("Player {mark} wins!")
    }

    /// Reply to a line whose tag is not understood.
    pub fn unknown_command(tag: &str) -> String {
        format!("Unknown command: {tag}")
    }
}

/// Authority configuration.
#[derive(Debug, Clone)]
pub struct AuthorityConfig {
    /// Pause between the end of a game and the start of the next one
    pub restart_delay: Duration,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self { restart_delay: Duration::from_secs(5) }
    }
}

/// Events the authority processes.
///
/// Produced by the runtime (production or simulation).
#[derive(Debug, Clone)]
pub enum ServerEvent {
    /// A new connection was accepted
    ConnectionAccepted {
        /// Unique id assigned by the runtime
        session_id: u64,
    },

    /// A well-formed line was received
    MessageReceived {
        /// Connection that sent the line
        session_id: u64,
        /// Decoded message
        message: ClientMessage,
    },

    /// A line failed to decode
    MalformedLine {
        /// Connection that sent the line
        session_id: u64,
        /// Why decoding failed
        error: ProtocolError,
    },

    /// A connection ended (peer closed, read error, failed delivery)
    ConnectionClosed {
        /// Connection that ended
        session_id: u64,
        /// Reason for closure
        reason: String,
    },

    /// The restart delay for a finished game elapsed
    RestartTimerFired {
        /// Generation the timer was armed for
        generation: u64,
    },
}

/// Actions the authority produces.
///
/// Executed by runtime-specific code, in order.
#[derive(Debug, Clone)]
pub enum ServerAction<I = Instant> {
    /// Send a message to one session
    SendToSession {
        /// Target session
        session_id: u64,
        /// Message to send
        message: ServerMessage,
    },

    /// Send a message to every seated session
    Broadcast {
        /// Message to send
        message: ServerMessage,
    },

    /// Flush what is queued for a session, then close it
    CloseConnection {
        /// Session to close
        session_id: u64,
        /// Reason for closure
        reason: String,
    },

    /// Arm the restart timer, replacing any armed timer
    ScheduleRestart {
        /// Generation of the game that just finished
        generation: u64,
        /// How long to wait
        delay: Duration,
    },

    /// Disarm the restart timer if armed
    CancelRestart,

    /// Log a message
    Log {
        /// Log level
        level: LogLevel,
        /// Message to log
        message: String,
        /// When the event occurred
        timestamp: I,
    },
}

/// Log levels for server actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational message
    Info,
    /// Warning
    Warn,
}

/// Action-based game authority.
pub struct GameAuthority<E: Environment> {
    env: E,
    config: AuthorityConfig,
    game: Game,
    seats: SeatRegistry,
}

impl<E: Environment> GameAuthority<E> {
    /// Create an authority with no seats and no game.
    pub fn new(env: E, config: AuthorityConfig) -> Self {
        Self { env, config, game: Game::new(), seats: SeatRegistry::new() }
    }

    /// Process an event and return the actions to execute.
    pub fn process_event(
        &mut self,
        event: ServerEvent,
    ) -> Result<Vec<ServerAction<E::Instant>>, AuthorityError> {
        match event {
            ServerEvent::ConnectionAccepted { session_id } => self.handle_join(session_id),
            ServerEvent::MessageReceived { session_id, message } => {
                self.handle_message(session_id, message)
            },
            ServerEvent::MalformedLine { session_id, error } => {
                self.handle_malformed(session_id, &error)
            },
            ServerEvent::ConnectionClosed { session_id, reason } => {
                Ok(self.handle_leave(session_id, &reason))
            },
            ServerEvent::RestartTimerFired { generation } => Ok(self.handle_restart(generation)),
        }
    }

    fn handle_join(
        &mut self,
        session_id: u64,
    ) -> Result<Vec<ServerAction<E::Instant>>, AuthorityError> {
        if self.seats.seat(session_id).is_some() {
            return Err(AuthorityError::SessionAlreadyExists(session_id));
        }

        let Some(seat) = self.seats.claim(session_id) else {
            return Ok(vec![
                ServerAction::SendToSession {
                    session_id,
                    message: ServerMessage::ServerFull(notice::SERVER_FULL.to_string()),
                },
                ServerAction::CloseConnection { session_id, reason: "server full".to_string() },
                self.log(LogLevel::Info, format!("session {session_id} rejected: server full")),
            ]);
        };

        let mut actions = vec![
            ServerAction::SendToSession { session_id, message: ServerMessage::Symbol(seat.mark) },
            ServerAction::SendToSession {
                session_id,
                message: ServerMessage::PlayerId(seat.seat_id),
            },
            self.log(
                LogLevel::Info,
                format!("session {session_id} seated as player {} ({})", seat.seat_id, seat.mark),
            ),
        ];

        if self.seats.is_full() {
            actions.extend(self.start_game());
        }

        Ok(actions)
    }

    fn handle_message(
        &mut self,
        session_id: u64,
        message: ClientMessage,
    ) -> Result<Vec<ServerAction<E::Instant>>, AuthorityError> {
        let seat = self.seats.seat(session_id).ok_or(AuthorityError::SessionNotSeated(session_id))?;

        match message {
            ClientMessage::Move { row, col } => Ok(self.handle_move(session_id, seat, row, col)),
            ClientMessage::Chat { text } => Ok(vec![ServerAction::Broadcast {
                message: ServerMessage::Chat { seat: seat.seat_id, text: clip_chat(text) },
            }]),
        }
    }

    fn handle_move(
        &mut self,
        session_id: u64,
        seat: Seat,
        row: i32,
        col: i32,
    ) -> Vec<ServerAction<E::Instant>> {
        let outcome = match self.game.apply_move(seat.mark, row, col) {
            Ok(outcome) => outcome,
            Err(err) => {
                let text = match err {
                    MoveError::NotActive => notice::NOT_IN_PROGRESS,
                    MoveError::NotYourTurn { .. } => notice::NOT_YOUR_TURN,
                    MoveError::InvalidCell(_) => notice::INVALID_MOVE,
                };
                return vec![
                    ServerAction::SendToSession {
                        session_id,
                        message: ServerMessage::Result(text.to_string()),
                    },
                    self.log(
                        LogLevel::Debug,
                        format!("player {} move ({row}, {col}) rejected: {err}", seat.seat_id),
                    ),
                ];
            },
        };

        // placement succeeded, so both coordinates are in 0..=2
        let mut actions = vec![
            ServerAction::Broadcast {
                message: ServerMessage::MoveMade {
                    seat: seat.seat_id,
                    row: row as u8,
                    col: col as u8,
                    mark: seat.mark,
                },
            },
            ServerAction::Broadcast { message: ServerMessage::State(self.game.board().snapshot()) },
        ];

        match outcome {
            MoveOutcome::Continue { next } => {
                actions.push(ServerAction::Broadcast {
                    message: ServerMessage::Turn(Seat::for_mark(next).seat_id),
                });
            },
            MoveOutcome::Win(mark) => {
                actions.push(ServerAction::Broadcast {
                    message: ServerMessage::GameOver(notice::win(mark)),
                });
                actions.extend(self.finish(format!("player {} wins", seat.seat_id)));
            },
            MoveOutcome::Draw => {
                actions.push(ServerAction::Broadcast {
                    message: ServerMessage::GameOver(notice::DRAW.to_string()),
                });
                actions.extend(self.finish("draw".to_string()));
            },
        }

        actions
    }

    fn handle_malformed(
        &mut self,
        session_id: u64,
        error: &ProtocolError,
    ) -> Result<Vec<ServerAction<E::Instant>>, AuthorityError> {
        let seat = self.seats.seat(session_id).ok_or(AuthorityError::SessionNotSeated(session_id))?;

        let text = match error {
            ProtocolError::UnknownTag(tag) => notice::unknown_command(tag),
            ProtocolError::MissingField { tag, .. } if *tag == Tag::Move.as_str() => {
                notice::BAD_MOVE_FORMAT.to_string()
            },
            ProtocolError::InvalidNumber { .. } => notice::BAD_MOVE_FORMAT.to_string(),
            _ => notice::BAD_FORMAT.to_string(),
        };

        Ok(vec![
            ServerAction::SendToSession { session_id, message: ServerMessage::Result(text) },
            self.log(LogLevel::Debug, format!("player {} sent a malformed line: {error}", seat.seat_id)),
        ])
    }

    fn handle_leave(&mut self, session_id: u64, reason: &str) -> Vec<ServerAction<E::Instant>> {
        let Some(seat) = self.seats.release(session_id) else {
            return Vec::new();
        };

        let mut actions = vec![self.log(
            LogLevel::Info,
            format!("player {} (session {session_id}) left: {reason}", seat.seat_id),
        )];

        if self.game.abort() {
            actions.push(ServerAction::Broadcast {
                message: ServerMessage::PlayerLeft(notice::PLAYER_LEFT.to_string()),
            });
            actions.push(self.log(
                LogLevel::Warn,
                format!("game {} interrupted by player {}", self.game.generation(), seat.seat_id),
            ));
        }

        if !self.seats.is_full() {
            actions.push(ServerAction::CancelRestart);
        }

        actions
    }

    fn handle_restart(&mut self, generation: u64) -> Vec<ServerAction<E::Instant>> {
        if self.game.can_restart(generation) && self.seats.is_full() {
            return self.start_game();
        }

        vec![self.log(LogLevel::Debug, format!("ignoring restart timer for game {generation}"))]
    }

    fn start_game(&mut self) -> Vec<ServerAction<E::Instant>> {
        let generation = self.game.start();

        vec![
            ServerAction::CancelRestart,
            ServerAction::Broadcast {
                message: ServerMessage::GameStarted(notice::GAME_STARTED.to_string()),
            },
            ServerAction::Broadcast { message: ServerMessage::State(self.game.board().snapshot()) },
            self.log(LogLevel::Info, format!("game {generation} started")),
        ]
    }

    fn finish(&self, summary: String) -> Vec<ServerAction<E::Instant>> {
        let generation = self.game.generation();
        vec![
            ServerAction::ScheduleRestart { generation, delay: self.config.restart_delay },
            self.log(LogLevel::Info, format!("game {generation} over: {summary}")),
        ]
    }

    fn log(&self, level: LogLevel, message: String) -> ServerAction<E::Instant> {
        ServerAction::Log { level, message, timestamp: self.env.now() }
    }

    /// Sessions that currently hold a seat, in connection order.
    pub fn seated_sessions(&self) -> impl Iterator<Item = u64> + '_ {
        self.seats.sessions()
    }

    /// Seat held by `session_id`.
    pub fn seat(&self, session_id: u64) -> Option<Seat> {
        self.seats.seat(session_id)
    }

    /// Number of occupied seats.
    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    /// Current game phase.
    pub fn phase(&self) -> Phase {
        self.game.phase()
    }

    /// Current game.
    pub fn game(&self) -> &Game {
        &self.game
    }
}

/// Cut `text` to at most [`MAX_CHAT_LEN`] bytes on a char boundary.
fn clip_chat(mut text: String) -> String {
    if text.len() > MAX_CHAT_LEN {
        let cut = (0..=MAX_CHAT_LEN).rev().find(|&i| text.is_char_boundary(i)).unwrap_or(0);
        text.truncate(cut);
    }
    text
}
