//! Client state machine.
//!
//! Tracks what this player knows: its mark and seat, the last board
//! snapshot and whether it holds the turn. The server stays authoritative;
//! the turn flag only spares a round trip for a move that would certainly be
//! refused.

use noughts_proto::{BoardState, ClientMessage, Mark, SeatId, ServerMessage};

use crate::{
    event::{ClientAction, ClientEvent, View},
    input::Command,
};

/// Hint shown when a move is typed out of turn.
pub const WAIT_FOR_TURN: &str = "Wait for your turn!";

/// Action-based view of the game from one seat.
#[derive(Debug, Clone, Default)]
pub struct ClientState {
    mark: Option<Mark>,
    seat: Option<SeatId>,
    board: BoardState,
    my_turn: bool,
}

impl ClientState {
    /// Fresh state before any server message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an event and return actions to execute.
    pub fn handle(&mut self, event: ClientEvent) -> Vec<ClientAction> {
        match event {
            ClientEvent::MessageReceived(message) => self.handle_message(message),
            ClientEvent::CommandEntered(command) => self.handle_command(command),
            ClientEvent::Disconnected => {
                self.my_turn = false;
                vec![ClientAction::Show(View::Disconnected), ClientAction::Quit]
            },
        }
    }

    fn handle_message(&mut self, message: ServerMessage) -> Vec<ClientAction> {
        let view = match message {
            ServerMessage::Symbol(mark) => {
                self.mark = Some(mark);
                View::Assigned(mark)
            },
            ServerMessage::PlayerId(seat) => {
                self.seat = Some(seat);
                View::Seated(seat)
            },
            ServerMessage::GameStarted(text) => {
                // no TURNO precedes the first move; X always opens
                self.my_turn = self.mark == Some(Mark::X);
                View::Started { text, my_turn: self.my_turn }
            },
            ServerMessage::State(board) => {
                self.board = board;
                View::Board(board)
            },
            ServerMessage::Turn(seat) => {
                self.my_turn = self.seat == Some(seat);
                View::Turn { my_turn: self.my_turn }
            },
            ServerMessage::MoveMade { seat, row, col, mark } => View::Moved { seat, row, col, mark },
            ServerMessage::Result(text) => View::Result(text),
            ServerMessage::GameOver(text) => {
                self.my_turn = false;
                View::GameOver(text)
            },
            ServerMessage::PlayerLeft(text) => {
                self.my_turn = false;
                View::PlayerLeft(text)
            },
            ServerMessage::ServerFull(text) => {
                return vec![ClientAction::Show(View::Refused(text)), ClientAction::Quit];
            },
            ServerMessage::Chat { seat, text } => View::Chat { seat, text },
        };

        vec![ClientAction::Show(view)]
    }

    fn handle_command(&mut self, command: Command) -> Vec<ClientAction> {
        match command {
            Command::Move { row, col } => {
                if !self.my_turn {
                    return vec![ClientAction::Show(View::Hint(WAIT_FOR_TURN.to_string()))];
                }
                vec![ClientAction::Send(ClientMessage::Move { row, col })]
            },
            Command::Chat(text) => vec![ClientAction::Send(ClientMessage::Chat { text })],
            Command::Quit => vec![ClientAction::Quit],
        }
    }

    /// Our mark, once assigned.
    pub fn mark(&self) -> Option<Mark> {
        self.mark
    }

    /// Our seat, once assigned.
    pub fn seat(&self) -> Option<SeatId> {
        self.seat
    }

    /// Last board snapshot received.
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// Whether we believe we hold the turn.
    pub fn my_turn(&self) -> bool {
        self.my_turn
    }
}
