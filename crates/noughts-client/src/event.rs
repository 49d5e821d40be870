//! Client events and actions.

use noughts_proto::{BoardState, ClientMessage, Mark, SeatId, ServerMessage};

use crate::input::Command;

/// Events the caller feeds into the client.
///
/// The caller is responsible for:
/// - Reading lines from the server and decoding them
/// - Reading and parsing user input
/// - Reporting when the connection ends
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// Message received from the server
    MessageReceived(ServerMessage),

    /// User entered a command
    CommandEntered(Command),

    /// Server closed the connection or it failed
    Disconnected,
}

/// Actions the client produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    /// Send a message to the server
    Send(ClientMessage),

    /// Present something to the user
    Show(View),

    /// Close the connection and exit
    Quit,
}

/// Something worth telling the user.
///
/// Rendering is left to the caller; see [`crate::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Our mark was assigned
    Assigned(Mark),
    /// Our seat id was assigned
    Seated(SeatId),
    /// A game started
    Started {
        /// Server notice
        text: String,
        /// Whether we move first
        my_turn: bool,
    },
    /// Current board
    Board(BoardState),
    /// Turn changed
    Turn {
        /// Whether it is now our turn
        my_turn: bool,
    },
    /// A move was applied
    Moved {
        /// Seat that moved
        seat: SeatId,
        /// Row marked
        row: u8,
        /// Column marked
        col: u8,
        /// Mark placed
        mark: Mark,
    },
    /// Reply to one of our requests
    Result(String),
    /// Game ended
    GameOver(String),
    /// Opponent left mid-game
    PlayerLeft(String),
    /// Relayed chat
    Chat {
        /// Sender's seat
        seat: SeatId,
        /// Message text
        text: String,
    },
    /// Server refused us a seat
    Refused(String),
    /// Local hint that never reached the server
    Hint(String),
    /// Connection is gone
    Disconnected,
}
