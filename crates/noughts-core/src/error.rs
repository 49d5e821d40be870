//! Error types for the game rules.
//!
//! Both errors are rule violations, not faults: the server reports them to the
//! offending seat and the game carries on unchanged.

use thiserror::Error;

/// Errors from placing a mark on the board.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    /// Row or column outside `0..=2`
    #[error("cell ({row}, {col}) is off the board")]
    OutOfRange {
        /// Requested row
        row: i32,
        /// Requested column
        col: i32,
    },

    /// Cell already holds a mark
    #[error("cell ({row}, {col}) is already taken")]
    Occupied {
        /// Requested row
        row: i32,
        /// Requested column
        col: i32,
    },
}

/// Errors from attempting a move in the game state machine.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// No game is being played (waiting for players, or finished)
    #[error("no game in progress")]
    NotActive,

    /// Mover does not hold the active mark
    #[error("not your turn: {expected} to move")]
    NotYourTurn {
        /// Mark whose turn it is
        expected: noughts_proto::Mark,
    },

    /// Target cell rejected by the board
    #[error("invalid move: {0}")]
    InvalidCell(#[from] PlaceError),
}
