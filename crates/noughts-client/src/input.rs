//! Typed-command parsing.
//!
//! ```text
//! 1,2          mark row 1, column 2
//! chat:hello   send a chat message
//! quit         leave (also `sair`)
//! ```

use std::str::FromStr;

use thiserror::Error;

/// A command typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Place our mark
    Move {
        /// Row, as typed
        row: i32,
        /// Column, as typed
        col: i32,
    },
    /// Send a chat line
    Chat(String),
    /// Disconnect and exit
    Quit,
}

/// Why a typed line is not a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Looked like a move but a coordinate is not a number
    #[error("Invalid format. Use: row,col (e.g. 1,2)")]
    BadMove,

    /// Not a move, chat or quit
    #[error("Invalid command. Use 'row,col', 'chat:message' or 'quit'")]
    Unknown,
}

const CHAT_PREFIX: &str = "chat:";

impl FromStr for Command {
    type Err = InputError;

    fn from_str(input: &str) -> Result<Self, InputError> {
        let input = input.trim_end_matches(['\r', '\n']);

        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("sair") {
            return Ok(Self::Quit);
        }

        if let Some(text) = input.strip_prefix(CHAT_PREFIX) {
            return Ok(Self::Chat(text.to_string()));
        }

        let mut parts = input.split(',');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(row), Some(col), None) => {
                let row = row.trim().parse().map_err(|_| InputError::BadMove)?;
                let col = col.trim().parse().map_err(|_| InputError::BadMove)?;
                Ok(Self::Move { row, col })
            },
            _ => Err(InputError::Unknown),
        }
    }
}
