//! Noughts wire protocol.
//!
//! Every message is one UTF-8 text line. Fields are separated by `|` and the
//! first field is the tag. The protocol is deliberately tiny: two messages go
//! from client to server ([`ClientMessage`]) and eleven go the other way
//! ([`ServerMessage`]).
//!
//! ```text
//! JOGADA|1|2                 client wants to mark row 1, column 2
//! MOVIMENTO|1|1|2|X          server applied that move for seat 1
//! ESTADO|-,-,-|-,-,X|-,-,-   full board snapshot
//! ```
//!
//! # Components
//!
//! - [`Tag`]: message discriminator (the first field of a line)
//! - [`Mark`], [`Cell`], [`BoardState`]: board vocabulary shared by both ends
//! - [`ClientMessage`], [`ServerMessage`]: typed messages with `encode` and
//!   `decode`
//!
//! Encoding never appends the line terminator; transports own framing.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod board;
pub mod errors;
mod message;
mod tag;

pub use board::{BOARD_SIZE, BoardState, Cell, Mark};
pub use errors::{ProtocolError, Result};
pub use message::{
    ClientMessage, FIELD_SEPARATOR, MAX_CHAT_LEN, MAX_LINE_LEN, SeatId, ServerMessage,
};
pub use tag::Tag;
