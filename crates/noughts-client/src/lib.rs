//! Client
//!
//! Action-based client for the Noughts protocol, plus a small terminal
//! front end.
//!
//! # Architecture
//!
//! [`ClientState`] is Sans-IO: it receives [`ClientEvent`]s (server
//! messages, typed commands, disconnection) and returns [`ClientAction`]s
//! (send, show, quit). The [`transport`] module moves messages over TCP and
//! [`runtime`] wires both to the terminal.
//!
//! # Components
//!
//! - [`ClientState`]: this seat's view of the game
//! - [`Command`]: typed input (`row,col`, `chat:text`, `quit`)
//! - [`render`]: plain-text output
//! - [`transport::ConnectedClient`]: TCP connection handle

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod event;
mod input;
pub mod render;
pub mod runtime;
pub mod transport;

pub use client::{ClientState, WAIT_FOR_TURN};
pub use event::{ClientAction, ClientEvent, View};
pub use input::{Command, InputError};
pub use runtime::ClientError;
