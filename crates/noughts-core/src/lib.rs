//! Noughts core.
//!
//! Pure game logic with no I/O: the [`board::Board`] grid and its win/draw
//! rules, the [`game::Game`] phase and turn state machine, and the
//! [`env::Environment`] abstraction that lets the server runtime swap real
//! time for virtual time in simulation.
//!
//! Everything here is synchronous and deterministic. The server crate wraps
//! it with seat management and networking.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod board;
pub mod env;
pub mod error;
pub mod game;

pub use board::Board;
pub use env::Environment;
pub use error::{MoveError, PlaceError};
pub use game::{Game, MoveOutcome, Phase};
