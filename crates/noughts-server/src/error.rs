//! Server error types.
//!
//! Two layers, mirroring the split between pure logic and I/O:
//! - [`AuthorityError`]: events the game authority cannot make sense of
//! - [`ServerError`]: failures of the networked runtime

use thiserror::Error;

/// Errors from processing an event in the game authority.
///
/// None of these change game state. The runtime logs them and keeps serving.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorityError {
    /// Event referenced a session that holds no seat.
    ///
    /// Happens when a line from a rejected or already departed connection is
    /// still in flight. Transient.
    #[error("session not seated: {0}")]
    SessionNotSeated(u64),

    /// Session id was accepted twice.
    ///
    /// Session ids are allocated by the runtime and must be unique. This is a
    /// logic bug.
    #[error("session already exists: {0}")]
    SessionAlreadyExists(u64),
}

/// Errors that can occur in the server runtime.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration error (invalid bind address, zero-sized queue).
    ///
    /// Fatal at startup. Fix configuration and restart.
    #[error("configuration error: {0}")]
    Config(String),

    /// Socket error.
    ///
    /// Fatal when binding; for an established connection it only ends that
    /// connection.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// Error surfaced by the game authority.
    #[error("authority error: {0}")]
    Authority(#[from] AuthorityError),
}
