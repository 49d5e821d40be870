//! Noughts simulation harness.
//!
//! Deterministic network tests with turmoil. The production hub, session
//! tasks and client transport run unchanged over simulated TCP, with
//! virtual time driving the restart timer.
//!
//! # Components
//!
//! - [`SimEnv`]: `Environment` backed by tokio's (virtual) clock
//! - [`SimServer`]: game server bound to a turmoil listener
//! - [`SimPlayer`]: client transport plus `ClientState` over a turmoil socket

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod sim_env;
pub mod sim_player;
pub mod sim_server;

pub use sim_env::SimEnv;
pub use sim_player::{RECV_TIMEOUT, SimPlayer};
pub use sim_server::SimServer;
