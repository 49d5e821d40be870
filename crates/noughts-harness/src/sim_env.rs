//! Simulation environment backed by tokio's clock.
//!
//! Turmoil runs every host on a tokio runtime with paused time, so
//! `tokio::time::Instant` and `tokio::time::sleep` observe virtual time. A
//! five second restart delay costs nothing in wall-clock terms and fires at
//! exactly the same simulated instant on every run.

use std::time::Duration;

use noughts_core::Environment;

/// Environment for turmoil simulations.
#[derive(Clone, Default)]
pub struct SimEnv;

impl SimEnv {
    /// Create a new simulation environment.
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SimEnv {
    type Instant = tokio::time::Instant;

    fn now(&self) -> Self::Instant {
        tokio::time::Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}
