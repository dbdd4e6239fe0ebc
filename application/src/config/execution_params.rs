//! Execution parameters for the built-in functions.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters shared by the built-in handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Artificial delay of the simulated file / network / weather functions
    pub simulated_latency: Duration,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            simulated_latency: Duration::from_millis(500),
        }
    }
}

impl ExecutionParams {
    pub fn with_simulated_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = latency;
        self
    }

    /// No artificial delay (tests)
    pub fn instant() -> Self {
        Self::default().with_simulated_latency(Duration::ZERO)
    }
}
