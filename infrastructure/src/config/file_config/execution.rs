//! Execution configuration from TOML (`[execution]` section)

use callkit_application::ExecutionParams;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Raw execution configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    /// Artificial latency of the simulated I/O functions
    pub simulated_latency_ms: u64,
    /// JSONL file receiving every execution entry
    pub audit_log: Option<PathBuf>,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        Self {
            simulated_latency_ms: ExecutionParams::default().simulated_latency.as_millis() as u64,
            audit_log: None,
        }
    }
}

impl FileExecutionConfig {
    pub fn to_execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_simulated_latency(Duration::from_millis(self.simulated_latency_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = FileExecutionConfig::default();
        assert_eq!(config.simulated_latency_ms, 500);
        assert_eq!(config.to_execution_params(), ExecutionParams::default());
    }

    #[test]
    fn test_zero_latency() {
        let config = FileExecutionConfig {
            simulated_latency_ms: 0,
            audit_log: None,
        };
        assert_eq!(config.to_execution_params(), ExecutionParams::instant());
    }
}
