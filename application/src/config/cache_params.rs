//! Result cache parameters.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits and timings for [`ResultCache`](crate::cache::ResultCache).
///
/// | Field | Default |
/// |-------|---------|
/// | `default_ttl` | 1 hour |
/// | `sweep_interval` | 5 minutes |
/// | `max_memory_entries` | 100 |
/// | `max_memory_bytes` | 50 MiB |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheParams {
    /// TTL applied when a caller does not pass one
    pub default_ttl: Duration,
    /// Period of the background expiry sweep
    pub sweep_interval: Duration,
    /// Fast tier entry cap
    pub max_memory_entries: usize,
    /// Fast tier byte cap
    pub max_memory_bytes: usize,
}

impl Default for CacheParams {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(3600),
            sweep_interval: Duration::from_secs(300),
            max_memory_entries: 100,
            max_memory_bytes: 50 * 1024 * 1024,
        }
    }
}

impl CacheParams {
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn with_max_memory_entries(mut self, max: usize) -> Self {
        self.max_memory_entries = max;
        self
    }

    pub fn with_max_memory_bytes(mut self, max: usize) -> Self {
        self.max_memory_bytes = max;
        self
    }
}
