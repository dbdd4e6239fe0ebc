//! Cache statistics snapshot.

use serde::{Deserialize, Serialize};

/// Point-in-time view of the result cache counters.
///
/// Request counters only grow; they are reset solely by a global invalidation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatistics {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Entries removed by expiry (lookups past expiry and sweeps)
    pub evictions: u64,
    /// Fast tier entries dropped to stay within its entry/byte limits
    pub memory_evictions: u64,
    pub memory_entries: usize,
    pub memory_bytes: usize,
    pub durable_entries: usize,
    pub durable_bytes: usize,
}

impl CacheStatistics {
    /// Hits over requests, 0.0 before the first request.
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.total_requests as f64
        }
    }
}
