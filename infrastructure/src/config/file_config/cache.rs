//! Cache configuration from TOML (`[cache]` section)

use callkit_application::CacheParams;
use callkit_domain::ConfigIssue;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Raw result cache configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCacheConfig {
    /// TTL used when a call does not pass one
    pub default_ttl_secs: u64,
    /// Period of the background expiry sweep
    pub sweep_interval_secs: u64,
    /// Fast tier entry cap
    pub max_memory_entries: usize,
    /// Fast tier byte cap
    pub max_memory_bytes: usize,
    /// Durable tier directory (default: platform cache dir)
    pub directory: Option<PathBuf>,
    /// `false` keeps the durable tier in memory
    pub durable: bool,
}

impl Default for FileCacheConfig {
    fn default() -> Self {
        let params = CacheParams::default();
        Self {
            default_ttl_secs: params.default_ttl.as_secs(),
            sweep_interval_secs: params.sweep_interval.as_secs(),
            max_memory_entries: params.max_memory_entries,
            max_memory_bytes: params.max_memory_bytes,
            directory: None,
            durable: true,
        }
    }
}

impl FileCacheConfig {
    /// Convert to application parameters, replacing zero limits with defaults.
    ///
    /// A zero `default_ttl_secs` is kept: it disables reuse of cached results.
    pub fn to_cache_params(&self) -> (CacheParams, Vec<ConfigIssue>) {
        let defaults = CacheParams::default();
        let mut issues = Vec::new();

        let sweep_interval = if self.sweep_interval_secs == 0 {
            issues.push(ConfigIssue::zero_value("cache.sweep_interval_secs"));
            defaults.sweep_interval
        } else {
            Duration::from_secs(self.sweep_interval_secs)
        };
        let max_memory_entries = if self.max_memory_entries == 0 {
            issues.push(ConfigIssue::zero_value("cache.max_memory_entries"));
            defaults.max_memory_entries
        } else {
            self.max_memory_entries
        };
        let max_memory_bytes = if self.max_memory_bytes == 0 {
            issues.push(ConfigIssue::zero_value("cache.max_memory_bytes"));
            defaults.max_memory_bytes
        } else {
            self.max_memory_bytes
        };

        let params = CacheParams::default()
            .with_default_ttl(Duration::from_secs(self.default_ttl_secs))
            .with_sweep_interval(sweep_interval)
            .with_max_memory_entries(max_memory_entries)
            .with_max_memory_bytes(max_memory_bytes);
        (params, issues)
    }
}
