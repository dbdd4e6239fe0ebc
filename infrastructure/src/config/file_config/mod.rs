//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod cache;
mod execution;
mod logging;
mod output;

pub use cache::FileCacheConfig;
pub use execution::FileExecutionConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;

use callkit_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Result cache settings
    pub cache: FileCacheConfig,
    /// Built-in function settings
    pub execution: FileExecutionConfig,
    /// Diagnostic log settings
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Every issue is a warning: the offending value falls back to its default.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        self.cache.to_cache_params().1
    }
}
