//! Configuration file loading for callkit
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CALLKIT_<SECTION>__<KEY>` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./callkit.toml` or `./.callkit.toml`
//! 4. Global: `$XDG_CONFIG_HOME/callkit/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileCacheConfig, FileConfig, FileExecutionConfig, FileLoggingConfig, FileOutputConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
