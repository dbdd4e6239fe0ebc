//! Infrastructure layer for callkit
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, the built-in functions, and configuration
//! file loading.

pub mod config;
pub mod functions;
pub mod logging;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileCacheConfig, FileConfig, FileExecutionConfig, FileLoggingConfig,
    FileOutputConfig,
};
pub use functions::{FunctionSchemaConverter, builtin_registry, register_builtin_functions};
pub use logging::JsonlExecutionLogger;
pub use store::{FileCacheStore, InMemoryCacheStore};
