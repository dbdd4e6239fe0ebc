//! Application layer for callkit
//!
//! This crate contains the function registry, the result cache, the
//! executors, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod cache;
pub mod config;
pub mod execution_log;
pub mod ports;
pub mod registry;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use cache::ResultCache;
pub use config::{CacheParams, ExecutionParams};
pub use execution_log::ExecutionLog;
pub use ports::{
    cache_store::{DurableCacheStore, StoreError},
    execution_sink::{ExecutionSink, NoExecutionSink},
};
pub use registry::FunctionRegistry;
pub use use_cases::cached_execution::CachedExecutor;
pub use use_cases::execute_function::FunctionExecutor;
