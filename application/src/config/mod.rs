//! Application-level configuration.
//!
//! - [`CacheParams`] — result cache limits, TTL and sweep period
//! - [`ExecutionParams`] — built-in function behavior (simulated latency)

pub mod cache_params;
pub mod execution_params;

pub use cache_params::CacheParams;
pub use execution_params::ExecutionParams;
