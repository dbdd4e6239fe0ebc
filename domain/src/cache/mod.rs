//! Result cache domain types
//!
//! - [`generate_key`] — SHA-256 fingerprint of `(function name, sorted arguments)`
//! - [`CacheEntry`] — one cached result with expiry and hit accounting
//! - [`CacheStatistics`] — counters reported by the result cache

pub mod entry;
pub mod key;
pub mod stats;

pub use entry::CacheEntry;
pub use key::generate_key;
pub use stats::CacheStatistics;
