//! Durable cache store port
//!
//! The result cache keeps a fast in-memory tier in front of a durable tier.
//! This port is the durable tier; adapters live in the infrastructure layer
//! (file-per-key JSON store, in-memory store).
//!
//! Failures are reported as [`StoreError`] but the result cache never lets
//! them reach a function caller: reads degrade to a miss and writes are
//! skipped with a warning.

use async_trait::async_trait;
use callkit_domain::CacheEntry;
use thiserror::Error;

/// Error type for durable store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing storage could not be read or written
    #[error("Storage I/O failed: {0}")]
    Io(String),

    /// A record could not be encoded or decoded
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The store is not reachable at all
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Key → [`CacheEntry`] persistence.
///
/// Writes must be atomic per key: a reader sees either the previous record
/// or the new one, never a partial write.
#[async_trait]
pub trait DurableCacheStore: Send + Sync {
    /// Load the entry stored under `key`
    async fn load(&self, key: &str) -> Result<Option<CacheEntry>, StoreError>;

    /// Insert or replace the entry under `entry.key`
    async fn save(&self, entry: &CacheEntry) -> Result<(), StoreError>;

    /// Remove the entry under `key`, returning whether one existed
    async fn remove(&self, key: &str) -> Result<bool, StoreError>;

    /// All stored entries, expired ones included
    async fn entries(&self) -> Result<Vec<CacheEntry>, StoreError>;

    /// Remove every entry
    async fn clear(&self) -> Result<(), StoreError>;
}
