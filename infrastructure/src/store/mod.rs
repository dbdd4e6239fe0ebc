//! Durable tier adapters for the result cache.

mod file_store;
mod memory_store;

pub use file_store::FileCacheStore;
pub use memory_store::InMemoryCacheStore;
