//! Test doubles shared by the application tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use callkit_domain::{
    Arguments, CacheEntry, FunctionDefinition, FunctionError, FunctionHandler, FunctionParameter,
};
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::ports::cache_store::{DurableCacheStore, StoreError};

#[derive(Default)]
pub(crate) struct InMemoryStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
    listings: AtomicUsize,
}

impl InMemoryStore {
    pub(crate) fn insert(&self, entry: CacheEntry) {
        self.entries.lock().insert(entry.key.clone(), entry);
    }

    pub(crate) fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.lock().get(key).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// How many times `entries()` was called
    pub(crate) fn listings(&self) -> usize {
        self.listings.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DurableCacheStore for InMemoryStore {
    async fn load(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        Ok(self.get(key))
    }

    async fn save(&self, entry: &CacheEntry) -> Result<(), StoreError> {
        self.insert(entry.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.lock().remove(key).is_some())
    }

    async fn entries(&self) -> Result<Vec<CacheEntry>, StoreError> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.lock().values().cloned().collect())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.entries.lock().clear();
        Ok(())
    }
}

/// In-memory store whose next `load` reads its record, signals `loaded`,
/// then waits for `release` before returning it
#[derive(Default)]
pub(crate) struct GatedStore {
    pub(crate) inner: InMemoryStore,
    armed: AtomicBool,
    pub(crate) loaded: Notify,
    pub(crate) release: Notify,
}

impl GatedStore {
    pub(crate) fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl DurableCacheStore for GatedStore {
    async fn load(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        let entry = self.inner.get(key);
        if self.armed.swap(false, Ordering::SeqCst) {
            self.loaded.notify_one();
            self.release.notified().await;
        }
        Ok(entry)
    }

    async fn save(&self, entry: &CacheEntry) -> Result<(), StoreError> {
        self.inner.save(entry).await
    }

    async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        self.inner.remove(key).await
    }

    async fn entries(&self) -> Result<Vec<CacheEntry>, StoreError> {
        self.inner.entries().await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.inner.clear().await
    }
}

/// Store whose every operation fails
pub(crate) struct FailingStore;

#[async_trait]
impl DurableCacheStore for FailingStore {
    async fn load(&self, _key: &str) -> Result<Option<CacheEntry>, StoreError> {
        Err(StoreError::Unavailable("offline".into()))
    }

    async fn save(&self, _entry: &CacheEntry) -> Result<(), StoreError> {
        Err(StoreError::Io("disk full".into()))
    }

    async fn remove(&self, _key: &str) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("offline".into()))
    }

    async fn entries(&self) -> Result<Vec<CacheEntry>, StoreError> {
        Err(StoreError::Unavailable("offline".into()))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("offline".into()))
    }
}

/// `add { a, b }` that counts its invocations
#[derive(Default)]
pub(crate) struct CountingAdd {
    pub(crate) calls: Mutex<usize>,
}

#[async_trait]
impl FunctionHandler for CountingAdd {
    fn definition(&self) -> FunctionDefinition {
        FunctionDefinition::new("add", "Add two numbers")
            .with_parameter(FunctionParameter::new("a", "First operand", true).with_type("number"))
            .with_parameter(FunctionParameter::new("b", "Second operand", true).with_type("number"))
    }

    async fn call(&self, args: &Arguments) -> Result<String, FunctionError> {
        *self.calls.lock() += 1;
        let sum = args.require_f64("a")? + args.require_f64("b")?;
        Ok(serde_json::json!({ "sum": sum }).to_string())
    }
}

/// Sleeps before answering
pub(crate) struct Slow(pub(crate) Duration);

#[async_trait]
impl FunctionHandler for Slow {
    fn definition(&self) -> FunctionDefinition {
        FunctionDefinition::new("slow", "Answers after a delay")
    }

    async fn call(&self, _args: &Arguments) -> Result<String, FunctionError> {
        tokio::time::sleep(self.0).await;
        Ok("done".to_string())
    }
}

/// Always fails with an execution error
pub(crate) struct Broken;

#[async_trait]
impl FunctionHandler for Broken {
    fn definition(&self) -> FunctionDefinition {
        FunctionDefinition::new("broken", "Always fails")
    }

    async fn call(&self, _args: &Arguments) -> Result<String, FunctionError> {
        Err(FunctionError::execution("backend exploded"))
    }
}

/// Panics when called
pub(crate) struct Panicky;

#[async_trait]
impl FunctionHandler for Panicky {
    fn definition(&self) -> FunctionDefinition {
        FunctionDefinition::new("panicky", "Panics")
    }

    async fn call(&self, _args: &Arguments) -> Result<String, FunctionError> {
        panic!("handler bug")
    }
}
