//! In-memory durable tier, used when persistence is disabled.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use callkit_application::{DurableCacheStore, StoreError};
use callkit_domain::CacheEntry;

/// [`DurableCacheStore`] that lives only as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl DurableCacheStore for InMemoryCacheStore {
    async fn load(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    async fn save(&self, entry: &CacheEntry) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(entry.key.clone(), entry.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        Ok(entries.remove(key).is_some())
    }

    async fn entries(&self) -> Result<Vec<CacheEntry>, StoreError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.values().cloned().collect())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.entries.write().map_err(|_| poisoned())?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callkit_domain::Arguments;
    use chrono::Utc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_save_load_remove() {
        let store = InMemoryCacheStore::new();
        let entry = CacheEntry::new(
            "f",
            &Arguments::new().with("x", 1),
            "42",
            Duration::from_secs(60),
            Utc::now(),
        );

        store.save(&entry).await.unwrap();
        assert_eq!(store.load(&entry.key).await.unwrap(), Some(entry.clone()));
        assert_eq!(store.entries().await.unwrap().len(), 1);

        assert!(store.remove(&entry.key).await.unwrap());
        assert!(!store.remove(&entry.key).await.unwrap());
        assert!(store.load(&entry.key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let store = InMemoryCacheStore::new();
        for i in 0..3 {
            let entry = CacheEntry::new(
                "f",
                &Arguments::new().with("i", i),
                "r",
                Duration::from_secs(60),
                Utc::now(),
            );
            store.save(&entry).await.unwrap();
        }
        store.clear().await.unwrap();
        assert!(store.entries().await.unwrap().is_empty());
    }
}
