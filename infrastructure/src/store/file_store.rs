//! File-per-key durable tier.
//!
//! Layout: `<dir>/<key>.json`, each file one serialized [`CacheEntry`].
//! Writes go to a temporary file in the same directory and are renamed into
//! place, so readers only ever see a complete record.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use callkit_application::{DurableCacheStore, StoreError};
use callkit_domain::CacheEntry;
use tokio::fs;
use tracing::{debug, warn};

const EXTENSION: &str = "json";
const TMP_EXTENSION: &str = "tmp";

pub struct FileCacheStore {
    dir: PathBuf,
    tmp_counter: AtomicU64,
}

impl FileCacheStore {
    /// The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            tmp_counter: AtomicU64::new(0),
        }
    }

    /// `dirs::cache_dir()/callkit/functions`, if the platform has a cache dir
    pub fn default_dir() -> Option<PathBuf> {
        dirs::cache_dir().map(|d| d.join("callkit").join("functions"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        // keys are hex digests; anything else could escape the directory
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(StoreError::Io(format!("invalid cache key '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }

    fn tmp_path_for(&self, key: &str) -> PathBuf {
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        self.dir
            .join(format!("{key}.{}.{n}.{TMP_EXTENSION}", std::process::id()))
    }

    async fn read_entry(path: &Path) -> Result<Option<CacheEntry>, StoreError> {
        match fs::read_to_string(path).await {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Paths of every file in the directory with the given extension
    async fn files_with_extension(&self, extension: &str) -> Result<Vec<PathBuf>, StoreError> {
        let mut dir = match fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut paths = Vec::new();
        while let Some(item) = dir.next_entry().await? {
            let path = item.path();
            if path.extension().is_some_and(|ext| ext == extension) {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}

#[async_trait]
impl DurableCacheStore for FileCacheStore {
    async fn load(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        Self::read_entry(&self.path_for(key)?).await
    }

    async fn save(&self, entry: &CacheEntry) -> Result<(), StoreError> {
        let path = self.path_for(&entry.key)?;
        fs::create_dir_all(&self.dir).await?;

        let tmp = self.tmp_path_for(&entry.key);
        let body = serde_json::to_vec_pretty(entry)?;
        if let Err(e) = fs::write(&tmp, &body).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!(key = %entry.key, path = %path.display(), "Wrote cache entry");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        match fs::remove_file(self.path_for(key)?).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn entries(&self) -> Result<Vec<CacheEntry>, StoreError> {
        let mut entries = Vec::new();
        for path in self.files_with_extension(EXTENSION).await? {
            match Self::read_entry(&path).await {
                Ok(Some(entry)) => entries.push(entry),
                // removed concurrently
                Ok(None) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable cache file"),
            }
        }
        Ok(entries)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut paths = self.files_with_extension(EXTENSION).await?;
        paths.extend(self.files_with_extension(TMP_EXTENSION).await?);
        for path in paths {
            match fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
