//! Two-tier result cache for function outputs.
//!
//! ```text
//! get(name, args)
//!   ├─ fast tier (LRU, entry + byte bounded) ── hit ──▶ hit_count += 1, return
//!   ├─ durable tier (DurableCacheStore) ─────── hit ──▶ promote to fast tier, return
//!   └─ miss
//!
//! set(name, args, result, ttl) ──▶ durable tier + fast tier
//! ```
//!
//! Keys come from [`generate_key`], so argument insertion order never
//! matters. Expired entries are never returned: a lookup past expiry is a
//! miss that removes the entry, and [`ResultCache::spawn_sweeper`] purges
//! the rest periodically.
//!
//! Lookups never write to the durable tier. Hit counts live in the fast
//! tier and are merged into [`ResultCache::entries`]. Every `set` and
//! `invalidate` bumps a generation counter under the fast tier lock; a
//! durable hit is only promoted if the generation is unchanged, so a lookup
//! racing a write or an invalidation cannot bring back an older result.
//!
//! Durable usage is tracked incrementally and recomputed from a full
//! listing only by [`ResultCache::sweep_expired`] and
//! [`ResultCache::refresh_usage`].
//!
//! Durable tier failures are logged and swallowed; callers only ever see a
//! miss or a skipped write.

mod memory_tier;

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use callkit_domain::{Arguments, CacheEntry, CacheStatistics, generate_key};
use chrono::Utc;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::CacheParams;
use crate::ports::cache_store::DurableCacheStore;
use memory_tier::MemoryTier;

#[derive(Debug, Default, Clone, Copy)]
struct DurableUsage {
    entries: usize,
    bytes: usize,
}

impl DurableUsage {
    fn from_entries<'a>(entries: impl Iterator<Item = &'a CacheEntry>) -> Self {
        entries.fold(Self::default(), |usage, entry| Self {
            entries: usage.entries + 1,
            bytes: usage.bytes + entry.size_bytes,
        })
    }

    /// Account for a save that replaced an entry of `previous` bytes, if any
    fn saved(&mut self, previous: Option<usize>, bytes: usize) {
        match previous {
            Some(old) => self.bytes = self.bytes.saturating_sub(old),
            None => self.entries += 1,
        }
        self.bytes += bytes;
    }

    fn removed(&mut self, bytes: usize) {
        self.entries = self.entries.saturating_sub(1);
        self.bytes = self.bytes.saturating_sub(bytes);
    }
}

pub struct ResultCache {
    memory: Mutex<MemoryTier>,
    durable: Arc<dyn DurableCacheStore>,
    durable_usage: Mutex<DurableUsage>,
    generation: AtomicU64,
    default_ttl: Duration,
    total_requests: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    evictions: AtomicU64,
    memory_evictions: AtomicU64,
}

impl ResultCache {
    pub fn new(durable: Arc<dyn DurableCacheStore>, params: &CacheParams) -> Self {
        Self {
            memory: Mutex::new(MemoryTier::new(
                params.max_memory_entries,
                params.max_memory_bytes,
            )),
            durable,
            durable_usage: Mutex::new(DurableUsage::default()),
            generation: AtomicU64::new(0),
            default_ttl: params.default_ttl,
            total_requests: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            memory_evictions: AtomicU64::new(0),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Look up a cached result.
    pub async fn get(&self, function_name: &str, arguments: &Arguments) -> Option<String> {
        let key = generate_key(function_name, arguments);
        let now = Utc::now();
        self.total_requests.fetch_add(1, Ordering::Relaxed);

        let mut expired = false;
        let generation = {
            let mut memory = self.memory.lock();
            match memory.get_mut(&key) {
                Some(entry) if !entry.is_expired_at(now) => {
                    entry.record_hit();
                    let result = entry.result.clone();
                    drop(memory);
                    self.cache_hits.fetch_add(1, Ordering::Relaxed);
                    debug!(function = %function_name, key = %key, tier = "memory", "Cache hit");
                    return Some(result);
                }
                Some(_) => {
                    memory.remove(&key);
                    expired = true;
                }
                None => {}
            }
            self.generation.load(Ordering::Acquire)
        };

        match self.durable.load(&key).await {
            Ok(Some(mut entry)) if !entry.is_expired_at(now) => {
                entry.record_hit();
                let result = entry.result.clone();
                {
                    let mut memory = self.memory.lock();
                    if self.generation.load(Ordering::Acquire) == generation {
                        let dropped = memory.insert(entry);
                        self.memory_evictions
                            .fetch_add(dropped as u64, Ordering::Relaxed);
                    } else {
                        debug!(key = %key, "Cache changed during lookup, not promoting");
                    }
                }
                self.cache_hits.fetch_add(1, Ordering::Relaxed);
                debug!(function = %function_name, key = %key, tier = "durable", "Cache hit");
                return Some(result);
            }
            Ok(Some(stale)) => {
                expired = true;
                // a concurrent set may already have replaced the stale record
                if self.generation.load(Ordering::Acquire) == generation {
                    match self.durable.remove(&key).await {
                        Ok(true) => self.durable_usage.lock().removed(stale.size_bytes),
                        Ok(false) => {}
                        Err(e) => warn!(key = %key, error = %e, "Failed to remove expired cache entry"),
                    }
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(key = %key, error = %e, "Durable cache read failed, treating as miss");
            }
        }

        if expired {
            self.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(function = %function_name, key = %key, "Cache entry expired");
        }
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a result in both tiers, expiring `ttl` from now.
    pub async fn set(
        &self,
        function_name: &str,
        arguments: &Arguments,
        result: impl Into<String>,
        ttl: Duration,
    ) {
        let entry = CacheEntry::new(function_name, arguments, result, ttl, Utc::now());
        debug!(
            function = %function_name,
            key = %entry.key,
            ttl_secs = ttl.as_secs(),
            bytes = entry.size_bytes,
            "Caching result"
        );

        let previous = match self.durable.load(&entry.key).await {
            Ok(previous) => previous.map(|e| e.size_bytes),
            Err(_) => None,
        };
        match self.durable.save(&entry).await {
            Ok(()) => self.durable_usage.lock().saved(previous, entry.size_bytes),
            Err(e) => warn!(key = %entry.key, error = %e, "Durable cache write failed, skipping"),
        }

        let dropped = {
            let mut memory = self.memory.lock();
            self.generation.fetch_add(1, Ordering::AcqRel);
            memory.insert(entry)
        };
        if dropped > 0 {
            self.memory_evictions
                .fetch_add(dropped as u64, Ordering::Relaxed);
            debug!(dropped, "Fast tier over capacity, dropped least recently used entries");
        }
    }

    /// Store with the configured default TTL
    pub async fn set_default(&self, function_name: &str, arguments: &Arguments, result: impl Into<String>) {
        self.set(function_name, arguments, result, self.default_ttl).await;
    }

    /// Drop cached results.
    ///
    /// With a function name, removes that function's entries from both tiers.
    /// Without one, clears both tiers and resets the statistics.
    ///
    /// The durable tier is cleaned first; the fast tier is cleaned together
    /// with the generation bump so no lookup in flight can repopulate it.
    pub async fn invalidate(&self, function_name: Option<&str>) {
        match function_name {
            Some(name) => {
                let mut removed_durable = 0usize;
                match self.durable.entries().await {
                    Ok(entries) => {
                        let mut remaining = Vec::with_capacity(entries.len());
                        for entry in entries {
                            if entry.function_name != name {
                                remaining.push(entry);
                                continue;
                            }
                            match self.durable.remove(&entry.key).await {
                                Ok(true) => removed_durable += 1,
                                Ok(false) => {}
                                Err(e) => {
                                    warn!(key = %entry.key, error = %e, "Failed to remove cache entry");
                                    remaining.push(entry);
                                }
                            }
                        }
                        *self.durable_usage.lock() = DurableUsage::from_entries(remaining.iter());
                    }
                    Err(e) => warn!(error = %e, "Durable cache listing failed during invalidation"),
                }

                let removed_memory = {
                    let mut memory = self.memory.lock();
                    self.generation.fetch_add(1, Ordering::AcqRel);
                    memory.remove_where(|e| e.function_name == name)
                };

                debug!(
                    function = %name,
                    memory = removed_memory.len(),
                    durable = removed_durable,
                    "Invalidated cached results"
                );
            }
            None => {
                match self.durable.clear().await {
                    Ok(()) => *self.durable_usage.lock() = DurableUsage::default(),
                    Err(e) => warn!(error = %e, "Failed to clear durable cache"),
                }
                {
                    let mut memory = self.memory.lock();
                    self.generation.fetch_add(1, Ordering::AcqRel);
                    memory.clear();
                }
                for counter in [
                    &self.total_requests,
                    &self.cache_hits,
                    &self.cache_misses,
                    &self.evictions,
                    &self.memory_evictions,
                ] {
                    counter.store(0, Ordering::Relaxed);
                }
                debug!("Cleared result cache");
            }
        }
    }

    /// Remove every expired entry from both tiers.
    ///
    /// Returns the number of distinct keys removed, which is also added to
    /// the eviction counter. Durable usage is recomputed from the listing.
    pub async fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut removed: HashSet<String> = self.memory.lock().remove_expired(now).into_iter().collect();

        match self.durable.entries().await {
            Ok(entries) => {
                let mut remaining = Vec::with_capacity(entries.len());
                for entry in entries {
                    if !entry.is_expired_at(now) {
                        remaining.push(entry);
                        continue;
                    }
                    match self.durable.remove(&entry.key).await {
                        Ok(_) => {
                            removed.insert(entry.key);
                        }
                        Err(e) => {
                            warn!(key = %entry.key, error = %e, "Failed to evict expired entry");
                            remaining.push(entry);
                        }
                    }
                }
                *self.durable_usage.lock() = DurableUsage::from_entries(remaining.iter());
            }
            Err(e) => warn!(error = %e, "Durable cache listing failed during sweep"),
        }

        let count = removed.len();
        if count > 0 {
            self.evictions.fetch_add(count as u64, Ordering::Relaxed);
            debug!(evicted = count, "Swept expired cache entries");
        }
        count
    }

    /// Run [`sweep_expired`](Self::sweep_expired) every `interval` until
    /// `token` is cancelled.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        interval: Duration,
        token: CancellationToken,
    ) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("Cache sweeper stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        cache.sweep_expired().await;
                    }
                }
            }
        })
    }

    /// Recompute durable tier usage from a full listing of the store.
    pub async fn refresh_usage(&self) {
        match self.durable.entries().await {
            Ok(entries) => {
                *self.durable_usage.lock() = DurableUsage::from_entries(entries.iter());
            }
            Err(e) => warn!(error = %e, "Could not compute durable cache usage"),
        }
    }

    /// Entries in the durable tier, oldest first, with hit counts from the
    /// fast tier merged in; empty if the store cannot be listed.
    pub async fn entries(&self) -> Vec<CacheEntry> {
        match self.durable.entries().await {
            Ok(mut entries) => {
                {
                    let memory = self.memory.lock();
                    for entry in &mut entries {
                        if let Some(live) = memory.peek(&entry.key) {
                            entry.hit_count = entry.hit_count.max(live.hit_count);
                        }
                    }
                }
                entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
                entries
            }
            Err(e) => {
                warn!(error = %e, "Durable cache listing failed");
                Vec::new()
            }
        }
    }

    /// Entries currently held in the fast tier
    pub fn len_memory(&self) -> usize {
        self.memory.lock().len()
    }

    pub fn stats(&self) -> CacheStatistics {
        let (memory_entries, memory_bytes) = {
            let memory = self.memory.lock();
            (memory.len(), memory.bytes())
        };
        let durable = *self.durable_usage.lock();

        CacheStatistics {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            memory_evictions: self.memory_evictions.load(Ordering::Relaxed),
            memory_entries,
            memory_bytes,
            durable_entries: durable.entries,
            durable_bytes: durable.bytes,
        }
    }
}
