//! Fast in-memory tier of the result cache.

use callkit_domain::CacheEntry;
use chrono::{DateTime, Utc};
use lru::LruCache;

/// LRU map bounded by entry count and total byte cost.
///
/// The underlying [`LruCache`] is unbounded; both limits are enforced here
/// after every insert by dropping least-recently-used entries.
pub(crate) struct MemoryTier {
    entries: LruCache<String, CacheEntry>,
    bytes: usize,
    max_entries: usize,
    max_bytes: usize,
}

impl MemoryTier {
    pub(crate) fn new(max_entries: usize, max_bytes: usize) -> Self {
        Self {
            entries: LruCache::unbounded(),
            bytes: 0,
            max_entries,
            max_bytes,
        }
    }

    /// Look up and mark as most recently used
    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut CacheEntry> {
        self.entries.get_mut(key)
    }

    /// Look up without touching recency
    pub(crate) fn peek(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.peek(key)
    }

    /// Insert or replace; returns how many entries were dropped to fit.
    pub(crate) fn insert(&mut self, entry: CacheEntry) -> usize {
        if let Some(old) = self.entries.pop(&entry.key) {
            self.bytes = self.bytes.saturating_sub(old.size_bytes);
        }
        self.bytes += entry.size_bytes;
        self.entries.push(entry.key.clone(), entry);

        let mut dropped = 0;
        while self.entries.len() > self.max_entries || self.bytes > self.max_bytes {
            match self.entries.pop_lru() {
                Some((_, evicted)) => {
                    self.bytes = self.bytes.saturating_sub(evicted.size_bytes);
                    dropped += 1;
                }
                None => break,
            }
        }
        dropped
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let removed = self.entries.pop(key)?;
        self.bytes = self.bytes.saturating_sub(removed.size_bytes);
        Some(removed)
    }

    /// Remove every entry matching `predicate`; returns the removed keys.
    pub(crate) fn remove_where(&mut self, predicate: impl Fn(&CacheEntry) -> bool) -> Vec<String> {
        let keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| predicate(entry))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &keys {
            self.remove(key);
        }
        keys
    }

    pub(crate) fn remove_expired(&mut self, now: DateTime<Utc>) -> Vec<String> {
        self.remove_where(|entry| entry.is_expired_at(now))
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.bytes = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn bytes(&self) -> usize {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callkit_domain::Arguments;
    use chrono::TimeDelta;
    use std::time::Duration;

    fn entry(n: i64, result: &str, ttl_secs: u64) -> CacheEntry {
        CacheEntry::new(
            "f",
            &Arguments::new().with("n", n),
            result,
            Duration::from_secs(ttl_secs),
            Utc::now(),
        )
    }

    #[test]
    fn test_entry_limit_evicts_lru() {
        let mut tier = MemoryTier::new(2, usize::MAX);
        let (a, b, c) = (entry(1, "a", 60), entry(2, "b", 60), entry(3, "c", 60));
        let (ka, kb, kc) = (a.key.clone(), b.key.clone(), c.key.clone());

        assert_eq!(tier.insert(a), 0);
        assert_eq!(tier.insert(b), 0);
        // touch `a` so `b` becomes least recently used
        assert!(tier.get_mut(&ka).is_some());
        assert_eq!(tier.insert(c), 1);

        assert_eq!(tier.len(), 2);
        assert!(tier.get_mut(&ka).is_some());
        assert!(tier.get_mut(&kb).is_none());
        assert!(tier.get_mut(&kc).is_some());
    }

    #[test]
    fn test_peek_keeps_recency() {
        let mut tier = MemoryTier::new(2, usize::MAX);
        let (a, b) = (entry(1, "a", 60), entry(2, "b", 60));
        let ka = a.key.clone();
        tier.insert(a);
        tier.insert(b);

        assert_eq!(tier.peek(&ka).unwrap().result, "a");
        // `a` is still least recently used
        tier.insert(entry(3, "c", 60));
        assert!(tier.peek(&ka).is_none());
    }

    #[test]
    fn test_byte_limit_evicts() {
        let first = entry(1, &"x".repeat(100), 60);
        let size = first.size_bytes;
        let mut tier = MemoryTier::new(10, size + size / 2);

        tier.insert(first);
        let dropped = tier.insert(entry(2, &"y".repeat(100), 60));

        assert_eq!(dropped, 1);
        assert_eq!(tier.len(), 1);
        assert!(tier.bytes() <= size + size / 2);
    }

    #[test]
    fn test_replace_keeps_byte_count_consistent() {
        let mut tier = MemoryTier::new(10, usize::MAX);
        let first = entry(1, "short", 60);
        let key = first.key.clone();
        tier.insert(first);
        let second = entry(1, "a much longer result", 60);
        let expected = second.size_bytes;
        tier.insert(second);

        assert_eq!(tier.len(), 1);
        assert_eq!(tier.bytes(), expected);
        assert_eq!(tier.remove(&key).unwrap().result, "a much longer result");
        assert_eq!(tier.bytes(), 0);
    }

    #[test]
    fn test_remove_expired() {
        let mut tier = MemoryTier::new(10, usize::MAX);
        tier.insert(entry(1, "stale", 0));
        tier.insert(entry(2, "fresh", 3600));

        let removed = tier.remove_expired(Utc::now() + TimeDelta::seconds(1));
        assert_eq!(removed.len(), 1);
        assert_eq!(tier.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut tier = MemoryTier::new(10, usize::MAX);
        tier.insert(entry(1, "a", 60));
        tier.clear();
        assert_eq!(tier.len(), 0);
        assert_eq!(tier.bytes(), 0);
    }
}
