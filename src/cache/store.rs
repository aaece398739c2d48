//! Cache Store Module
//!
//! Concurrent response cache with a sliding TTL and an explicit sweep.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheEntry, CacheKey, CacheStats};
use crate::error::Result;

// == Strings Cache ==
/// Memoizes generated connected-content responses per parameter combination.
///
/// Safe to share between tasks behind an `Arc`; every operation only holds a
/// shard lock for the duration of the map access. Entries are never removed
/// on read: [`evict_expired`](Self::evict_expired) must be called
/// periodically, see [`crate::tasks::spawn_eviction_task`].
#[derive(Debug)]
pub struct StringsCache {
    /// Cached payloads keyed by canonical parameters
    entries: DashMap<CacheKey, CacheEntry>,
    /// Performance statistics
    stats: StatsCounters,
    /// Lifetime granted by a store or a touch
    ttl: Duration,
}

impl StringsCache {
    // == Constructor ==
    /// Creates an empty cache whose entries live for `ttl` after their last touch.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            stats: StatsCounters::default(),
            ttl,
        }
    }

    // == Compute Key ==
    /// Derives the lookup key for a flat parameter map.
    pub fn compute_key(params: &HashMap<String, String>) -> Result<CacheKey> {
        CacheKey::from_params(params)
    }

    // == Get ==
    /// Returns a copy of the entry stored under `key`.
    ///
    /// Does not refresh the TTL; call [`touch`](Self::touch) when the hit is reused.
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        match self.entries.get(key) {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.value().clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Touch ==
    /// Resets the expiration of the entry under `key` to `now + ttl`.
    ///
    /// Returns false if the entry is gone (evicted since the lookup).
    pub fn touch(&self, key: &CacheKey) -> bool {
        match self.entries.get_mut(key) {
            Some(mut entry) => {
                entry.touch(self.ttl);
                true
            }
            None => false,
        }
    }

    // == Store ==
    /// Inserts or overwrites the payload for `key` with a fresh TTL.
    pub fn store(&self, key: CacheKey, data: Vec<u8>) {
        self.entries.insert(key, CacheEntry::new(data, self.ttl));
    }

    // == Evict Expired ==
    /// Removes every entry whose expiration has passed.
    ///
    /// Returns the number of entries removed.
    pub fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let expired = entry.is_expired_at(now);
            if expired {
                removed += 1;
            }
            !expired
        });

        self.stats.record_evictions(removed as u64);
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len())
    }

    /// Lifetime granted by a store or a touch.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
