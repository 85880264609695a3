//! Cache Store Module
//!
//! Bounded key-value map combining TTL expiry with oldest-created eviction.
//!
//! The store is process-local: in a multi-instance deployment each instance
//! has an independent cache and invalidation in one instance has no effect
//! on another's. Staleness across instances is bounded only by TTL.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{AgeTracker, CacheEntry, CacheKey, CacheStats, Clock, SystemClock};

// == Cache Store ==
/// Bounded cache with per-entry expiry and capacity-based eviction.
///
/// Eviction removes the entry with the smallest creation time, not the
/// least recently read one: reads never promote an entry, which keeps
/// eviction O(1) and predictable. The clock is injected so expiry can be
/// tested without sleeping.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<CacheKey, CacheEntry<V>>,
    /// Insertion-order tracker, front = oldest created
    ages: AgeTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Time source for entry stamping and expiry checks
    clock: Arc<dyn Clock>,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a store with the given capacity, using the system clock.
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, Arc::new(SystemClock))
    }

    /// Creates a store with an injected clock.
    ///
    /// A zero capacity is clamped to one so an insert can always make room
    /// by evicting.
    pub fn with_clock(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            ages: AgeTracker::new(),
            stats: CacheStats::new(),
            capacity: capacity.max(1),
            clock,
        }
    }

    // == Set ==
    /// Stores a value under `key` with the given TTL in seconds.
    ///
    /// Overwriting an existing key replaces its value and resets both
    /// timestamps. When the store is at capacity, the oldest-created entry
    /// is evicted first, so a set always succeeds.
    pub fn set(&mut self, key: CacheKey, value: V, ttl_secs: u64) {
        let now = self.clock.now_ms();
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.capacity {
            if let Some(evicted) = self.ages.pop_oldest() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                debug!(key = %evicted, "evicted oldest entry at capacity");
            }
        }

        let entry = CacheEntry::new(value, now, ttl_secs);
        self.entries.insert(key.clone(), entry);
        self.ages.record(&key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns the value under `key`, or None when missing or expired.
    ///
    /// An expired entry is deleted as a side effect (lazy expiry). A hit
    /// has no side effect beyond the stats counter; in particular it does
    /// not protect the entry from eviction.
    pub fn get(&mut self, key: &CacheKey) -> Option<V> {
        let now = self.clock.now_ms();

        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired(now) {
            self.entries.remove(key);
            self.ages.remove(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            self.stats.set_total_entries(self.entries.len());
            debug!(%key, "lazily removed expired entry");
            return None;
        }

        self.stats.record_hit();
        Some(entry.value.clone())
    }

    // == Delete ==
    /// Removes the entry under `key`; returns whether one was present.
    pub fn delete(&mut self, key: &CacheKey) -> bool {
        if self.entries.remove(key).is_some() {
            self.ages.remove(key);
            self.stats.set_total_entries(self.entries.len());
            true
        } else {
            false
        }
    }

    // == Clear ==
    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.ages.clear();
        self.stats.set_total_entries(0);
    }

    // == Sweep Expired ==
    /// Removes every entry whose TTL has lapsed, whether or not it will
    /// ever be read again. Returns the number of entries removed.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired.len();
        for key in expired {
            self.entries.remove(&key);
            self.ages.remove(&key);
        }

        self.stats.record_expirations(count as u64);
        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Stats ==
    /// Returns a snapshot of the current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included until
    /// they are swept or lazily removed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
