//! Cache Store Module
//!
//! TTL-bound key/value store for upstream weather records. Entries expire
//! passively on read and are also removed by the periodic sweep. There is no
//! size cap and no LRU ranking: a key that is never read again stays in memory
//! until the next sweep notices it has expired.

use std::collections::HashMap;

use serde_json::Value;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats};
use crate::error::{Result, WeatherError};

// == Cache Store ==
/// Main cache storage with TTL support and hit/miss accounting.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Lifetime hit/miss counters
    stats: CacheStats,
    /// TTL in seconds applied when `set` is called without one
    default_ttl: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty CacheStore.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL in seconds for entries stored without an explicit TTL
    pub fn new(default_ttl: u64) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            default_ttl,
        }
    }

    /// TTL in seconds used when `set` receives `None`.
    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    // == Set ==
    /// Stores a value under `key`, replacing any previous entry and resetting its expiry.
    ///
    /// # Arguments
    /// * `key` - The cache key
    /// * `value` - The record to store
    /// * `ttl` - TTL in seconds (uses default_ttl if None); must be positive
    pub fn set(&mut self, key: String, value: Value, ttl: Option<u64>) -> Result<()> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        if ttl == 0 {
            return Err(WeatherError::InvalidArgument(
                "ttl must be a positive number of seconds".to_string(),
            ));
        }

        self.entries.insert(key, CacheEntry::new(value, ttl));
        Ok(())
    }

    // == Get ==
    /// Returns a copy of the live value for `key`.
    ///
    /// Missing and expired keys both count as misses; an expired entry is
    /// dropped on the spot.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                debug!(key, "cache entry expired");
                self.stats.record_miss();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Like `get`, but leaves the hit/miss counters untouched.
    pub fn peek(&self, key: &str) -> Option<Value> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    // == Delete ==
    /// Removes an entry by key, returning whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            debug!(key, "cache entry deleted");
        }
        removed
    }

    // == Flush ==
    /// Empties the store. Hit/miss counters are lifetime totals and survive.
    pub fn flush(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        debug!(count, "cache flushed");
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_keys(self.entries.len());
        stats
    }

    // == Sweep Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();

        self.entries.retain(|key, entry| {
            let expired = entry.is_expired_at(now);
            if expired {
                debug!(key = %key, "cache entry expired");
            }
            !expired
        });

        before - self.entries.len()
    }

    // == Length ==
    /// Returns the number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
