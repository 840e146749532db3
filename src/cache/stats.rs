//! Cache Statistics Module
//!
//! Tracks lifetime hit/miss counters for the weather cache.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache performance.
///
/// `hits` and `misses` only ever grow; flushing the store leaves them alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of lookups answered from the cache
    pub hits: u64,
    /// Number of lookups that found nothing live
    pub misses: u64,
    /// Current number of stored entries
    pub keys: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn set_keys(&mut self, count: usize) {
        self.keys = count;
    }
}
