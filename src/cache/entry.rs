//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

/// Longest lifetime an entry can have (ten years); longer TTLs are clamped.
pub const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

// == Cache Entry ==
/// Represents a single cache entry with value and expiry metadata.
///
/// Times come from `tokio::time::Instant`, so a paused test runtime can
/// move entries past their expiry without sleeping.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored upstream record
    pub value: Value,
    /// When the entry was written
    pub created_at: Instant,
    /// When the entry stops being observable
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry that lives for `ttl_seconds`, at most [`MAX_TTL_SECS`].
    pub fn new(value: Value, ttl_seconds: u64) -> Self {
        let now = Instant::now();
        let max = Duration::from_secs(MAX_TTL_SECS);
        let expires_at = now
            .checked_add(Duration::from_secs(ttl_seconds).min(max))
            .unwrap_or(now + max);

        Self {
            value,
            created_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is live only while `now < expires_at`; at the expiry instant
    /// itself it is already gone.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against a caller-supplied instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
