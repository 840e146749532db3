//! Cache Module
//!
//! Provides the in-memory TTL store the lookup pipeline reads through.

mod entry;
mod stats;
mod store;


use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::{CacheEntry, MAX_TTL_SECS};
pub use stats::CacheStats;
pub use store::CacheStore;

/// Handle to the process-wide store, shared by the pipeline and the sweep task.
pub type SharedCache = Arc<RwLock<CacheStore>>;

/// Wraps a store so it can be handed to the pipeline and the sweep task.
pub fn shared(store: CacheStore) -> SharedCache {
    Arc::new(RwLock::new(store))
}
