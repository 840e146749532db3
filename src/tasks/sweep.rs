//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries and
//! reports cache statistics.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::{SharedCache, MAX_TTL_SECS};

// == Sweep Task ==
/// Handle to the running sweep.
///
/// The sweep stops when the handle is shut down or dropped.
#[derive(Debug)]
pub struct SweepTask {
    handle: JoinHandle<()>,
}

impl SweepTask {
    /// Spawns the sweep on the current tokio runtime.
    ///
    /// The first sweep runs one full `interval` after spawning. The interval
    /// is clamped to between one second and [`MAX_TTL_SECS`].
    ///
    /// # Example
    /// ```ignore
    /// let cache = cache::shared(CacheStore::new(43_200));
    /// let sweep = SweepTask::spawn(cache.clone(), Duration::from_secs(8_640));
    /// // Later, during shutdown:
    /// sweep.shutdown().await;
    /// ```
    pub fn spawn(cache: SharedCache, interval: Duration) -> Self {
        let interval = interval.clamp(Duration::from_secs(1), Duration::from_secs(MAX_TTL_SECS));
        let handle = tokio::spawn(async move {
            info!(
                "Starting cache sweep task with interval of {} seconds",
                interval.as_secs()
            );

            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let (removed, stats) = {
                    let mut cache_guard = cache.write().await;
                    let removed = cache_guard.sweep_expired();
                    (removed, cache_guard.stats())
                };

                if removed > 0 {
                    info!("Cache sweep: removed {} expired entries", removed);
                } else {
                    debug!("Cache sweep: no expired entries found");
                }

                info!(
                    keys = stats.keys,
                    hits = stats.hits,
                    misses = stats.misses,
                    hit_rate = stats.hit_rate(),
                    "Cache stats"
                );
            }
        });

        Self { handle }
    }

    /// Stops the sweep and waits for the task to wind down.
    pub async fn shutdown(mut self) {
        self.handle.abort();
        let _ = (&mut self.handle).await;
        info!("Cache sweep task stopped");
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SweepTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
