//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::hash::Hash;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::TtlCache;

// == Cleanup Guard ==
/// Clears a cache's "sweep running" flag when the task ends.
///
/// Dropped on normal exit, on cancellation and on abort alike.
#[derive(Debug)]
pub(crate) struct CleanupGuard {
    running: Arc<Mutex<bool>>,
}

impl CleanupGuard {
    /// Wraps a flag the caller has already set.
    pub(crate) fn new(running: Arc<Mutex<bool>>) -> Self {
        Self { running }
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        *self.running.lock() = false;
    }
}

/// Spawns a task that calls `cleanup` on the cache every `interval`.
///
/// The first sweep happens one full interval after spawning. The loop exits
/// when `cancel` fires or the cache has been dropped; cancellation is only
/// observed between sweeps, never in the middle of one.
pub(crate) fn spawn_cleanup_task<K, V>(
    runtime: &Handle,
    cache: Weak<TtlCache<K, V>>,
    interval: Duration,
    cancel: CancellationToken,
    guard: CleanupGuard,
) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    runtime.spawn(async move {
        let _guard = guard;
        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_ms = interval.as_millis() as u64,
            "Starting TTL cleanup task"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("TTL cleanup task cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    let Some(cache) = cache.upgrade() else {
                        debug!("TTL cache dropped, stopping cleanup task");
                        break;
                    };

                    let removed = cache.cleanup();
                    if removed > 0 {
                        info!(removed, "TTL cleanup: removed expired entries");
                    } else {
                        debug!("TTL cleanup: no expired entries found");
                    }
                }
            }
        }
    })
}
