//! TTL Cache Module
//!
//! Unbounded cache whose entries expire a fixed duration after their last
//! write (or read, when reset-on-access is enabled).

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::cache::entry::TtlEntry;
use crate::cache::stats::StatsRecorder;
use crate::cache::{Cache, CacheStats, Clock, SystemClock};
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_cleanup_task, CleanupGuard};

// == TTL Cache ==
/// Thread-safe cache with per-entry time-to-live.
///
/// Stale entries are never returned. They are removed lazily when read, or
/// eagerly by [`TtlCache::cleanup`]. The cache has no size bound, so memory
/// stays bounded only if `cleanup` runs periodically, typically through
/// [`TtlCache::schedule_cleanup`].
pub struct TtlCache<K, V> {
    /// Key-value storage
    entries: RwLock<HashMap<K, TtlEntry<V>>>,
    /// Freshness window, always non-zero
    time_to_live: Duration,
    /// Whether a hit restarts the freshness window
    reset_on_access: bool,
    /// Time source for freshness checks
    clock: Arc<dyn Clock>,
    /// Set while a background sweep task is alive
    cleanup_running: Arc<Mutex<bool>>,
    /// Performance statistics
    stats: StatsRecorder,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty cache using the system clock.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidTtl` if `ttl` is zero.
    pub fn new(ttl: Duration, reset_on_access: bool) -> Result<Self> {
        Self::with_clock(ttl, reset_on_access, Arc::new(SystemClock))
    }

    /// Creates an empty cache reading time from `clock`.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidTtl` if `ttl` is zero.
    pub fn with_clock(ttl: Duration, reset_on_access: bool, clock: Arc<dyn Clock>) -> Result<Self> {
        if ttl.is_zero() {
            return Err(CacheError::InvalidTtl);
        }

        debug!(
            ttl_ms = ttl.as_millis() as u64,
            reset_on_access, "Created TTL cache"
        );
        Ok(Self {
            entries: RwLock::new(HashMap::new()),
            time_to_live: ttl,
            reset_on_access,
            clock,
            cleanup_running: Arc::new(Mutex::new(false)),
            stats: StatsRecorder::new(),
        })
    }

    // == Get ==
    /// Retrieves a fresh value by key.
    ///
    /// An expired entry is reported as a miss and removed. With reset-on-access
    /// enabled, a hit restarts the entry's freshness window.
    ///
    /// The common path holds only the shared lock. Removal and refresh need the
    /// exclusive lock, which is taken after the shared one is released, so the
    /// entry is re-checked once exclusive access is obtained.
    pub fn get(&self, key: &K) -> Option<V> {
        {
            let entries = self.entries.read();
            let now = self.clock.now();
            match entries.get(key) {
                None => {
                    self.stats.record_miss();
                    return None;
                }
                Some(entry) if !self.reset_on_access && !entry.is_expired(now, self.time_to_live) => {
                    self.stats.record_hit();
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write();
        let now = self.clock.now();
        let expired = entries
            .get(key)
            .map(|entry| entry.is_expired(now, self.time_to_live));

        let value = match expired {
            Some(true) => {
                entries.remove(key);
                self.stats.record_expirations(1);
                trace!("Removed expired entry on read");
                None
            }
            Some(false) => entries.get_mut(key).map(|entry| {
                if self.reset_on_access {
                    entry.touch(now);
                }
                entry.value.clone()
            }),
            // Removed by another thread between the two locks
            None => None,
        };

        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    // == Put ==
    /// Inserts or replaces an entry, starting a new freshness window.
    pub fn put(&self, key: K, value: V) {
        let mut entries = self.entries.write();
        let now = self.clock.now();
        entries.insert(key, TtlEntry::new(value, now));
    }

    // == Remove ==
    /// Removes an entry by key, returning its value even if it had expired.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.entries.write().remove(key).map(|entry| entry.value)
    }

    // == Contains ==
    /// Checks if a fresh entry exists, without refreshing it.
    pub fn contains(&self, key: &K) -> bool {
        self.remaining_ttl(key).is_some()
    }

    // == Remaining TTL ==
    /// Freshness left for `key`, or None if absent or expired.
    ///
    /// Never refreshes or removes the entry.
    pub fn remaining_ttl(&self, key: &K) -> Option<Duration> {
        let entries = self.entries.read();
        let now = self.clock.now();
        entries
            .get(key)
            .filter(|entry| !entry.is_expired(now, self.time_to_live))
            .map(|entry| entry.remaining(now, self.time_to_live))
    }

    // == Clear ==
    /// Removes every entry. Statistics are kept.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    // == Cleanup ==
    /// Removes all entries whose age has reached the TTL.
    ///
    /// Returns the number of entries removed. Runs in time proportional to the
    /// number of stored entries while holding the exclusive lock.
    pub fn cleanup(&self) -> usize {
        let mut entries = self.entries.write();
        let now = self.clock.now();
        let before = entries.len();

        entries.retain(|_, entry| !entry.is_expired(now, self.time_to_live));

        let removed = before - entries.len();
        self.stats.record_expirations(removed);
        trace!(removed, remaining = entries.len(), "TTL sweep finished");
        removed
    }

    // == Length ==
    /// Returns the number of stored entries.
    ///
    /// This is a raw count: entries that have expired but were not yet read or
    /// swept are included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    // == Accessors ==
    pub fn time_to_live(&self) -> Duration {
        self.time_to_live
    }

    pub fn reset_on_access(&self) -> bool {
        self.reset_on_access
    }

    /// Whether a background sweep task is currently alive.
    pub fn is_cleanup_running(&self) -> bool {
        *self.cleanup_running.lock()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read();
        self.stats.snapshot(entries.len())
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    // == Schedule Cleanup ==
    /// Starts a background task calling [`TtlCache::cleanup`] every `interval`.
    ///
    /// The task stops when `cancel` fires or when the cache is dropped. Only one
    /// task runs per cache: while it is alive further calls return `Ok(None)`.
    /// Once it has stopped, a new call starts a fresh task.
    ///
    /// # Errors
    /// - `CacheError::InvalidInterval` if `interval` is zero
    /// - `CacheError::NoRuntime` if called outside a tokio runtime
    pub fn schedule_cleanup(
        self: &Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Result<Option<JoinHandle<()>>> {
        if interval.is_zero() {
            return Err(CacheError::InvalidInterval);
        }
        let runtime = Handle::try_current().map_err(|e| CacheError::NoRuntime(e.to_string()))?;

        let guard = {
            let mut running = self.cleanup_running.lock();
            if *running {
                debug!("TTL cleanup task already running, ignoring schedule request");
                return Ok(None);
            }
            *running = true;
            CleanupGuard::new(Arc::clone(&self.cleanup_running))
        };

        Ok(Some(spawn_cleanup_task(
            &runtime,
            Arc::downgrade(self),
            interval,
            cancel,
            guard,
        )))
    }
}

impl<K, V> fmt::Debug for TtlCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("len", &self.entries.read().len())
            .field("time_to_live", &self.time_to_live)
            .field("reset_on_access", &self.reset_on_access)
            .finish()
    }
}

impl<K, V> Cache<K, V> for TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn get(&self, key: &K) -> Option<V> {
        TtlCache::get(self, key)
    }

    fn put(&self, key: K, value: V) {
        TtlCache::put(self, key, value)
    }

    fn remove(&self, key: &K) -> Option<V> {
        TtlCache::remove(self, key)
    }

    fn len(&self) -> usize {
        TtlCache::len(self)
    }

    fn stats(&self) -> CacheStats {
        TtlCache::stats(self)
    }
}
