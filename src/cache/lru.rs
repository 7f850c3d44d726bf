//! LRU Cache Module
//!
//! Capacity-bounded cache that evicts the least recently used entry.

use std::hash::Hash;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::recency::RecencyList;
use crate::cache::stats::StatsRecorder;
use crate::cache::{Cache, CacheStats};
use crate::error::{CacheError, Result};

// == LRU Cache ==
/// Thread-safe LRU cache with a fixed entry capacity.
///
/// Every operation, reads included, takes the single exclusive lock: a hit
/// reorders the recency list, so there is no shared-read mode.
///
/// ```
/// use mini_cache::LruCache;
///
/// let cache = LruCache::new(2).unwrap();
/// cache.put("a", 1);
/// cache.put("b", 2);
/// cache.get(&"a");
/// cache.put("c", 3);
/// assert_eq!(cache.get(&"b"), None);
/// assert_eq!(cache.get(&"a"), Some(1));
/// ```
#[derive(Debug)]
pub struct LruCache<K, V> {
    /// Maximum number of entries allowed
    capacity: usize,
    /// Entries ordered by recency
    entries: Mutex<RecencyList<K, V>>,
    /// Performance statistics
    stats: StatsRecorder,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidCapacity` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity);
        }

        debug!(capacity, "Created LRU cache");
        Ok(Self {
            capacity,
            entries: Mutex::new(RecencyList::with_capacity(capacity)),
            stats: StatsRecorder::new(),
        })
    }

    // == Get ==
    /// Retrieves a value by key and marks it most recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(value) => {
                self.stats.record_hit();
                Some(value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Retrieves a value without affecting eviction order or statistics.
    pub fn peek(&self, key: &K) -> Option<V> {
        self.entries.lock().peek(key).cloned()
    }

    // == Put ==
    /// Stores a key-value pair as the most recently used entry.
    ///
    /// Overwriting an existing key never evicts. Inserting a new key into a
    /// full cache evicts the least recently used entry first, so the cache
    /// never holds more than `capacity` entries.
    pub fn put(&self, key: K, value: V) {
        let mut entries = self.entries.lock();

        let is_overwrite = entries.contains(&key);
        if !is_overwrite && entries.len() >= self.capacity && entries.pop_oldest().is_some() {
            self.stats.record_eviction();
            trace!(capacity = self.capacity, "Evicted least recently used entry");
        }

        entries.insert(key, value);
    }

    // == Remove ==
    /// Removes an entry by key, returning its value if it was present.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.entries.lock().remove(key)
    }

    // == Contains ==
    /// Checks if a key is present without touching it.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.lock().contains(key)
    }

    // == Clear ==
    /// Removes every entry. Statistics are kept.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    // == Keys ==
    /// Snapshot of keys from least to most recently used.
    pub fn keys(&self) -> Vec<K> {
        self.entries.lock().iter().map(|(k, _)| k.clone()).collect()
    }

    // == Capacity ==
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock();
        self.stats.snapshot(entries.len())
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let entries = self.entries.lock();
        entries.assert_invariants();
        assert!(entries.len() <= self.capacity, "capacity exceeded");
    }
}

impl<K, V> Cache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn get(&self, key: &K) -> Option<V> {
        LruCache::get(self, key)
    }

    fn put(&self, key: K, value: V) {
        LruCache::put(self, key, value)
    }

    fn remove(&self, key: &K) -> Option<V> {
        LruCache::remove(self, key)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn stats(&self) -> CacheStats {
        LruCache::stats(self)
    }
}
