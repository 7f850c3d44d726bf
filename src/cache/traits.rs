//! Cache Contract Module
//!
//! Policy-independent interface implemented by every eviction engine.

use crate::cache::CacheStats;

// == Cache Trait ==
/// Uniform operations shared by all cache policies.
///
/// Methods take `&self`: engines synchronize internally and can be shared
/// across threads behind an `Arc`. Policy-specific operations such as TTL
/// sweeping live on the concrete types.
///
/// ```
/// use mini_cache::{Cache, LruCache, TtlCache};
/// use std::time::Duration;
///
/// fn warm(cache: &dyn Cache<u32, String>) {
///     cache.put(1, "one".to_string());
/// }
///
/// let lru = LruCache::new(8).unwrap();
/// let ttl = TtlCache::new(Duration::from_secs(60), false).unwrap();
/// warm(&lru);
/// warm(&ttl);
/// assert_eq!(Cache::get(&lru, &1).as_deref(), Some("one"));
/// assert_eq!(Cache::get(&ttl, &1).as_deref(), Some("one"));
/// ```
pub trait Cache<K, V> {
    /// Returns a clone of the value stored under `key`, if any.
    ///
    /// May update policy bookkeeping (recency, freshness) as a side effect.
    fn get(&self, key: &K) -> Option<V>;

    /// Inserts or replaces the value stored under `key`.
    ///
    /// May evict another entry as a side effect.
    fn put(&self, key: K, value: V);

    /// Removes `key`, returning its value if present.
    fn remove(&self, key: &K) -> Option<V>;

    /// Number of entries physically stored.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of hit/miss/eviction counters.
    fn stats(&self) -> CacheStats;
}
