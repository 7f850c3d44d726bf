//! Cache Module
//!
//! Provides generic in-memory caches with LRU eviction and TTL expiration.

mod clock;
mod entry;
mod lru;
mod recency;
mod stats;
mod traits;
mod ttl;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{Clock, MockClock, SystemClock};
pub use entry::TtlEntry;
pub use lru::LruCache;
pub use recency::{Iter as RecencyIter, RecencyList};
pub use stats::CacheStats;
pub use traits::Cache;
pub use ttl::TtlCache;
