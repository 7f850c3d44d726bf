//! Mini Cache - A lightweight in-process cache library
//!
//! Provides generic key/value caches with LRU eviction and TTL expiration,
//! both safe to share across threads.

pub mod cache;
pub mod config;
pub mod error;
mod tasks;

pub use cache::{Cache, CacheStats, Clock, LruCache, MockClock, SystemClock, TtlCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tokio_util::sync::CancellationToken;
