//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::hash::Hash;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{LruCache, TtlCache};
use crate::error::Result;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Values are validated when a cache is built, not when they are loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries an LRU cache can hold
    pub capacity: usize,
    /// TTL in milliseconds for TTL cache entries
    pub ttl_ms: u64,
    /// Whether a TTL cache hit restarts the entry's freshness window
    pub reset_on_access: bool,
    /// Background cleanup task interval in milliseconds
    pub cleanup_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum LRU entries (default: 1000)
    /// - `CACHE_TTL_MS` - Entry TTL in milliseconds (default: 300000)
    /// - `CACHE_RESET_ON_ACCESS` - Refresh TTL on read (default: false)
    /// - `CACHE_CLEANUP_INTERVAL_MS` - Cleanup frequency in milliseconds (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: env_or("CACHE_CAPACITY", defaults.capacity),
            ttl_ms: env_or("CACHE_TTL_MS", defaults.ttl_ms),
            reset_on_access: env_or("CACHE_RESET_ON_ACCESS", defaults.reset_on_access),
            cleanup_interval_ms: env_or("CACHE_CLEANUP_INTERVAL_MS", defaults.cleanup_interval_ms),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_millis(self.cleanup_interval_ms)
    }

    /// Builds an LRU cache with the configured capacity.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidCapacity` if the capacity is zero.
    pub fn build_lru<K, V>(&self) -> Result<LruCache<K, V>>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        LruCache::new(self.capacity)
    }

    /// Builds a TTL cache with the configured TTL and reset policy.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidTtl` if the TTL is zero.
    pub fn build_ttl<K, V>(&self) -> Result<TtlCache<K, V>>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        TtlCache::new(self.ttl(), self.reset_on_access)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            ttl_ms: 300_000,
            reset_on_access: false,
            cleanup_interval_ms: 1000,
        }
    }
}

/// Parses `key` from the environment, falling back on absence or parse failure.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
