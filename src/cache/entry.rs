//! Cache Entry Module
//!
//! Defines the structure for individual TTL cache entries.

use std::time::{Duration, Instant};

// == TTL Entry ==
/// A stored value plus the instant it was last written or refreshed.
#[derive(Debug, Clone)]
pub struct TtlEntry<V> {
    /// The stored value
    pub value: V,
    /// Last insertion or qualifying read
    pub last_access: Instant,
}

impl<V> TtlEntry<V> {
    // == Constructor ==
    /// Creates an entry whose freshness window starts at `now`.
    pub fn new(value: V, now: Instant) -> Self {
        Self {
            value,
            last_access: now,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `ttl` as of `now`.
    ///
    /// Boundary condition: an entry whose age equals the TTL is expired.
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) >= ttl
    }

    // == Age ==
    /// Time since the last access, saturating at zero.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_access)
    }

    // == Remaining ==
    /// Freshness left before the entry expires; zero once expired.
    pub fn remaining(&self, now: Instant, ttl: Duration) -> Duration {
        ttl.saturating_sub(self.age(now))
    }

    // == Touch ==
    /// Restarts the freshness window from `now`.
    pub fn touch(&mut self, now: Instant) {
        self.last_access = now;
    }
}
