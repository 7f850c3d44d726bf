//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check both engines against simple reference models.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{LruCache, MockClock, TtlCache};

// == Test Configuration ==
const KEY_SPACE: u8 = 16;
const TTL_MS: u64 = 100;

// == Strategies ==
#[derive(Debug, Clone)]
enum LruOp {
    Put { key: u8, value: u32 },
    Get { key: u8 },
    Remove { key: u8 },
}

fn lru_op_strategy() -> impl Strategy<Value = LruOp> {
    prop_oneof![
        3 => (0..KEY_SPACE, any::<u32>()).prop_map(|(key, value)| LruOp::Put { key, value }),
        2 => (0..KEY_SPACE).prop_map(|key| LruOp::Get { key }),
        1 => (0..KEY_SPACE).prop_map(|key| LruOp::Remove { key }),
    ]
}

#[derive(Debug, Clone)]
enum TtlOp {
    Put { key: u8, value: u32 },
    Get { key: u8 },
    Advance { ms: u64 },
    Cleanup,
}

fn ttl_op_strategy() -> impl Strategy<Value = TtlOp> {
    prop_oneof![
        3 => (0..KEY_SPACE, any::<u32>()).prop_map(|(key, value)| TtlOp::Put { key, value }),
        3 => (0..KEY_SPACE).prop_map(|key| TtlOp::Get { key }),
        2 => (0..=TTL_MS).prop_map(|ms| TtlOp::Advance { ms }),
        1 => Just(TtlOp::Cleanup),
    ]
}

// == Reference Models ==
/// Naive LRU: a vector ordered oldest-first, scanned on every touch.
#[derive(Default)]
struct LruModel {
    capacity: usize,
    order: Vec<(u8, u32)>,
}

impl LruModel {
    fn get(&mut self, key: u8) -> Option<u32> {
        let pos = self.order.iter().position(|(k, _)| *k == key)?;
        let entry = self.order.remove(pos);
        self.order.push(entry);
        Some(entry.1)
    }

    fn put(&mut self, key: u8, value: u32) {
        if let Some(pos) = self.order.iter().position(|(k, _)| *k == key) {
            self.order.remove(pos);
        } else if self.order.len() == self.capacity {
            self.order.remove(0);
        }
        self.order.push((key, value));
    }

    fn remove(&mut self, key: u8) -> Option<u32> {
        let pos = self.order.iter().position(|(k, _)| *k == key)?;
        Some(self.order.remove(pos).1)
    }
}

/// TTL model keyed by logical milliseconds.
struct TtlModel {
    now: u64,
    reset_on_access: bool,
    entries: HashMap<u8, (u32, u64)>,
}

impl TtlModel {
    fn is_expired(&self, last_access: u64) -> bool {
        self.now - last_access >= TTL_MS
    }

    fn get(&mut self, key: u8) -> Option<u32> {
        let (value, last_access) = *self.entries.get(&key)?;
        if self.is_expired(last_access) {
            self.entries.remove(&key);
            return None;
        }
        if self.reset_on_access {
            self.entries.insert(key, (value, self.now));
        }
        Some(value)
    }

    fn cleanup(&mut self) -> usize {
        let before = self.entries.len();
        let now = self.now;
        self.entries.retain(|_, (_, last)| now - *last < TTL_MS);
        before - self.entries.len()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Every operation agrees with the naive model, the size never exceeds
    // capacity, and each stored key appears exactly once in the ordering.
    #[test]
    fn prop_lru_matches_model(
        capacity in 1usize..8,
        ops in prop::collection::vec(lru_op_strategy(), 1..100)
    ) {
        let cache = LruCache::new(capacity).unwrap();
        let mut model = LruModel { capacity, ..Default::default() };

        for op in ops {
            match op {
                LruOp::Put { key, value } => {
                    cache.put(key, value);
                    model.put(key, value);
                }
                LruOp::Get { key } => {
                    prop_assert_eq!(cache.get(&key), model.get(key));
                }
                LruOp::Remove { key } => {
                    prop_assert_eq!(cache.remove(&key), model.remove(key));
                }
            }

            prop_assert!(cache.len() <= capacity, "size {} exceeds capacity {}", cache.len(), capacity);
            cache.assert_invariants();
            let expected: Vec<u8> = model.order.iter().map(|(k, _)| *k).collect();
            prop_assert_eq!(cache.keys(), expected);
        }
    }

    // Overwriting an existing key keeps the size and promotes the key.
    #[test]
    fn prop_lru_overwrite_promotes(
        capacity in 2usize..8,
        keys in prop::collection::hash_set(0..KEY_SPACE, 2..8),
        value in any::<u32>()
    ) {
        let cache = LruCache::new(capacity).unwrap();
        for key in &keys {
            cache.put(*key, 0);
        }

        let oldest = cache.keys()[0];
        let size_before = cache.len();
        cache.put(oldest, value);

        prop_assert_eq!(cache.len(), size_before);
        prop_assert_eq!(cache.keys().last().copied(), Some(oldest));
        prop_assert_eq!(cache.peek(&oldest), Some(value));
    }

    // Gets, puts and sweeps agree with the model at every logical instant.
    #[test]
    fn prop_ttl_matches_model(
        reset_on_access in any::<bool>(),
        ops in prop::collection::vec(ttl_op_strategy(), 1..100)
    ) {
        let clock = MockClock::new();
        let cache = TtlCache::with_clock(
            Duration::from_millis(TTL_MS),
            reset_on_access,
            Arc::new(clock.clone()),
        ).unwrap();
        let mut model = TtlModel { now: 0, reset_on_access, entries: HashMap::new() };

        for op in ops {
            match op {
                TtlOp::Put { key, value } => {
                    cache.put(key, value);
                    model.entries.insert(key, (value, model.now));
                }
                TtlOp::Get { key } => {
                    prop_assert_eq!(cache.get(&key), model.get(key));
                }
                TtlOp::Advance { ms } => {
                    clock.advance(Duration::from_millis(ms));
                    model.now += ms;
                }
                TtlOp::Cleanup => {
                    prop_assert_eq!(cache.cleanup(), model.cleanup());
                }
            }
            prop_assert_eq!(cache.len(), model.entries.len());
        }
    }

    // After a sweep nothing stored is stale and nothing fresh was dropped.
    #[test]
    fn prop_ttl_cleanup_removes_all_and_only_stale(
        ages in prop::collection::vec(0u64..(2 * TTL_MS), 1..32)
    ) {
        let clock = MockClock::new();
        let cache = TtlCache::with_clock(
            Duration::from_millis(TTL_MS),
            false,
            Arc::new(clock.clone()),
        ).unwrap();

        // Insert oldest first so entry i ends up with age ages_sorted[i]
        let mut ages_sorted = ages;
        ages_sorted.sort_unstable_by(|a, b| b.cmp(a));
        let mut elapsed = 0;
        for (i, age) in ages_sorted.iter().enumerate() {
            let target = ages_sorted[0] - age;
            clock.advance(Duration::from_millis(target - elapsed));
            elapsed = target;
            cache.put(i, *age);
        }
        clock.advance(Duration::from_millis(ages_sorted[0] - elapsed));

        let stale = ages_sorted.iter().filter(|age| **age >= TTL_MS).count();
        prop_assert_eq!(cache.cleanup(), stale);
        prop_assert_eq!(cache.len(), ages_sorted.len() - stale);

        for (i, age) in ages_sorted.iter().enumerate() {
            prop_assert_eq!(cache.remaining_ttl(&i).is_some(), *age < TTL_MS);
        }
    }
}
