//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store against a plain HashMap model.

use proptest::prelude::*;
use std::collections::HashMap;
use std::thread::sleep;
use std::time::Duration;

use crate::cache::{current_timestamp_nanos, CacheStore, GenericCache, MapCache};

// == Strategies ==
/// Generates cache keys from a small alphabet so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,32}".prop_map(|s| s)
}

/// A single cache operation
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    SetPastExpiry { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        1 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::SetPastExpiry { key, value }),
        3 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Without a TTL the store behaves exactly like a HashMap, and past-expiry
    // writes never change it.
    #[test]
    fn prop_store_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let store = CacheStore::new(None);
        let mut model: HashMap<String, String> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), value.clone());
                    model.insert(key, value);
                }
                CacheOp::SetPastExpiry { key, value } => {
                    let past = current_timestamp_nanos() - 1_000_000_000;
                    prop_assert!(!store.set_with_expiry(key, past, value));
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(store.get(&key), model.get(&key).cloned());
                }
                CacheOp::Delete { key } => {
                    prop_assert_eq!(store.delete(&key), model.remove(&key));
                }
            }
            prop_assert_eq!(store.len(), model.len());
        }
    }

    // Hit and miss counters reflect every get.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let store = CacheStore::new(Some(Duration::from_secs(300)));
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;
        let mut expected_dropped: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => store.set(key, value),
                CacheOp::SetPastExpiry { key, value } => {
                    store.set_with_expiry(key, 0, value);
                    expected_dropped += 1;
                }
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Delete { key } => {
                    store.delete(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.expired_writes_dropped, expected_dropped);
        prop_assert_eq!(stats.total_entries, store.len(), "Total entries mismatch");
    }

    // Storing then deleting returns the stored value and leaves nothing behind.
    #[test]
    fn prop_delete_returns_value(key in key_strategy(), value in value_strategy()) {
        let store = CacheStore::new(Some(Duration::from_secs(300)));

        store.set(key.clone(), value.clone());
        prop_assert_eq!(store.delete(&key), Some(value));
        prop_assert!(store.get(&key).is_none(), "Key should not exist after delete");
        prop_assert!(store.delete(&key).is_none(), "Second delete should be a no-op");
    }

    // MapCache and CacheStore agree on every sequence of plain operations.
    #[test]
    fn prop_map_cache_agrees_with_store(ops in prop::collection::vec(cache_op_strategy(), 1..40)) {
        let store = CacheStore::new(None);
        let mut map = MapCache::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), value.clone());
                    map.set(key, value);
                }
                CacheOp::SetPastExpiry { .. } => {}
                CacheOp::Get { key } => {
                    prop_assert_eq!(store.get(&key), map.get(&key));
                }
                CacheOp::Delete { key } => {
                    prop_assert_eq!(store.delete(&key), map.delete(&key));
                }
            }
        }
        prop_assert_eq!(store.len(), map.len());
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // Entries read back before the TTL and are absent after it, even though
    // nothing has swept them.
    #[test]
    fn prop_ttl_expiration_behavior(key in key_strategy(), value in value_strategy()) {
        let store = CacheStore::new(Some(Duration::from_millis(40)));

        store.set(key.clone(), value.clone());
        prop_assert_eq!(store.get(&key), Some(value), "Value should match before expiration");

        sleep(Duration::from_millis(90));

        prop_assert!(store.get(&key).is_none(), "Entry should not be found after TTL expires");
        prop_assert_eq!(store.len(), 1, "Lazy expiry must not remove the entry");
        prop_assert_eq!(store.cleanup_expired(), 1);
        prop_assert!(store.is_empty());
    }
}
