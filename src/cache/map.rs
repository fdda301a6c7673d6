//! Unsynchronized map cache with no expiry.

use std::collections::HashMap;

use crate::cache::GenericCache;

/// Plain `HashMap` cache for single-threaded use.
///
/// Entries never expire. Wrap it in a lock yourself or use
/// [`ConcurrentCache`](crate::cache::ConcurrentCache) for shared access.
#[derive(Debug, Clone, Default)]
pub struct MapCache<V> {
    entries: HashMap<String, V>,
}

impl<V> MapCache<V> {
    /// Creates an empty map cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> GenericCache<V> for MapCache<V> {
    fn set(&mut self, key: String, value: V) {
        self.entries.insert(key, value);
    }

    fn get(&self, key: &str) -> Option<V> {
        self.entries.get(key).cloned()
    }

    fn delete(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key)
    }
}
