//! Cache Store Module
//!
//! Main cache engine: a HashMap of entries behind a reader/writer lock, with
//! lazy expiry on reads and a full sweep for the reaper.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tracing::debug;

use crate::cache::entry::current_timestamp_nanos;
use crate::cache::stats::StatsRecorder;
use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Thread-safe entry storage with TTL support.
///
/// All methods take `&self`; the lock is internal. Reads share the lock,
/// writes and sweeps hold it exclusively.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    /// TTL applied by `set`, None = entries never expire
    default_ttl: Option<Duration>,
    /// Performance statistics
    stats: StatsRecorder,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL applied by `set`; `None` or zero means no expiry
    pub fn new(default_ttl: Option<Duration>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl: default_ttl.filter(|ttl| !ttl.is_zero()),
            stats: StatsRecorder::default(),
        }
    }

    /// Returns the TTL applied by `set`.
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    // == Set ==
    /// Stores a value, overwriting any previous entry for the key.
    ///
    /// The entry expires after the default TTL, or never if there is none.
    pub fn set(&self, key: String, value: V) {
        let entry = match self.default_ttl {
            Some(ttl) => CacheEntry::with_ttl(value, ttl),
            None => CacheEntry::new(value),
        };
        self.insert(key, entry);
    }

    /// Stores a value that expires `ttl` from now, ignoring the default TTL.
    pub fn set_with_ttl(&self, key: String, value: V, ttl: Duration) {
        self.insert(key, CacheEntry::with_ttl(value, ttl));
    }

    // == Set With Expiry ==
    /// Stores a value expiring at an absolute Unix nanosecond timestamp.
    ///
    /// A deadline already in the past drops the write silently. Returns
    /// whether the entry was stored.
    pub fn set_with_expiry(&self, key: String, expires_at: i64, value: V) -> bool {
        if expires_at < current_timestamp_nanos() {
            debug!(key = %key, expires_at, "Dropping write with past expiry");
            self.stats.record_dropped_write();
            return false;
        }
        self.insert(key, CacheEntry::with_expiry(value, expires_at));
        true
    }

    fn insert(&self, key: String, entry: CacheEntry<V>) {
        self.write().insert(key, entry);
    }

    // == Get ==
    /// Looks up a live entry and maps its value.
    ///
    /// An expired entry reads as absent but stays in the map until a sweep.
    /// A `None` from `f` is also counted as a miss.
    pub fn get_with<R>(&self, key: &str, f: impl FnOnce(&V) -> Option<R>) -> Option<R> {
        let now = current_timestamp_nanos();
        let found = {
            let entries = self.read();
            entries
                .get(key)
                .filter(|entry| !entry.is_expired_at(now))
                .and_then(|entry| f(&entry.value))
        };

        match found {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        found
    }

    /// Returns a clone of the value if the key is present and not expired.
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.get_with(key, |value| Some(value.clone()))
    }

    /// Returns true if the key is present and not expired.
    ///
    /// Does not touch the hit/miss counters.
    pub fn contains(&self, key: &str) -> bool {
        let now = current_timestamp_nanos();
        self.read()
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    /// Returns the remaining TTL of a live, expiring entry.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let now = current_timestamp_nanos();
        self.read()
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .and_then(CacheEntry::ttl_remaining)
    }

    // == Delete ==
    /// Removes a live entry and returns its value.
    ///
    /// Missing or expired keys return None and leave the map untouched.
    pub fn delete(&self, key: &str) -> Option<V> {
        self.delete_if(key, |_| true)
    }

    /// Removes a live entry only if `accept` returns true for its value.
    ///
    /// The check and the removal happen under one write lock, so a
    /// concurrent overwrite cannot slip between them.
    pub fn delete_if(&self, key: &str, accept: impl FnOnce(&V) -> bool) -> Option<V> {
        let now = current_timestamp_nanos();
        let mut entries = self.write();
        let live = entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now) && accept(&entry.value));
        if !live {
            return None;
        }
        entries.remove(key).map(|entry| entry.value)
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        let removed = {
            let mut entries = self.write();
            let now = current_timestamp_nanos();
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired_at(now));
            before - entries.len()
        };
        self.stats.record_sweep(removed);
        removed
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.write().clear();
    }

    // == Length ==
    /// Returns the number of entries physically held, expired ones included.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len())
    }

    // Entries are replaced whole under the write lock, so a panic elsewhere
    // can't leave a half-written map behind; a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new(None)
    }
}
