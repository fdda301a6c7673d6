//! Concurrent Cache Module
//!
//! Thread-safe façade over a `CacheStore` and its optional `Reaper`.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::cache::{CacheStats, CacheStore, ExpiryCache, GenericCache};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::tasks::Reaper;

// == Concurrent Cache ==
/// Thread-safe cache with an optional default TTL.
///
/// With a positive TTL every `set` expires after it, and a background
/// reaper sweeps expired entries once per cleanup interval. Expired entries
/// read as absent whether or not the reaper has reached them yet.
///
/// Dropping the cache stops the reaper; `close` does the same explicitly
/// and may be called any number of times.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use simple_cache::ConcurrentCache;
///
/// let cache = ConcurrentCache::new(Duration::from_secs(60)).unwrap();
/// cache.set("user:1", "alice".to_string());
/// assert_eq!(cache.get("user:1").as_deref(), Some("alice"));
/// cache.close();
/// ```
#[derive(Debug)]
pub struct ConcurrentCache<V> {
    store: Arc<CacheStore<V>>,
    reaper: Option<Reaper>,
}

impl<V> ConcurrentCache<V>
where
    V: Send + Sync + 'static,
{
    // == Constructors ==
    /// Creates a cache whose entries expire `ttl` after being set.
    ///
    /// A zero TTL gives a cache that never expires entries on its own and
    /// runs no reaper; only `set_with_expiry` writes can expire.
    pub fn new(ttl: Duration) -> Result<Self> {
        let ttl = (!ttl.is_zero()).then_some(ttl);
        Self::build(ttl, ttl)
    }

    /// Creates a cache from a `CacheConfig`.
    pub fn from_config(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        Self::build(config.ttl(), config.sweep_interval())
    }

    fn build(ttl: Option<Duration>, sweep_interval: Option<Duration>) -> Result<Self> {
        let store = Arc::new(CacheStore::new(ttl));
        let reaper = sweep_interval
            .map(|interval| Reaper::spawn(&store, interval))
            .transpose()?;
        Ok(Self { store, reaper })
    }
}

impl<V> ConcurrentCache<V> {
    // == Set ==
    /// Stores a value under the cache's default TTL.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.store.set(key.into(), value);
    }

    /// Stores a value that expires `ttl` from now.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.store.set_with_ttl(key.into(), value, ttl);
    }

    /// Stores a value expiring at `expires_at` (Unix nanoseconds).
    ///
    /// If the deadline has already passed the write is dropped and any
    /// existing entry for the key is left as it was.
    pub fn set_with_expiry(&self, key: impl Into<String>, expires_at: i64, value: V) {
        self.store.set_with_expiry(key.into(), expires_at, value);
    }

    /// Stores a value expiring at a wall-clock deadline.
    pub fn set_with_deadline(&self, key: impl Into<String>, deadline: DateTime<Utc>, value: V) {
        let expires_at = deadline.timestamp_nanos_opt().unwrap_or(i64::MAX);
        self.set_with_expiry(key, expires_at, value);
    }

    // == Get ==
    /// Returns the value for `key` unless it is missing or expired.
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.store.get(key)
    }

    /// Returns true if `key` holds a live entry.
    pub fn contains(&self, key: &str) -> bool {
        self.store.contains(key)
    }

    /// Remaining lifetime of a live entry; None if absent or non-expiring.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        self.store.ttl_remaining(key)
    }

    // == Delete ==
    /// Removes `key` and returns its value unless it is missing or expired.
    pub fn delete(&self, key: &str) -> Option<V> {
        self.store.delete(key)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.store.clear();
    }

    /// Sweeps expired entries now, returning how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        self.store.cleanup_expired()
    }

    /// Number of entries held, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if no entries are held, expired or not.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns a snapshot of the hit/miss and sweep counters.
    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    /// TTL applied by `set`; None when entries never expire by default.
    pub fn default_ttl(&self) -> Option<Duration> {
        self.store.default_ttl()
    }

    /// Sweep period of the reaper; None when the cache runs no reaper.
    pub fn cleanup_interval(&self) -> Option<Duration> {
        self.reaper.as_ref().map(Reaper::interval)
    }

    /// Returns true while the background reaper is sweeping.
    pub fn is_reaper_running(&self) -> bool {
        self.reaper.as_ref().is_some_and(Reaper::is_running)
    }

    // == Close ==
    /// Stops the background reaper. Safe to call repeatedly.
    ///
    /// The cache stays usable afterwards; expired entries still read as
    /// absent but are only removed by `cleanup_expired`.
    pub fn close(&self) {
        if let Some(reaper) = &self.reaper {
            reaper.stop();
        }
    }

    pub(crate) fn store(&self) -> &CacheStore<V> {
        &self.store
    }
}

impl<V: Clone> GenericCache<V> for ConcurrentCache<V> {
    fn set(&mut self, key: String, value: V) {
        ConcurrentCache::set(self, key, value);
    }

    fn get(&self, key: &str) -> Option<V> {
        ConcurrentCache::get(self, key)
    }

    fn delete(&mut self, key: &str) -> Option<V> {
        ConcurrentCache::delete(self, key)
    }
}

impl<V: Clone> ExpiryCache<V> for ConcurrentCache<V> {
    fn set_with_expiry(&mut self, key: String, expires_at: i64, value: V) {
        ConcurrentCache::set_with_expiry(self, key, expires_at, value);
    }
}
