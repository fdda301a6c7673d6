//! Cache Module
//!
//! Provides the in-memory caches and the capability traits they share.
//!
//! `GenericCache` covers set/get/delete. `ExpiryCache` extends it with
//! absolute-deadline writes and is only implemented by the concurrent cache.

mod any;
mod concurrent;
mod entry;
mod map;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use any::{AnyCache, AnyValue};
pub use concurrent::ConcurrentCache;
pub use entry::{current_timestamp_nanos, CacheEntry};
pub use map::MapCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Capability Traits ==
/// Basic key/value cache operations.
///
/// Absence is `None`, never an error; this covers both missing and expired
/// keys.
pub trait GenericCache<V> {
    /// Inserts or overwrites the value for `key`.
    fn set(&mut self, key: String, value: V);

    /// Returns the value for `key`, if present.
    fn get(&self, key: &str) -> Option<V>;

    /// Removes `key` and returns the value it held, if present.
    fn delete(&mut self, key: &str) -> Option<V>;
}

/// A cache that also accepts per-key absolute expiry.
pub trait ExpiryCache<V>: GenericCache<V> {
    /// Stores `value` until `expires_at` (Unix nanoseconds).
    ///
    /// A deadline already in the past is a silent no-op.
    fn set_with_expiry(&mut self, key: String, expires_at: i64, value: V);
}
