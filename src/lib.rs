//! Simple Cache - in-process key/value caches
//!
//! Two families:
//! - [`MapCache`]: unsynchronized map, entries never expire.
//! - [`ConcurrentCache`]: thread-safe, optional default TTL, lazy expiry on
//!   read plus a background reaper that sweeps expired entries.
//!
//! [`AnyCache`] is the concurrent cache instantiated over type-erased values.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{
    AnyCache, AnyValue, CacheStats, ConcurrentCache, ExpiryCache, GenericCache, MapCache,
};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use tasks::Reaper;
