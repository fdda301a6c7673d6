//! Any-value cache
//!
//! `AnyCache` stores values of mixed types behind `Arc<dyn Any>`. The typed
//! accessors follow one rule: a value of a different type reads as absent,
//! exactly like a missing key. No type error is ever raised.

use std::any::Any;
use std::sync::Arc;

use crate::cache::ConcurrentCache;

/// A type-erased, shareable cache value.
pub type AnyValue = Arc<dyn Any + Send + Sync>;

/// Concurrent cache holding values of any type.
pub type AnyCache = ConcurrentCache<AnyValue>;

impl ConcurrentCache<AnyValue> {
    /// Stores a value of any type under the default TTL.
    pub fn set_value<T>(&self, key: impl Into<String>, value: T)
    where
        T: Any + Send + Sync,
    {
        self.set(key, Arc::new(value));
    }

    /// Stores a value of any type until `expires_at` (Unix nanoseconds).
    pub fn set_value_with_expiry<T>(&self, key: impl Into<String>, expires_at: i64, value: T)
    where
        T: Any + Send + Sync,
    {
        self.set_with_expiry(key, expires_at, Arc::new(value));
    }

    /// Returns the value if it is live and of type `T`.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: Any + Clone,
    {
        self.store()
            .get_with(key, |value| (**value).downcast_ref::<T>().cloned())
    }

    /// Removes and returns the value if it is live and of type `T`.
    ///
    /// A value of another type stays in place.
    pub fn delete_as<T>(&self, key: &str) -> Option<T>
    where
        T: Any + Clone,
    {
        self.store()
            .delete_if(key, |value| (**value).is::<T>())
            .and_then(|value| (*value).downcast_ref::<T>().cloned())
    }
}
