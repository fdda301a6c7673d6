//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.
//! Timestamps are absolute Unix nanoseconds.

use std::time::Duration;

use chrono::Utc;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (Unix nanoseconds)
    pub created_at: i64,
    /// Expiration timestamp (Unix nanoseconds), None = no expiration
    pub expires_at: Option<i64>,
}

impl<V> CacheEntry<V> {
    // == Constructors ==
    /// Creates an entry that never expires.
    pub fn new(value: V) -> Self {
        Self {
            value,
            created_at: current_timestamp_nanos(),
            expires_at: None,
        }
    }

    /// Creates an entry expiring `ttl` from now.
    pub fn with_ttl(value: V, ttl: Duration) -> Self {
        let now = current_timestamp_nanos();
        Self {
            value,
            created_at: now,
            expires_at: Some(deadline_after(now, ttl)),
        }
    }

    /// Creates an entry expiring at an absolute Unix nanosecond timestamp.
    pub fn with_expiry(value: V, expires_at: i64) -> Self {
        Self {
            value,
            created_at: current_timestamp_nanos(),
            expires_at: Some(expires_at),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_nanos())
    }

    /// Checks expiry against a given timestamp.
    ///
    /// An entry is expired once `now` is strictly past `expires_at`. Both the
    /// read path and the reaper go through here, so they always agree.
    pub fn is_expired_at(&self, now: i64) -> bool {
        match self.expires_at {
            Some(expires) => expires < now,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining TTL, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the entry has expired
    /// - `Some(remaining)` if the entry has TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at.map(|expires| {
            let now = current_timestamp_nanos();
            if expires > now {
                Duration::from_nanos((expires - now) as u64)
            } else {
                Duration::ZERO
            }
        })
    }
}

// == Utility Functions ==
/// Returns the current Unix timestamp in nanoseconds.
///
/// Saturates at `i64::MAX` past the year 2262, where chrono can no longer
/// represent the value.
pub fn current_timestamp_nanos() -> i64 {
    Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}

/// Adds `ttl` to a nanosecond timestamp, saturating on overflow.
pub fn deadline_after(now: i64, ttl: Duration) -> i64 {
    let ttl = i64::try_from(ttl.as_nanos()).unwrap_or(i64::MAX);
    now.saturating_add(ttl)
}
