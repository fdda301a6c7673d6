//! Configuration Module
//!
//! Cache settings. Nothing is read from the environment; a host application
//! that wants file-based settings can deserialize `CacheConfig` directly.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Cache configuration parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Default TTL in milliseconds applied by `set`; 0 disables expiry and the reaper
    pub default_ttl_ms: u64,
    /// Reaper period in milliseconds; `None` sweeps once per TTL
    pub cleanup_interval_ms: Option<u64>,
}

impl CacheConfig {
    /// Creates a config with no default TTL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default TTL. `Duration::ZERO` disables expiry.
    ///
    /// A positive TTL under a millisecond rounds up to 1 ms.
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl_ms = millis_rounded_up(ttl);
        self
    }

    /// Overrides the reaper period, rounded up to whole milliseconds.
    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval_ms = Some(millis_rounded_up(interval));
        self
    }

    /// Returns the default TTL, or `None` when entries never expire by default.
    pub fn ttl(&self) -> Option<Duration> {
        (self.default_ttl_ms > 0).then(|| Duration::from_millis(self.default_ttl_ms))
    }

    /// Returns the reaper period, or `None` when no reaper should run.
    pub fn sweep_interval(&self) -> Option<Duration> {
        let ttl = self.ttl()?;
        Some(
            self.cleanup_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(ttl),
        )
    }

    /// Checks the config for values the reaper cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.default_ttl_ms > 0 && self.cleanup_interval_ms == Some(0) {
            return Err(CacheError::InvalidConfig(
                "cleanup_interval_ms must be positive when a default TTL is set".to_string(),
            ));
        }
        Ok(())
    }
}

// Only zero maps to 0, so a positive duration never turns into "disabled"
fn millis_rounded_up(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos().div_ceil(1_000_000)).unwrap_or(u64::MAX)
}
