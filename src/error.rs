//! Error types for the cache
//!
//! Lookups never fail: a missing or expired key is `None`. Errors only come
//! out of constructors, when the configuration is rejected or the background
//! reaper cannot be started.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Configuration rejected by `CacheConfig::validate`
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The reaper's runtime could not be built
    #[error("Reaper runtime error: {0}")]
    Runtime(#[source] std::io::Error),

    /// The reaper thread could not be spawned
    #[error("Reaper spawn failed: {0}")]
    ReaperSpawn(#[source] std::io::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
