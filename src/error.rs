//! Error types for the eviction cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the eviction cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key absent, expired, or holding bytes that no longer decode
    #[error("Key not found: {0}")]
    NotFound(String),

    /// A call to the key/value service failed or timed out
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Eviction was attempted but the order index had nothing to give up
    #[error("Eviction failed: {0}")]
    EvictionFailed(String),

    /// A member popped from the order index did not decode to a key
    #[error("Corrupt index member: {0}")]
    CorruptIndex(String),

    /// The backing source could not produce the record
    #[error("Source failure: {0}")]
    SourceFailure(#[source] anyhow::Error),

    /// A record could not be encoded for storage
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The configured policy does not support the operation
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::StoreUnavailable(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the eviction cache.
pub type Result<T> = std::result::Result<T, CacheError>;
