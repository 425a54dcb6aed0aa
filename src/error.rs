//! Error types for the cache backends
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache operations.
///
/// A missing key is never an error: backends report it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Result values that cannot be written in the wire format
    #[error("Encoding error: {0}")]
    Encode(String),

    /// Malformed or mistyped wire text
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Wire text holds a different number of values than the signature
    #[error("Arity mismatch: expected {expected} values, found {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// Failure reported by an external key-value store
    #[error("Store error: {0}")]
    Store(String),

    /// Failure reported by the Redis client
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Decode(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
