//! Backend Contract
//!
//! The capability every cache storage strategy exposes to callers.

use std::time::Duration;

use async_trait::async_trait;

use crate::cache::{codec, CacheValue, Signature};
use crate::error::Result;
use crate::tasks::SweepHandle;

// Backends are the pluggable storage strategies behind the memoization layer
#[async_trait]
pub trait CacheBackend: Send + Sync + 'static {
    /// Looks up a live entry. A miss is `Ok(None)`, never an error.
    ///
    /// `signature` is the expected return signature, used by backends that
    /// must rebuild typed values from stored text.
    async fn get(&self, key: &str, signature: &Signature) -> Result<Option<Vec<CacheValue>>>;

    /// Stores `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, value: Vec<CacheValue>, ttl: Duration) -> Result<()>;

    /// Resets the TTL of an existing entry. A zero TTL deletes it; an absent
    /// key is left alone.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<()>;

    /// Starts background removal of expired entries every `interval`.
    ///
    /// Returns `None` when the backend needs no sweeping.
    fn periodic_expire(&self, interval: Duration) -> Option<SweepHandle>;

    fn serialize(&self, value: &[CacheValue]) -> Result<String> {
        codec::serialize(value)
    }

    fn deserialize(&self, text: &str, signature: &Signature) -> Result<Vec<CacheValue>> {
        codec::deserialize(text, signature)
    }
}
