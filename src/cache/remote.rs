//! Remote Store Backend
//!
//! Adapter that keeps results in an external key-value store as JSON text
//! and leaves expiry to the store.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::cache::{CacheBackend, CacheValue, KeyValueStore, Signature};
use crate::error::Result;
use crate::tasks::SweepHandle;

// == Remote Store Backend ==
/// Backend that serializes results into a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct RemoteStoreBackend<S> {
    store: S,
}

impl<S: KeyValueStore> RemoteStoreBackend<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<S: KeyValueStore> CacheBackend for RemoteStoreBackend<S> {
    async fn get(&self, key: &str, signature: &Signature) -> Result<Option<Vec<CacheValue>>> {
        let Some(text) = self.store.get(key).await? else {
            debug!(key, "remote cache miss");
            return Ok(None);
        };

        let value = self.deserialize(&text, signature)?;
        debug!(key, "remote cache hit");
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: Vec<CacheValue>, ttl: Duration) -> Result<()> {
        let text = self.serialize(&value)?;
        self.store.set(key, text, ttl).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<()> {
        self.store.expire(key, ttl).await
    }

    // The store expires keys itself
    fn periodic_expire(&self, _interval: Duration) -> Option<SweepHandle> {
        None
    }
}
