//! Local Map Backend
//!
//! In-process cache table where each entry tracks its own expiry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::entry::deadline;
use crate::cache::{CacheBackend, CacheEntry, CacheValue, Signature};
use crate::error::Result;
use crate::tasks::{spawn_sweep_task, SweepHandle};

/// Table shared between a backend and its sweep task.
pub(crate) type SharedTable = Arc<RwLock<HashMap<String, CacheEntry>>>;

// == Local Map Backend ==
/// HashMap-backed cache guarded by a single table-owned lock.
///
/// Reads never prune stale entries; they stay in the table until the sweep
/// task, [`LocalMapBackend::purge_expired`] or a zero-TTL `expire` removes
/// them.
#[derive(Debug, Clone, Default)]
pub struct LocalMapBackend {
    table: SharedTable,
}

impl LocalMapBackend {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend whose table is pre-sized for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: Arc::new(RwLock::new(HashMap::with_capacity(capacity))),
        }
    }

    // == Inspection ==
    /// Returns true if the table holds `key`, live or stale.
    pub async fn contains_key(&self, key: &str) -> bool {
        self.table.read().await.contains_key(key)
    }

    /// Returns the number of entries in the table, stale ones included.
    pub async fn len(&self) -> usize {
        self.table.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.table.read().await.is_empty()
    }

    // == Purge Expired ==
    /// Removes all expired entries and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        purge_expired(&self.table).await
    }
}

#[async_trait]
impl CacheBackend for LocalMapBackend {
    async fn get(&self, key: &str, _signature: &Signature) -> Result<Option<Vec<CacheValue>>> {
        let table = self.table.read().await;
        match table.get(key) {
            Some(entry) if !entry.is_expired() => {
                debug!(key, "local cache hit");
                Ok(Some(entry.value.clone()))
            }
            _ => {
                debug!(key, "local cache miss");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: Vec<CacheValue>, ttl: Duration) -> Result<()> {
        let entry = CacheEntry::new(value, ttl);
        self.table.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<()> {
        let mut table = self.table.write().await;

        if ttl.is_zero() {
            if table.remove(key).is_some() {
                debug!(key, "local entry deleted");
            }
        } else if let Some(entry) = table.get_mut(key) {
            entry.expires_at = deadline(ttl);
            debug!(key, ?ttl, "local entry expiry reset");
        }

        Ok(())
    }

    fn periodic_expire(&self, interval: Duration) -> Option<SweepHandle> {
        Some(spawn_sweep_task(self.table.clone(), interval))
    }
}

/// Removes expired entries from `table` under one write lock.
pub(crate) async fn purge_expired(table: &RwLock<HashMap<String, CacheEntry>>) -> usize {
    let mut table = table.write().await;
    let before = table.len();
    table.retain(|_, entry| !entry.is_expired());
    before - table.len()
}
