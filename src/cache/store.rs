//! External Store Module
//!
//! Contract for key-value services with native per-key TTL, and its Redis
//! implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::debug;

use crate::cache::entry::MAX_TTL;
use crate::error::Result;

// == Key Value Store ==
/// A key-value service that expires keys on its own.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns the stored text, or `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key` for `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()>;

    /// Updates the TTL of `key`. A zero TTL removes the key.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<()>;
}

// == Redis Store ==
/// [`KeyValueStore`] over a multiplexed Redis connection.
///
/// The connection is cheap to clone and safe to share between tasks.
#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
}

impl RedisStore {
    /// Opens a connection to the Redis server at `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        debug!(url, "connected to redis");
        Ok(Self { conn })
    }

    pub fn from_connection(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        debug!(key, found = value.is_some(), "redis GET");
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        let ttl_ms = ttl_millis(ttl);

        // Redis rejects a zero expiry on SET; a zero TTL means delete now.
        if ttl_ms == 0 {
            let _: () = conn.del(key).await?;
            debug!(key, "redis DEL for zero ttl");
        } else {
            let _: () = conn.pset_ex(key, value, ttl_ms).await?;
            debug!(key, ttl_ms, "redis PSETEX");
        }
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        let ttl_ms = ttl_millis(ttl);
        let _: bool = conn
            .pexpire(key, i64::try_from(ttl_ms).unwrap_or(i64::MAX))
            .await?;
        debug!(key, ttl_ms, "redis PEXPIRE");
        Ok(())
    }
}

/// TTL in whole milliseconds, rounding sub-millisecond TTLs down to zero and
/// clamping to the same far-future bound the local backend uses. Redis rejects
/// expiries whose deadline overflows its clock.
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.min(MAX_TTL).as_millis()).unwrap_or(u64::MAX)
}
