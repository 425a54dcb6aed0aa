//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::error::CacheError;

// == Backend Kind ==
/// Which cache backend to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// In-process map with a sweep task
    #[default]
    Map,
    /// Redis, expiring keys natively
    Redis,
}

impl FromStr for BackendKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "map" | "local" => Ok(BackendKind::Map),
            "redis" => Ok(BackendKind::Redis),
            other => Err(CacheError::Config(format!("unknown cache backend '{}'", other))),
        }
    }
}

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend to use
    pub backend: BackendKind,
    /// Redis connection URL, used by the redis backend
    pub redis_url: String,
    /// TTL in milliseconds for results stored without an explicit TTL
    pub default_ttl_ms: u64,
    /// Sweep task interval in milliseconds
    pub sweep_interval_ms: u64,
    /// Initial capacity of the local table, 0 for no hint
    pub initial_capacity: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - `map` or `redis` (default: map)
    /// - `REDIS_URL` - Redis URL (default: redis://127.0.0.1:6379)
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `SWEEP_INTERVAL_MS` - Sweep frequency in milliseconds (default: 1000)
    /// - `INITIAL_CAPACITY` - Local table capacity hint (default: 0)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let backend = match env::var("CACHE_BACKEND") {
            Ok(v) => v.parse().unwrap_or_else(|err| {
                warn!("{}, falling back to map", err);
                BackendKind::Map
            }),
            Err(_) => defaults.backend,
        };

        Self {
            backend,
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            default_ttl_ms: parse_var("DEFAULT_TTL_MS").unwrap_or(defaults.default_ttl_ms),
            sweep_interval_ms: parse_var("SWEEP_INTERVAL_MS")
                .unwrap_or(defaults.sweep_interval_ms),
            initial_capacity: parse_var("INITIAL_CAPACITY").unwrap_or(defaults.initial_capacity),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::Map,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            default_ttl_ms: 300_000,
            sweep_interval_ms: 1000,
            initial_capacity: 0,
        }
    }
}
