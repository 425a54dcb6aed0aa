//! Encache - A backend-pluggable function-result cache
//!
//! Stores the results of function calls under a key derived from the
//! function name and its arguments, with TTL expiry handled either in
//! process or by a remote key-value store.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{
    derive_key, CacheBackend, CacheValue, LocalMapBackend, RedisStore, RemoteStoreBackend,
    Signature, ValueKind,
};
pub use config::{BackendKind, Config};
pub use error::{CacheError, Result};
pub use tasks::SweepHandle;
