//! Cache Module
//!
//! Function-result caching: key derivation, the result codec, and the
//! pluggable backends that store results with a TTL.

mod backend;
pub mod codec;
mod entry;
mod key;
pub(crate) mod local;
mod remote;
mod store;
mod value;


// Re-export public types
pub use backend::CacheBackend;
pub use entry::CacheEntry;
pub use key::{derive_key, ConcatKeyDeriver, KeyDeriver};
pub use local::LocalMapBackend;
pub use remote::RemoteStoreBackend;
pub use store::{KeyValueStore, RedisStore};
pub use value::{CacheValue, Signature, ValueKind};
