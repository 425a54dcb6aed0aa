//! Key Derivation Module
//!
//! Turns a function call into the string key its result is cached under.

use std::fmt::Write;

use crate::cache::CacheValue;

// == Derive Key ==
/// Concatenates the function name with the textual form of every argument,
/// in order and without separators.
///
/// The result is deterministic but not collision-free: `("1", "2")` and
/// `("12", "")` produce the same key for the same function. Callers that
/// need distinct keys for such arguments should supply their own
/// [`KeyDeriver`].
pub fn derive_key(function_name: &str, args: &[CacheValue]) -> String {
    let mut key = String::from(function_name);
    for arg in args {
        // Writing to a String cannot fail
        let _ = write!(key, "{}", arg);
    }
    key
}

// == Key Deriver ==
/// Strategy for mapping a call to a cache key.
pub trait KeyDeriver: Send + Sync {
    fn key(&self, function_name: &str, args: &[CacheValue]) -> String;
}

/// Default deriver, see [`derive_key`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcatKeyDeriver;

impl KeyDeriver for ConcatKeyDeriver {
    fn key(&self, function_name: &str, args: &[CacheValue]) -> String {
        derive_key(function_name, args)
    }
}
