//! Cache Entry Module
//!
//! Defines the structure for local cache entries with TTL support.

use std::time::{Duration, Instant};

use crate::cache::CacheValue;

/// Longest TTL any backend applies; longer TTLs are clamped to it.
pub(crate) const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// == Cache Entry ==
/// A cached result tuple and the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Result values of one function invocation
    pub value: Vec<CacheValue>,
    /// Instant after which the entry is invalid
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` from now.
    ///
    /// A zero TTL produces an entry that is already expired.
    pub fn new(value: Vec<CacheValue>, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: deadline(ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is live only while its expiration instant is strictly in the
    /// future, so it is expired at exactly `expires_at`.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

/// Returns `now + ttl`, with `ttl` clamped to [`MAX_TTL`].
pub fn deadline(ttl: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(ttl.min(MAX_TTL)).unwrap_or(now)
}
