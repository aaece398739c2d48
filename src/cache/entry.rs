//! Cache Entry Module
//!
//! Defines a cached response payload with its sliding expiration.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A cached response payload and the instant it becomes eligible for eviction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The cached response bytes, returned verbatim on a hit
    pub data: Vec<u8>,
    /// Expiration instant, always `last touch + ttl`
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` from now.
    pub fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    // == Touch ==
    /// Pushes the expiration back to `now + ttl`.
    pub fn touch(&mut self, ttl: Duration) {
        self.expires_at = Instant::now() + ttl;
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived its expiration.
    ///
    /// Strictly after: an entry whose expiration equals `now` is still live.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against an explicit instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now > self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}
