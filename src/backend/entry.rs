//! Stored Value Module
//!
//! Defines the byte payload kept by the in-memory store, with optional expiry.

use std::time::Duration;

use tokio::time::Instant;

// == Stored Value ==
/// A single value held by the in-memory store.
#[derive(Debug, Clone)]
pub struct StoredValue {
    /// Opaque payload
    pub bytes: Vec<u8>,
    /// Deadline after which the value is gone, None = no expiration
    pub expires_at: Option<Instant>,
}

impl StoredValue {
    // == Constructor ==
    /// Creates a new stored value with optional time-to-live.
    ///
    /// # Arguments
    /// * `bytes` - The payload to store
    /// * `ttl` - Optional lifetime measured from now
    pub fn new(bytes: Vec<u8>, ttl: Option<Duration>) -> Self {
        Self {
            bytes,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the value has expired.
    ///
    /// A value is expired once the current time is greater than or equal to
    /// its deadline, so a zero lifetime expires immediately.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if no expiration is set.
    ///
    /// Returns `Some(Duration::ZERO)` once the deadline has passed.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}
