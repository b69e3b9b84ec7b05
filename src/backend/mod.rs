//! Backend Module
//!
//! The key/value, list and ordered-set capabilities the cache needs from its
//! remote service, plus an in-memory store, a Redis store and a timeout
//! decorator.

mod entry;
mod memory;
mod redis_store;
mod scored_set;
mod timed;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

pub use redis_store::RedisStore;
pub use entry::StoredValue;
pub use memory::MemoryStore;
pub use scored_set::ScoredSet;
pub use timed::TimedStore;

// == Key/Value Service ==
/// Primitives of the remote key/value and ordered-set service.
///
/// Each call must be atomic on the service side; the cache holds no lock of
/// its own across calls.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the bytes stored under `key`, or None if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Removes `key` whatever it holds. Absent keys are not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Returns true if `key` holds a live value.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Appends `value` to the tail of a list.
    async fn push_tail(&self, list: &str, value: &str) -> Result<()>;

    /// Removes and returns the head of a list.
    async fn pop_head(&self, list: &str) -> Result<Option<String>>;

    /// Returns the length of a list (zero if absent).
    async fn list_len(&self, list: &str) -> Result<usize>;

    /// Removes every occurrence of `value` from a list.
    async fn list_remove(&self, list: &str, value: &str) -> Result<()>;

    /// Sets a member's score, inserting it if absent.
    async fn upsert_score(&self, set: &str, member: &str, score: f64) -> Result<()>;

    /// Adds `delta` to a member's score and returns the new score.
    async fn increment_score(&self, set: &str, member: &str, delta: f64) -> Result<f64>;

    /// Removes and returns up to `count` lowest-scored members.
    async fn pop_min(&self, set: &str, count: usize) -> Result<Vec<(String, f64)>>;

    /// Returns the number of members in a set (zero if absent).
    async fn cardinality(&self, set: &str) -> Result<usize>;

    /// Removes a member from a set.
    async fn remove_member(&self, set: &str, member: &str) -> Result<()>;

    /// Returns a member's score, if present.
    async fn score(&self, set: &str, member: &str) -> Result<Option<f64>>;
}
