//! Policy Cache - pluggable eviction in front of a slow backing source
//!
//! One generic cache implements the request/fill/evict protocol; FIFO, LRU,
//! LFU and TTL plug in as eviction policies. Entries and order indexes live
//! in a key/value service (Redis, or the in-memory store).

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod policy;
pub mod source;
pub mod tasks;

pub use backend::{KvStore, MemoryStore, RedisStore, TimedStore};
pub use cache::{Cache, CacheStats, KeySpace, Record};
pub use config::Config;
pub use error::{CacheError, Result};
pub use policy::{
    Clock, EvictionPolicy, FifoPolicy, LfuPolicy, LruPolicy, ManualClock, PolicyKind,
    SystemClock, TtlPolicy,
};
pub use source::{BackingSource, MemorySource};
pub use tasks::spawn_purge_task;
