//! Policy Module
//!
//! Eviction strategies plugged into the generic cache. Each policy decides how
//! its order index reacts to inserts, hits and removals, and which key goes
//! when the cache is full.
//!
//! | Policy | Order index      | Score / position        | Victim            |
//! |--------|------------------|-------------------------|-------------------|
//! | FIFO   | list             | insertion order         | list head         |
//! | LRU    | scored set       | last access (seconds)   | lowest score      |
//! | LFU    | scored set       | access count, starts 1  | lowest score      |
//! | TTL    | none             | -                       | service expiry    |
//!
//! Equal scores pop in ascending lexicographic key order.

mod clock;
mod fifo;
mod lfu;
mod lru;
mod ttl;

use std::fmt::{self, Debug};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::backend::KvStore;
use crate::config::Config;
use crate::error::{CacheError, Result};

pub use clock::{Clock, ManualClock, SystemClock};
pub use fifo::FifoPolicy;
pub use lfu::LfuPolicy;
pub use lru::LruPolicy;
pub use ttl::TtlPolicy;

// == Policy Kind ==
/// The four supported eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Fifo,
    Lru,
    Lfu,
    Ttl,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PolicyKind::Fifo => "fifo",
            PolicyKind::Lru => "lru",
            PolicyKind::Lfu => "lfu",
            PolicyKind::Ttl => "ttl",
        };
        f.write_str(name)
    }
}

impl FromStr for PolicyKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" => Ok(PolicyKind::Fifo),
            "lru" => Ok(PolicyKind::Lru),
            "lfu" => Ok(PolicyKind::Lfu),
            "ttl" => Ok(PolicyKind::Ttl),
            other => Err(CacheError::Unsupported(format!(
                "unknown eviction policy '{}'",
                other
            ))),
        }
    }
}

// == Eviction Policy ==
/// Ordering rules of one eviction policy.
///
/// `index` is the physical key of the order index; `key` is the physical
/// key of an entry. Every method is a handful of single remote commands,
/// so none of them holds state between calls.
#[async_trait]
pub trait EvictionPolicy: Send + Sync + Debug {
    fn kind(&self) -> PolicyKind;

    /// Lifetime written with every entry. None keeps entries until evicted.
    fn entry_ttl(&self) -> Option<Duration> {
        None
    }

    /// Whether `Set` enforces the capacity bound.
    fn is_bounded(&self) -> bool {
        true
    }

    /// Starts tracking a newly filled key.
    async fn on_insert(&self, store: &dyn KvStore, index: &str, key: &str) -> Result<()>;

    /// Applies the side effect of a cache hit.
    async fn on_access(&self, store: &dyn KvStore, index: &str, key: &str) -> Result<()>;

    /// Applies the side effect of overwriting a key that is already cached.
    async fn on_refill(&self, store: &dyn KvStore, index: &str, key: &str) -> Result<()> {
        self.on_access(store, index, key).await
    }

    /// Removes and returns the key to evict, or None if nothing is tracked.
    async fn pick_victim(&self, store: &dyn KvStore, index: &str) -> Result<Option<String>>;

    /// Stops tracking a key. Untracked keys are not an error.
    async fn forget(&self, store: &dyn KvStore, index: &str, key: &str) -> Result<()>;

    /// Number of tracked keys.
    async fn size(&self, store: &dyn KvStore, index: &str) -> Result<usize>;
}

// == Construction ==
/// Builds the policy named in `config`, scoring LRU with `clock`.
pub fn from_config(config: &Config, clock: Arc<dyn Clock>) -> Box<dyn EvictionPolicy> {
    match config.policy {
        PolicyKind::Fifo => Box::new(FifoPolicy),
        PolicyKind::Lru => Box::new(LruPolicy::new(clock)),
        PolicyKind::Lfu => Box::new(LfuPolicy),
        PolicyKind::Ttl => Box::new(TtlPolicy::new(config.ttl())),
    }
}

/// Pops the lowest-scored member of a scored-set index.
async fn pop_lowest(store: &dyn KvStore, index: &str) -> Result<Option<String>> {
    let mut popped = store.pop_min(index, 1).await?;
    Ok(popped.pop().map(|(member, _)| member))
}
