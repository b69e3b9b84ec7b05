//! Cache Module
//!
//! The generic request/fill/evict façade, key naming, record encoding and
//! statistics.

mod key;
mod record;
mod stats;
mod store;


// Re-export public types
pub use key::{KeySpace, INDEX_SEGMENT, SEPARATOR};
pub use record::{decode, encode, Record};
pub use stats::{CacheStats, StatsRecorder};
pub use store::Cache;
