//! LFU Policy
//!
//! The order index is a scored set whose score counts uses. A fill counts as
//! the first use; each hit adds one with a single atomic increment. Counts
//! never decay.

use async_trait::async_trait;

use super::{pop_lowest, EvictionPolicy, PolicyKind};
use crate::backend::KvStore;
use crate::error::Result;

/// Score given to a freshly filled key.
const INITIAL_FREQUENCY: f64 = 1.0;

/// Least frequently used.
#[derive(Debug, Default, Clone, Copy)]
pub struct LfuPolicy;

#[async_trait]
impl EvictionPolicy for LfuPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Lfu
    }

    async fn on_insert(&self, store: &dyn KvStore, index: &str, key: &str) -> Result<()> {
        store.upsert_score(index, key, INITIAL_FREQUENCY).await
    }

    async fn on_access(&self, store: &dyn KvStore, index: &str, key: &str) -> Result<()> {
        store.increment_score(index, key, 1.0).await.map(|_| ())
    }

    async fn pick_victim(&self, store: &dyn KvStore, index: &str) -> Result<Option<String>> {
        pop_lowest(store, index).await
    }

    async fn forget(&self, store: &dyn KvStore, index: &str, key: &str) -> Result<()> {
        store.remove_member(index, key).await
    }

    async fn size(&self, store: &dyn KvStore, index: &str) -> Result<usize> {
        store.cardinality(index).await
    }
}
