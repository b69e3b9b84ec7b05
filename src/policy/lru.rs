//! LRU Policy
//!
//! The order index is a scored set whose score is the last access time in
//! seconds. Fills and hits both stamp the current time; eviction pops the
//! lowest score.

use std::sync::Arc;

use async_trait::async_trait;

use super::{pop_lowest, Clock, EvictionPolicy, PolicyKind};
use crate::backend::KvStore;
use crate::error::Result;

/// Least recently used.
#[derive(Debug, Clone)]
pub struct LruPolicy {
    clock: Arc<dyn Clock>,
}

impl LruPolicy {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    async fn stamp(&self, store: &dyn KvStore, index: &str, key: &str) -> Result<()> {
        store
            .upsert_score(index, key, self.clock.now() as f64)
            .await
    }
}

#[async_trait]
impl EvictionPolicy for LruPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Lru
    }

    async fn on_insert(&self, store: &dyn KvStore, index: &str, key: &str) -> Result<()> {
        self.stamp(store, index, key).await
    }

    async fn on_access(&self, store: &dyn KvStore, index: &str, key: &str) -> Result<()> {
        self.stamp(store, index, key).await
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
