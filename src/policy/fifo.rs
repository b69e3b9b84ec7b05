//! FIFO Policy
//!
//! The order index is a list: fills append to the tail, eviction pops the
//! head. Hits never reorder it.

use async_trait::async_trait;

use super::{EvictionPolicy, PolicyKind};
use crate::backend::KvStore;
use crate::error::Result;

/// First in, first out.
#[derive(Debug, Default, Clone, Copy)]
pub struct FifoPolicy;

#[async_trait]
impl EvictionPolicy for FifoPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Fifo
    }

    // A token left behind by a failed fill is dropped before the push, so
    // each key holds at most one slot in the list.
    async fn on_insert(&self, store: &dyn KvStore, index: &str, key: &str) -> Result<()> {
        store.list_remove(index, key).await?;
        store.push_tail(index, key).await
    }

    async fn on_access(&self, _store: &dyn KvStore, _index: &str, _key: &str) -> Result<()> {
        Ok(())
    }

    // A refill keeps the original insertion position.
    async fn on_refill(&self, _store: &dyn KvStore, _index: &str, _key: &str) -> Result<()> {
        Ok(())
    }

    async fn pick_victim(&self, store: &dyn KvStore, index: &str) -> Result<Option<String>> {
        store.pop_head(index).await
    }

    async fn forget(&self, store: &dyn KvStore, index: &str, key: &str) -> Result<()> {
        store.list_remove(index, key).await
    }

    async fn size(&self, store: &dyn KvStore, index: &str) -> Result<usize> {
        store.list_len(index).await
    }
}
