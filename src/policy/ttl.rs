//! TTL Policy
//!
//! Keeps no order index. Every entry is written with the same lifetime and
//! the key/value service drops it when that lifetime runs out. Reads do not
//! extend the lifetime, and there is no capacity bound.

use std::time::Duration;

use async_trait::async_trait;

use super::{EvictionPolicy, PolicyKind};
use crate::backend::KvStore;
use crate::error::{CacheError, Result};

/// Time-based expiry delegated to the store.
#[derive(Debug, Clone, Copy)]
pub struct TtlPolicy {
    ttl: Duration,
}

impl TtlPolicy {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Lifetime given to each entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[async_trait]
impl EvictionPolicy for TtlPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Ttl
    }

    fn entry_ttl(&self) -> Option<Duration> {
        Some(self.ttl)
    }

    fn is_bounded(&self) -> bool {
        false
    }

    async fn on_insert(&self, _store: &dyn KvStore, _index: &str, _key: &str) -> Result<()> {
        Ok(())
    }

    async fn on_access(&self, _store: &dyn KvStore, _index: &str, _key: &str) -> Result<()> {
        Ok(())
    }

    async fn pick_victim(&self, _store: &dyn KvStore, _index: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn forget(&self, _store: &dyn KvStore, _index: &str, _key: &str) -> Result<()> {
        Ok(())
    }

    /// Counting live entries would need a full namespace scan, so the TTL
    /// policy does not report a size.
    async fn size(&self, _store: &dyn KvStore, _index: &str) -> Result<usize> {
        Err(CacheError::Unsupported(
            "size is not tracked by the ttl policy".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStore;

    #[tokio::test]
    async fn test_size_is_unsupported() {
        let store = MemoryStore::new();
        let policy = TtlPolicy::new(Duration::from_secs(5));

        let result = policy.size(&store, "ns:cache_key").await;
        assert!(matches!(result, Err(CacheError::Unsupported(_))));
    }

    #[tokio::test]
    async fn test_keeps_no_index() {
        let store = MemoryStore::new();
        let policy = TtlPolicy::new(Duration::from_secs(5));

        policy.on_insert(&store, "ns:cache_key", "ns:user:1").await.unwrap();
        policy.on_access(&store, "ns:cache_key", "ns:user:1").await.unwrap();

        assert!(!store.exists("ns:cache_key").await.unwrap());
        assert_eq!(policy.pick_victim(&store, "ns:cache_key").await.unwrap(), None);
        assert_eq!(policy.ttl(), Duration::from_secs(5));
    }
}
