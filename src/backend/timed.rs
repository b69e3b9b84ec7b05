//! Bounded-time wrapper around any key/value service.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::KvStore;
use crate::error::{CacheError, Result};

// == Timed Store ==
/// Applies a deadline to every call on the wrapped store.
///
/// A call that does not finish in time fails with
/// [`CacheError::StoreUnavailable`]; the in-flight future is dropped.
#[derive(Clone)]
pub struct TimedStore {
    inner: Arc<dyn KvStore>,
    timeout: Duration,
}

impl TimedStore {
    pub fn new(inner: Arc<dyn KvStore>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T, F>(&self, op: &'static str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(op, timeout_ms = self.timeout.as_millis() as u64, "Store call timed out");
                Err(CacheError::StoreUnavailable(format!(
                    "{} timed out after {:?}",
                    op, self.timeout
                )))
            }
        }
    }
}

#[async_trait]
impl KvStore for TimedStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.bounded("get", self.inner.get(key)).await
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        self.bounded("set", self.inner.set(key, value, ttl)).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.bounded("delete", self.inner.delete(key)).await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.bounded("exists", self.inner.exists(key)).await
    }

    async fn push_tail(&self, list: &str, value: &str) -> Result<()> {
        self.bounded("push_tail", self.inner.push_tail(list, value))
            .await
    }

    async fn pop_head(&self, list: &str) -> Result<Option<String>> {
        self.bounded("pop_head", self.inner.pop_head(list)).await
    }

    async fn list_len(&self, list: &str) -> Result<usize> {
        self.bounded("list_len", self.inner.list_len(list)).await
    }

    async fn list_remove(&self, list: &str, value: &str) -> Result<()> {
        self.bounded("list_remove", self.inner.list_remove(list, value))
            .await
    }

    async fn upsert_score(&self, set: &str, member: &str, score: f64) -> Result<()> {
        self.bounded("upsert_score", self.inner.upsert_score(set, member, score))
            .await
    }

    async fn increment_score(&self, set: &str, member: &str, delta: f64) -> Result<f64> {
        self.bounded(
            "increment_score",
            self.inner.increment_score(set, member, delta),
        )
        .await
    }

    async fn pop_min(&self, set: &str, count: usize) -> Result<Vec<(String, f64)>> {
        self.bounded("pop_min", self.inner.pop_min(set, count)).await
    }

    async fn cardinality(&self, set: &str) -> Result<usize> {
        self.bounded("cardinality", self.inner.cardinality(set)).await
    }

    async fn remove_member(&self, set: &str, member: &str) -> Result<()> {
        self.bounded("remove_member", self.inner.remove_member(set, member))
            .await
    }

    async fn score(&self, set: &str, member: &str) -> Result<Option<f64>> {
        self.bounded("score", self.inner.score(set, member)).await
    }
}
