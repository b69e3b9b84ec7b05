//! In-Memory Store Module
//!
//! Process-local implementation of the key/value service. Every primitive
//! runs under a single lock, which gives the same per-command atomicity a
//! remote service provides.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{KvStore, ScoredSet, StoredValue};
use crate::error::Result;

#[derive(Debug, Default)]
struct Inner {
    /// Plain values, with optional expiry
    values: HashMap<String, StoredValue>,
    /// Lists (FIFO order indexes)
    lists: HashMap<String, VecDeque<String>>,
    /// Scored sets (LRU and LFU order indexes)
    sets: HashMap<String, ScoredSet>,
}

impl Inner {
    /// Looks up a live value, dropping it first if it has expired.
    fn live_value(&mut self, key: &str) -> Option<&StoredValue> {
        if self.values.get(key).is_some_and(StoredValue::is_expired) {
            self.values.remove(key);
        }
        self.values.get(key)
    }
}

// == Memory Store ==
/// In-memory key/value service.
///
/// Expired values are dropped lazily on access and in bulk by
/// [`MemoryStore::purge_expired`], which the background sweep task calls.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Purge Expired ==
    /// Removes all expired values.
    ///
    /// Returns the number of values removed.
    pub fn purge_expired(&self) -> usize {
        let mut inner = self.inner.lock();
        let before = inner.values.len();
        inner.values.retain(|_, value| !value.is_expired());
        before - inner.values.len()
    }

    // == Live Keys ==
    /// Returns the live value keys starting with `prefix`, sorted.
    pub fn live_keys(&self, prefix: &str) -> Vec<String> {
        let inner = self.inner.lock();
        let mut keys: Vec<String> = inner
            .values
            .iter()
            .filter(|(key, value)| key.starts_with(prefix) && !value.is_expired())
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    // == Length ==
    /// Returns the number of stored values, expired or not.
    pub fn len(&self) -> usize {
        self.inner.lock().values.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut inner = self.inner.lock();
        Ok(inner.live_value(key).map(|value| value.bytes.clone()))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        self.inner
            .lock()
            .values
            .insert(key.to_string(), StoredValue::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.values.remove(key);
        inner.lists.remove(key);
        inner.sets.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut inner = self.inner.lock();
        Ok(inner.live_value(key).is_some()
            || inner.lists.contains_key(key)
            || inner.sets.contains_key(key))
    }

    async fn push_tail(&self, list: &str, value: &str) -> Result<()> {
        self.inner
            .lock()
            .lists
            .entry(list.to_string())
            .or_default()
            .push_back(value.to_string());
        Ok(())
    }

    async fn pop_head(&self, list: &str) -> Result<Option<String>> {
        let mut inner = self.inner.lock();
        let Some(queue) = inner.lists.get_mut(list) else {
            return Ok(None);
        };
        let head = queue.pop_front();
        if queue.is_empty() {
            inner.lists.remove(list);
        }
        Ok(head)
    }

    async fn list_len(&self, list: &str) -> Result<usize> {
        Ok(self.inner.lock().lists.get(list).map_or(0, VecDeque::len))
    }

    async fn list_remove(&self, list: &str, value: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        if let Some(queue) = inner.lists.get_mut(list) {
            queue.retain(|v| v != value);
            if queue.is_empty() {
                inner.lists.remove(list);
            }
        }
        Ok(())
    }

    async fn upsert_score(&self, set: &str, member: &str, score: f64) -> Result<()> {
        self.inner
            .lock()
            .sets
            .entry(set.to_string())
            .or_default()
            .upsert(member, score);
        Ok(())
    }

    async fn increment_score(&self, set: &str, member: &str, delta: f64) -> Result<f64> {
        Ok(self
            .inner
            .lock()
            .sets
            .entry(set.to_string())
            .or_default()
            .increment(member, delta))
    }

    async fn pop_min(&self, set: &str, count: usize) -> Result<Vec<(String, f64)>> {
        let mut inner = self.inner.lock();
        let Some(scored) = inner.sets.get_mut(set) else {
            return Ok(Vec::new());
        };
        let popped = scored.pop_min(count);
        if scored.is_empty() {
            inner.sets.remove(set);
        }
        Ok(popped)
    }

    async fn cardinality(&self, set: &str) -> Result<usize> {
        Ok(self.inner.lock().sets.get(set).map_or(0, ScoredSet::len))
    }

    async fn remove_member(&self, set: &str, member: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        if let Some(scored) = inner.sets.get_mut(set) {
            scored.remove(member);
            if scored.is_empty() {
                inner.sets.remove(set);
            }
        }
        Ok(())
    }

    async fn score(&self, set: &str, member: &str) -> Result<Option<f64>> {
        Ok(self
            .inner
            .lock()
            .sets
            .get(set)
            .and_then(|scored| scored.score(member)))
    }
}
