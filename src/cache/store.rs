//! Cache Façade Module
//!
//! The request/fill/evict protocol shared by every policy. Ordering rules
//! live in the policy; this type only sequences the remote calls.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::backend::{KvStore, TimedStore};
use crate::cache::record::{self, Record};
use crate::cache::{CacheStats, KeySpace, StatsRecorder};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::policy::{self, Clock, EvictionPolicy, PolicyKind};
use crate::source::BackingSource;

// == Cache ==
/// Eviction cache in front of a backing source.
///
/// Only the namespace, capacity and policy configuration live in the
/// process; every entry and order token lives in the key/value service.
pub struct Cache<R: Record> {
    /// Key/value service, every call deadline-bounded
    store: TimedStore,
    /// Ordering rules
    policy: Box<dyn EvictionPolicy>,
    /// Authoritative data
    source: Arc<dyn BackingSource<R>>,
    /// Physical key naming
    keys: KeySpace,
    /// Maximum entries for bounded policies
    capacity: usize,
    /// Performance statistics
    stats: StatsRecorder,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Cache<R> {
    // == Constructor ==
    /// Creates a cache over `store` with the given policy.
    ///
    /// # Arguments
    /// * `store` - Key/value service holding entries and the order index
    /// * `policy` - Eviction policy
    /// * `source` - Backing source consulted on a miss
    /// * `namespace` - Prefix isolating this instance's keys
    /// * `capacity` - Maximum entries, clamped to at least 1
    /// * `timeout` - Deadline applied to every store call
    pub fn new(
        store: Arc<dyn KvStore>,
        policy: Box<dyn EvictionPolicy>,
        source: Arc<dyn BackingSource<R>>,
        namespace: &str,
        capacity: usize,
        timeout: Duration,
    ) -> Self {
        let capacity = capacity.max(1);
        info!(
            "Creating {} cache '{}' with capacity {}",
            policy.kind(),
            namespace,
            capacity
        );
        Self {
            store: TimedStore::new(store, timeout),
            policy,
            source,
            keys: KeySpace::new(namespace),
            capacity,
            stats: StatsRecorder::new(),
            _record: PhantomData,
        }
    }

    /// Creates a cache from configuration, scoring LRU with `clock`.
    pub fn from_config(
        config: &Config,
        store: Arc<dyn KvStore>,
        source: Arc<dyn BackingSource<R>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::new(
            store,
            policy::from_config(config, clock),
            source,
            &config.namespace,
            config.capacity,
            config.store_timeout(),
        )
    }

    // == Request ==
    /// Resolves `id`, from the cache if possible and from the source otherwise.
    ///
    /// Cache failures never reach the caller: a miss or an unreachable store
    /// falls through to the source, and a failed fill is logged and dropped.
    /// Only a source failure is returned.
    pub async fn request(&self, id: &str) -> Result<R> {
        match self.get(id).await {
            Ok(record) => {
                debug!(id, "Cache hit");
                return Ok(record);
            }
            Err(CacheError::NotFound(_)) => debug!(id, "Cache miss, fetching from source"),
            Err(err) => warn!(id, error = %err, "Cache lookup failed, fetching from source"),
        }

        let record = self
            .source
            .fetch(id)
            .await
            .map_err(CacheError::SourceFailure)?;
        self.stats.record_source_fetch();

        if let Err(err) = self.fill(id, &record).await {
            self.stats.record_fill_failure();
            warn!(id, error = %err, "Failed to write record to cache");
        }

        Ok(record)
    }

    // == Get ==
    /// Looks up `id` in the cache only, applying the policy's touch on a hit.
    ///
    /// Absent, expired and undecodable entries all fail with `NotFound`.
    pub async fn get(&self, id: &str) -> Result<R> {
        let key = self.entry_key(id);

        let Some(bytes) = self.store.get(&key).await? else {
            self.stats.record_miss();
            return Err(CacheError::NotFound(key));
        };

        let Some(record) = record::decode::<R>(&bytes) else {
            warn!(key = %key, "Stored entry does not decode, treating as absent");
            self.stats.record_miss();
            return Err(CacheError::NotFound(key));
        };

        self.policy
            .on_access(&self.store, &self.keys.index_key(), &key)
            .await?;
        self.stats.record_hit();
        Ok(record)
    }

    // == Set ==
    /// Upserts `record` under its own id.
    ///
    /// A new key at capacity evicts exactly one entry first. Overwriting a
    /// cached key never evicts. The first failing remote call is returned
    /// and nothing is rolled back.
    pub async fn set(&self, record: &R) -> Result<()> {
        self.fill(record.id(), record).await
    }

    /// Alias of [`Cache::set`].
    pub async fn put(&self, record: &R) -> Result<()> {
        self.set(record).await
    }

    // == Delete ==
    /// Removes `id` and its order token. Absent ids are not an error.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let key = self.entry_key(id);
        debug!(key = %key, "Deleting entry");
        self.policy
            .forget(&self.store, &self.keys.index_key(), &key)
            .await?;
        self.store.delete(&key).await
    }

    // == Size ==
    /// Number of tracked entries. Fails with `Unsupported` under TTL.
    pub async fn size(&self) -> Result<usize> {
        self.policy
            .size(&self.store, &self.keys.index_key())
            .await
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    // == Accessors ==
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn namespace(&self) -> &str {
        self.keys.namespace()
    }

    pub fn policy_kind(&self) -> PolicyKind {
        self.policy.kind()
    }

    /// Physical key of the entry for `id`.
    pub fn entry_key(&self, id: &str) -> String {
        self.keys.entry_key(R::KIND, id)
    }

    /// Physical key of the order index.
    pub fn index_key(&self) -> String {
        self.keys.index_key()
    }

    // == Fill ==
    async fn fill(&self, id: &str, record: &R) -> Result<()> {
        let key = self.entry_key(id);
        let bytes = record::encode(record)?;

        if self.policy.is_bounded() {
            let index = self.keys.index_key();
            if self.store.exists(&key).await? {
                debug!(key = %key, "Refilling cached entry");
                self.policy.on_refill(&self.store, &index, &key).await?;
            } else {
                let size = self.policy.size(&self.store, &index).await?;
                if size >= self.capacity {
                    info!(size, capacity = self.capacity, "Cache is full, evicting one entry");
                    self.evict_one(&index).await?;
                }
                self.policy.on_insert(&self.store, &index, &key).await?;
            }
        }

        debug!(key = %key, "Writing entry");
        self.store.set(&key, &bytes, self.policy.entry_ttl()).await
    }

    // == Evict ==
    async fn evict_one(&self, index: &str) -> Result<()> {
        let Some(victim) = self.policy.pick_victim(&self.store, index).await? else {
            warn!(index, "Eviction found an empty order index");
            return Err(CacheError::EvictionFailed(format!(
                "order index {} is empty",
                index
            )));
        };

        self.store.delete(&victim).await?;
        self.stats.record_eviction();
        info!(victim = %victim, "Evicted entry");
        Ok(())
    }
}
