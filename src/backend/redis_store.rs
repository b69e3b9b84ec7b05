//! Redis Store Module
//!
//! Key/value service backed by Redis. Lists back the FIFO index, sorted sets
//! back the LRU and LFU indexes, and `PSETEX` gives per-key expiry for TTL.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::info;

use super::KvStore;
use crate::error::{CacheError, Result};

// == Redis Store ==
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    // == Constructor ==
    /// Connects to the Redis server at `url`.
    ///
    /// The connection manager reconnects on its own; callers bound each
    /// command with [`super::TimedStore`].
    pub async fn connect(url: &str) -> Result<Self> {
        let client = Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;
        info!("Connected to Redis at {}", url);
        Ok(Self { connection })
    }

    fn conn(&self) -> ConnectionManager {
        self.connection.clone()
    }
}

/// Decodes a list or set member into a key.
fn decode_member(raw: Vec<u8>) -> Result<String> {
    String::from_utf8(raw).map_err(|e| CacheError::CorruptIndex(e.to_string()))
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value: Option<Vec<u8>> = self.conn().get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.conn();
        match ttl {
            Some(ttl) => {
                // PSETEX rejects a zero lifetime
                let millis = (ttl.as_millis() as u64).max(1);
                conn.pset_ex::<_, _, ()>(key, value, millis).await?;
            }
            None => conn.set::<_, _, ()>(key, value).await?,
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.conn().del::<_, ()>(key).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let found: bool = self.conn().exists(key).await?;
        Ok(found)
    }

    async fn push_tail(&self, list: &str, value: &str) -> Result<()> {
        self.conn().rpush::<_, _, ()>(list, value).await?;
        Ok(())
    }

    async fn pop_head(&self, list: &str) -> Result<Option<String>> {
        let head: Option<Vec<u8>> = self.conn().lpop(list, None).await?;
        head.map(decode_member).transpose()
    }

    async fn list_len(&self, list: &str) -> Result<usize> {
        let len: usize = self.conn().llen(list).await?;
        Ok(len)
    }

    async fn list_remove(&self, list: &str, value: &str) -> Result<()> {
        self.conn().lrem::<_, _, ()>(list, 0, value).await?;
        Ok(())
    }

    async fn upsert_score(&self, set: &str, member: &str, score: f64) -> Result<()> {
        self.conn().zadd::<_, _, _, ()>(set, member, score).await?;
        Ok(())
    }

    async fn increment_score(&self, set: &str, member: &str, delta: f64) -> Result<f64> {
        let score: f64 = self.conn().zincr(set, member, delta).await?;
        Ok(score)
    }

    async fn pop_min(&self, set: &str, count: usize) -> Result<Vec<(String, f64)>> {
        let popped: Vec<(Vec<u8>, f64)> = self.conn().zpopmin(set, count as isize).await?;
        popped
            .into_iter()
            .map(|(member, score)| Ok((decode_member(member)?, score)))
            .collect()
    }

    async fn cardinality(&self, set: &str) -> Result<usize> {
        let len: usize = self.conn().zcard(set).await?;
        Ok(len)
    }

    async fn remove_member(&self, set: &str, member: &str) -> Result<()> {
        self.conn().zrem::<_, _, ()>(set, member).await?;
        Ok(())
    }

    async fn score(&self, set: &str, member: &str) -> Result<Option<f64>> {
        let score: Option<f64> = self.conn().zscore(set, member).await?;
        Ok(score)
    }
}
