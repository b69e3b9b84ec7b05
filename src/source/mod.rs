//! Backing Source Module
//!
//! The authoritative, slower system the cache consults on a miss.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::anyhow;
use async_trait::async_trait;
use tracing::debug;

use crate::cache::Record;

// == Backing Source ==
/// Authoritative provider of records.
///
/// Errors are opaque to the cache and reach the caller of
/// `Cache::request` unchanged, wrapped in `CacheError::SourceFailure`.
#[async_trait]
pub trait BackingSource<R: Record>: Send + Sync {
    async fn fetch(&self, id: &str) -> anyhow::Result<R>;
}

// == Memory Source ==
/// Fixed in-memory table of records, keyed by id.
#[derive(Debug)]
pub struct MemorySource<R: Record> {
    table: HashMap<String, R>,
    fetches: AtomicU64,
}

impl<R: Record> MemorySource<R> {
    /// Builds a table from records, keyed by their ids.
    pub fn from_records(records: impl IntoIterator<Item = R>) -> Self {
        let table = records
            .into_iter()
            .map(|record| (record.id().to_string(), record))
            .collect();
        Self {
            table,
            fetches: AtomicU64::new(0),
        }
    }

    /// Number of fetches served so far, successful or not.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[async_trait]
impl<R: Record> BackingSource<R> for MemorySource<R> {
    async fn fetch(&self, id: &str) -> anyhow::Result<R> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        debug!(id, kind = R::KIND, "Fetching record from source");
        self.table
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("no {} with id {}", R::KIND, id))
    }
}
