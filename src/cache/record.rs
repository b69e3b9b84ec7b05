//! Record Module
//!
//! Values the cache holds, and their JSON encoding in the record store.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CacheError, Result};

// == Record ==
/// A value served by the backing source and cached by id.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Entity kind segment of the cache key, e.g. `user`.
    const KIND: &'static str;

    /// Identifier segment of the cache key.
    fn id(&self) -> &str;
}

/// Serializes a record for storage.
pub fn encode<R: Record>(record: &R) -> Result<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| CacheError::Serialization(e.to_string()))
}

/// Deserializes stored bytes. Corrupt payloads yield None.
pub fn decode<R: Record>(bytes: &[u8]) -> Option<R> {
    serde_json::from_slice(bytes).ok()
}
