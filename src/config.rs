//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::policy::PolicyKind;

/// Cache instance configuration.
///
/// All values can be configured via environment variables with sensible defaults.
/// Nothing here changes once a cache has been built from it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix isolating this cache instance's keys
    pub namespace: String,
    /// Eviction policy
    pub policy: PolicyKind,
    /// Maximum number of entries for bounded policies
    pub capacity: usize,
    /// Entry lifetime in seconds for the TTL policy
    pub ttl_secs: u64,
    /// Upper bound on every remote call, in milliseconds
    pub store_timeout_ms: u64,
    /// Connection string of the key/value service
    pub redis_url: String,
    /// Expiry sweep interval for the in-memory store, in seconds
    pub purge_interval_secs: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_NAMESPACE` - Key prefix (default: cache)
    /// - `CACHE_POLICY` - fifo, lru, lfu or ttl (default: lru)
    /// - `CACHE_CAPACITY` - Maximum entries (default: 3)
    /// - `CACHE_TTL_SECS` - Entry lifetime for ttl (default: 60)
    /// - `CACHE_STORE_TIMEOUT_MS` - Remote call deadline (default: 500)
    /// - `CACHE_REDIS_URL` - Key/value service URL (default: redis://127.0.0.1:6379/0)
    /// - `CACHE_PURGE_INTERVAL_SECS` - Sweep frequency (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            namespace: env::var("CACHE_NAMESPACE")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.namespace),
            policy: env::var("CACHE_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.policy),
            capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(|c: usize| c.max(1))
                .unwrap_or(defaults.capacity),
            ttl_secs: env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.ttl_secs),
            store_timeout_ms: env::var("CACHE_STORE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.store_timeout_ms),
            redis_url: env::var("CACHE_REDIS_URL")
                .ok()
                .unwrap_or(defaults.redis_url),
            purge_interval_secs: env::var("CACHE_PURGE_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.purge_interval_secs),
        }
    }

    /// Entry lifetime as a Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Remote call deadline as a Duration.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: "cache".to_string(),
            policy: PolicyKind::Lru,
            capacity: 3,
            ttl_secs: 60,
            store_timeout_ms: 500,
            redis_url: "redis://127.0.0.1:6379/0".to_string(),
            purge_interval_secs: 1,
        }
    }
}
