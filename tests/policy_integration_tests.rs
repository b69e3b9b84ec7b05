//! Integration Tests for the Eviction Policies
//!
//! Drives each policy through the public cache API against the in-memory
//! store, plus a Redis-backed run that needs a live server.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use policy_cache::{
    BackingSource, Cache, CacheError, Config, EvictionPolicy, FifoPolicy, KvStore, LfuPolicy,
    LruPolicy, ManualClock, MemorySource, MemoryStore, PolicyKind, Record, RedisStore,
    SystemClock, TtlPolicy,
};
use serde::{Deserialize, Serialize};

// == Helper Types ==

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct User {
    id: String,
    name: String,
    age: u32,
}

impl Record for User {
    const KIND: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }
}

fn users() -> Vec<User> {
    [("A", "Alice", 30), ("B", "Bob", 25), ("C", "Charlie", 35), ("D", "Dora", 41)]
        .into_iter()
        .map(|(id, name, age)| User {
            id: id.to_string(),
            name: name.to_string(),
            age,
        })
        .collect()
}

fn user(id: &str) -> User {
    users()
        .into_iter()
        .find(|u| u.id == id)
        .expect("fixture user")
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct TestCache {
    cache: Cache<User>,
    store: Arc<MemoryStore>,
    source: Arc<MemorySource<User>>,
}

fn create_test_cache(policy: Box<dyn EvictionPolicy>, capacity: usize) -> TestCache {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(MemorySource::from_records(users()));
    let cache = Cache::new(
        store.clone(),
        policy,
        source.clone(),
        "itest",
        capacity,
        Duration::from_millis(200),
    );
    TestCache {
        cache,
        store,
        source,
    }
}

fn assert_not_found<T: std::fmt::Debug>(result: policy_cache::Result<T>) {
    assert!(
        matches!(result, Err(CacheError::NotFound(_))),
        "expected NotFound, got {:?}",
        result
    );
}

// == Eviction Order ==

#[tokio::test]
async fn test_fifo_evicts_oldest_insert() {
    let t = create_test_cache(Box::new(FifoPolicy), 3);

    for id in ["A", "B", "C"] {
        t.cache.set(&user(id)).await.unwrap();
    }
    // Reads do not protect A under FIFO
    t.cache.get("A").await.unwrap();
    t.cache.set(&user("D")).await.unwrap();

    assert_not_found(t.cache.get("A").await);
    for id in ["B", "C", "D"] {
        assert_eq!(t.cache.get(id).await.unwrap(), user(id));
    }
    assert_eq!(t.cache.size().await.unwrap(), 3);
}

#[tokio::test]
async fn test_lru_evicts_least_recently_touched() {
    let clock = Arc::new(ManualClock::new(1_700_000_000));
    let t = create_test_cache(Box::new(LruPolicy::new(clock.clone())), 2);

    t.cache.set(&user("A")).await.unwrap();
    clock.advance(1);
    t.cache.set(&user("B")).await.unwrap();
    clock.advance(1);
    t.cache.get("A").await.unwrap();
    clock.advance(1);
    t.cache.set(&user("C")).await.unwrap();

    assert_not_found(t.cache.get("B").await);
    assert!(t.cache.get("A").await.is_ok());
    assert!(t.cache.get("C").await.is_ok());
}

#[tokio::test]
async fn test_lfu_evicts_least_frequently_used() {
    let t = create_test_cache(Box::new(LfuPolicy), 2);

    t.cache.set(&user("A")).await.unwrap();
    t.cache.set(&user("B")).await.unwrap();
    t.cache.get("A").await.unwrap();
    t.cache.get("A").await.unwrap();

    let index = t.cache.index_key();
    let a_key = t.cache.entry_key("A");
    assert_eq!(t.store.score(&index, &a_key).await.unwrap(), Some(3.0));

    t.cache.set(&user("C")).await.unwrap();

    assert_not_found(t.cache.get("B").await);
    assert!(t.cache.get("A").await.is_ok());
    assert!(t.cache.get("C").await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_ttl_entry_expires_on_its_own() {
    let t = create_test_cache(Box::new(TtlPolicy::new(Duration::from_secs(5))), 1);

    t.cache.set(&user("A")).await.unwrap();
    assert_eq!(t.cache.get("A").await.unwrap(), user("A"));

    // Reads do not extend the lifetime
    tokio::time::advance(Duration::from_secs(3)).await;
    t.cache.get("A").await.unwrap();
    tokio::time::advance(Duration::from_secs(2)).await;

    assert_not_found(t.cache.get("A").await);
    assert!(t.store.live_keys("itest:").is_empty());
}

// == Façade Contract ==

#[tokio::test]
async fn test_delete_twice_is_not_an_error() {
    for policy in [
        Box::new(FifoPolicy) as Box<dyn EvictionPolicy>,
        Box::new(LruPolicy::new(Arc::new(SystemClock))),
        Box::new(LfuPolicy),
        Box::new(TtlPolicy::new(Duration::from_secs(60))),
    ] {
        let t = create_test_cache(policy, 3);
        t.cache.set(&user("A")).await.unwrap();

        t.cache.delete("A").await.unwrap();
        assert_not_found(t.cache.get("A").await);
        t.cache.delete("A").await.unwrap();
        assert_not_found(t.cache.get("A").await);
    }
}

#[tokio::test]
async fn test_request_miss_then_hit() {
    let t = create_test_cache(Box::new(LfuPolicy), 3);

    assert_eq!(t.cache.request("B").await.unwrap(), user("B"));
    assert_eq!(t.source.fetch_count(), 1);
    assert_eq!(t.cache.size().await.unwrap(), 1);

    assert_eq!(t.cache.request("B").await.unwrap(), user("B"));
    assert_eq!(t.source.fetch_count(), 1);
}

#[tokio::test]
async fn test_namespaces_are_isolated() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(MemorySource::from_records(users()));
    let first: Cache<User> = Cache::new(
        store.clone(),
        Box::new(FifoPolicy),
        source.clone(),
        "first",
        1,
        Duration::from_secs(1),
    );
    let second: Cache<User> = Cache::new(
        store.clone(),
        Box::new(FifoPolicy),
        source,
        "second",
        1,
        Duration::from_secs(1),
    );

    first.set(&user("A")).await.unwrap();
    second.set(&user("B")).await.unwrap();

    assert!(first.get("A").await.is_ok());
    assert_not_found(first.get("B").await);
    assert_eq!(second.size().await.unwrap(), 1);
    assert_eq!(store.live_keys(""), vec!["first:user:A", "second:user:B"]);
}

#[tokio::test]
async fn test_from_config_uses_configured_policy() {
    init_tracing();
    let config = Config {
        namespace: "configured".to_string(),
        policy: PolicyKind::Fifo,
        capacity: 2,
        ..Config::default()
    };
    let cache: Cache<User> = Cache::from_config(
        &config,
        Arc::new(MemoryStore::new()),
        Arc::new(MemorySource::from_records(users())),
        Arc::new(SystemClock),
    );

    for id in ["A", "B", "C"] {
        cache.request(id).await.unwrap();
    }

    assert_eq!(cache.policy_kind(), PolicyKind::Fifo);
    assert_eq!(cache.size().await.unwrap(), 2);
    assert_not_found(cache.get("A").await);
}

// == Degraded Store ==

/// Memory store that can be switched into a stalled or failing mode.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    stall_reads: AtomicBool,
    fail_writes: AtomicBool,
}

#[async_trait]
impl KvStore for FlakyStore {
    async fn get(&self, key: &str) -> policy_cache::Result<Option<Vec<u8>>> {
        if self.stall_reads.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        self.inner.get(key).await
    }
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> policy_cache::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::StoreUnavailable("connection reset".to_string()));
        }
        self.inner.set(key, value, ttl).await
    }
    async fn delete(&self, key: &str) -> policy_cache::Result<()> {
        self.inner.delete(key).await
    }
    async fn exists(&self, key: &str) -> policy_cache::Result<bool> {
        self.inner.exists(key).await
    }
    async fn push_tail(&self, list: &str, value: &str) -> policy_cache::Result<()> {
        self.inner.push_tail(list, value).await
    }
    async fn pop_head(&self, list: &str) -> policy_cache::Result<Option<String>> {
        self.inner.pop_head(list).await
    }
    async fn list_len(&self, list: &str) -> policy_cache::Result<usize> {
        self.inner.list_len(list).await
    }
    async fn list_remove(&self, list: &str, value: &str) -> policy_cache::Result<()> {
        self.inner.list_remove(list, value).await
    }
    async fn upsert_score(&self, set: &str, member: &str, score: f64) -> policy_cache::Result<()> {
        self.inner.upsert_score(set, member, score).await
    }
    async fn increment_score(&self, set: &str, member: &str, delta: f64) -> policy_cache::Result<f64> {
        self.inner.increment_score(set, member, delta).await
    }
    async fn pop_min(&self, set: &str, count: usize) -> policy_cache::Result<Vec<(String, f64)>> {
        self.inner.pop_min(set, count).await
    }
    async fn cardinality(&self, set: &str) -> policy_cache::Result<usize> {
        self.inner.cardinality(set).await
    }
    async fn remove_member(&self, set: &str, member: &str) -> policy_cache::Result<()> {
        self.inner.remove_member(set, member).await
    }
    async fn score(&self, set: &str, member: &str) -> policy_cache::Result<Option<f64>> {
        self.inner.score(set, member).await
    }
}

fn flaky_cache(store: Arc<FlakyStore>, source: Arc<MemorySource<User>>) -> Cache<User> {
    init_tracing();
    Cache::new(
        store,
        Box::new(FifoPolicy),
        source,
        "flaky",
        3,
        Duration::from_millis(100),
    )
}

#[tokio::test(start_paused = true)]
async fn test_request_survives_store_timeout() {
    let store = Arc::new(FlakyStore::default());
    let source = Arc::new(MemorySource::from_records(users()));
    let cache = flaky_cache(store.clone(), source.clone());
    store.stall_reads.store(true, Ordering::SeqCst);

    let result = cache.get("A").await;
    assert!(matches!(result, Err(CacheError::StoreUnavailable(_))));

    assert_eq!(cache.request("A").await.unwrap(), user("A"));
    assert_eq!(source.fetch_count(), 1);
}

#[tokio::test]
async fn test_request_survives_failed_fill() {
    let store = Arc::new(FlakyStore::default());
    let source = Arc::new(MemorySource::from_records(users()));
    let cache = flaky_cache(store.clone(), source.clone());
    store.fail_writes.store(true, Ordering::SeqCst);

    assert_eq!(cache.request("C").await.unwrap(), user("C"));
    assert_eq!(cache.stats().fill_failures, 1);

    // The order token was written before the entry write failed; no rollback
    assert_eq!(cache.size().await.unwrap(), 1);
    assert!(matches!(
        cache.set(&user("D")).await,
        Err(CacheError::StoreUnavailable(_))
    ));
}

#[tokio::test]
async fn test_fifo_refill_after_failed_write_keeps_one_token() {
    let store = Arc::new(FlakyStore::default());
    let source = Arc::new(MemorySource::from_records(users()));
    let cache = flaky_cache(store.clone(), source.clone());

    // First fill leaves an order token without an entry
    store.fail_writes.store(true, Ordering::SeqCst);
    cache.request("C").await.unwrap();
    store.fail_writes.store(false, Ordering::SeqCst);

    cache.request("C").await.unwrap();
    assert_eq!(cache.size().await.unwrap(), 1);
    assert_eq!(store.inner.live_keys("flaky:"), vec!["flaky:user:C"]);

    // Filling to capacity must not evict C through a leftover token
    cache.request("A").await.unwrap();
    cache.request("B").await.unwrap();

    let live = store.inner.live_keys("flaky:");
    assert_eq!(cache.size().await.unwrap(), live.len());
    assert_eq!(live, vec!["flaky:user:A", "flaky:user:B", "flaky:user:C"]);
    assert_eq!(cache.get("C").await.unwrap(), user("C"));
}

struct BrokenSource;

#[async_trait]
impl BackingSource<User> for BrokenSource {
    async fn fetch(&self, id: &str) -> anyhow::Result<User> {
        anyhow::bail!("database unreachable while loading {}", id)
    }
}

#[tokio::test]
async fn test_source_failure_is_propagated() {
    init_tracing();
    let cache: Cache<User> = Cache::new(
        Arc::new(MemoryStore::new()),
        Box::new(LfuPolicy),
        Arc::new(BrokenSource),
        "broken",
        2,
        Duration::from_secs(1),
    );

    let err = cache.request("A").await.unwrap_err();
    assert!(matches!(err, CacheError::SourceFailure(_)));
    assert!(err.to_string().contains("database unreachable while loading A"));
    assert_eq!(cache.size().await.unwrap(), 0);
}

// == Redis ==

#[tokio::test]
#[ignore = "needs a Redis server at CACHE_REDIS_URL"]
async fn test_lru_against_redis() {
    init_tracing();
    let config = Config::from_env();
    let store = Arc::new(RedisStore::connect(&config.redis_url).await.unwrap());
    let namespace = format!("itest-{}", std::process::id());
    let clock = Arc::new(ManualClock::new(1_700_000_000));
    let cache: Cache<User> = Cache::new(
        store.clone(),
        Box::new(LruPolicy::new(clock.clone())),
        Arc::new(MemorySource::from_records(users())),
        &namespace,
        2,
        config.store_timeout(),
    );

    cache.request("A").await.unwrap();
    clock.advance(1);
    cache.request("B").await.unwrap();
    clock.advance(1);
    cache.request("A").await.unwrap();
    clock.advance(1);
    cache.request("C").await.unwrap();

    assert_not_found(cache.get("B").await);
    assert_eq!(cache.size().await.unwrap(), 2);

    for id in ["A", "B", "C"] {
        cache.delete(id).await.unwrap();
    }
    assert_eq!(cache.size().await.unwrap(), 0);
}
