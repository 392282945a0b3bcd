//! Integration Tests for the Cache Store
//!
//! Exercises the public cache API against SQLite tables.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use sql_cache::cache::{CacheOptions, CacheStore, Timeout, MAX_KEY_LENGTH};
use sql_cache::schema::create_table;
use sql_cache::CacheError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

// == Helper Functions ==

async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap()
}

async fn memory_cache(options: CacheOptions) -> CacheStore {
    let pool = memory_pool().await;
    create_table(&pool, &options.table).await.unwrap();
    CacheStore::new(pool, options)
}

async fn row_count(cache: &CacheStore) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM \"{}\"", cache.options().table);
    sqlx::query_scalar(&sql)
        .fetch_one(cache.pool())
        .await
        .unwrap()
}

fn identity_key(key: &str, _prefix: &str, _version: i32) -> String {
    key.to_string()
}

const SHORT: Timeout = Timeout::After(Duration::from_millis(1));

// == Round Trip ==

#[tokio::test]
async fn test_roundtrip_forever() {
    let cache = memory_cache(CacheOptions::default()).await;

    let mut value = HashMap::new();
    value.insert("ids".to_string(), vec![1u64, 2, 3]);
    cache.set("k", &value, Timeout::Never).await.unwrap();

    let stored: HashMap<String, Vec<u64>> = cache.get("k").await.unwrap().unwrap();
    assert_eq!(stored, value);
}

#[tokio::test]
async fn test_default_timeout_applies() {
    let options = CacheOptions::default().default_timeout(Some(Duration::from_millis(1)));
    let cache = memory_cache(options).await;

    cache.set("k", "v", Timeout::Default).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(cache.get::<String>("k").await.unwrap().is_none());
}

// == Expiry ==

#[tokio::test]
async fn test_expiry_visibility() {
    let cache = memory_cache(CacheOptions::default()).await;

    cache.set("k", "v", SHORT).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(cache.get::<String>("k").await.unwrap().is_none());
    assert_eq!(cache.get_or("k", "fallback".to_string()).await.unwrap(), "fallback");
    assert!(!cache.has_key("k").await.unwrap());

    // Lazily hidden, not purged
    assert_eq!(row_count(&cache).await, 1);
}

#[tokio::test]
async fn test_get_many_drops_expired() {
    let cache = memory_cache(CacheOptions::default()).await;

    cache.set("live", &1, Timeout::Never).await.unwrap();
    cache.set("stale", &2, SHORT).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let result = cache.get_many::<i32, _>(&["live", "stale"]).await.unwrap();
    assert_eq!(result.values.len(), 1);
    assert_eq!(result.values["live"], 1);
    assert!(result.errors.is_empty());
}

// == Add ==

#[tokio::test]
async fn test_add_after_expiry() {
    let cache = memory_cache(CacheOptions::default()).await;

    cache.set("k", "v1", SHORT).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(cache.add("k", "v2", Timeout::Never).await.unwrap());
    assert_eq!(cache.get::<String>("k").await.unwrap().as_deref(), Some("v2"));
}

#[tokio::test]
async fn test_add_does_not_touch_live_expiry() {
    let cache = memory_cache(CacheOptions::default()).await;

    cache.set("k", "v1", Timeout::secs(3600)).await.unwrap();
    assert!(!cache.add("k", "v2", SHORT).await.unwrap());
    tokio::time::sleep(Duration::from_millis(20)).await;

    // The rejected add must not have shortened the live entry
    assert_eq!(cache.get::<String>("k").await.unwrap().as_deref(), Some("v1"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_add_is_exclusive_across_connections() {
    let path: PathBuf = std::env::temp_dir().join(format!(
        "sql_cache_add_race_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(&path)
                .create_if_missing(true),
        )
        .await
        .unwrap();
    let options = CacheOptions::default();
    create_table(&pool, &options.table).await.unwrap();
    let cache = CacheStore::new(pool.clone(), options);

    let mut handles = Vec::new();
    for i in 0..16u32 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            let added = cache.add("race", &i, Timeout::Never).await.unwrap();
            (i, added)
        }));
    }

    let mut winners = Vec::new();
    for handle in handles {
        let (i, added) = handle.await.unwrap();
        if added {
            winners.push(i);
        }
    }

    assert_eq!(winners.len(), 1, "exactly one add must win: {:?}", winners);
    assert_eq!(cache.get::<u32>("race").await.unwrap(), Some(winners[0]));

    pool.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
    }
}

#[tokio::test]
async fn test_get_or_set_keeps_existing() {
    let cache = memory_cache(CacheOptions::default()).await;

    cache.set("k", "existing", Timeout::Never).await.unwrap();
    let value: String = cache
        .get_or_set("k", || "computed".to_string(), Timeout::Never)
        .await
        .unwrap();
    assert_eq!(value, "existing");
}

// == Bulk ==

#[tokio::test]
async fn test_bulk_consistency() {
    let cache = memory_cache(CacheOptions::default()).await;

    let data: HashMap<&str, i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
    cache.set_many(&data, Timeout::Never).await.unwrap();

    let result = cache
        .get_many::<i32, _>(&["a", "b", "c", "d"])
        .await
        .unwrap();
    let expected: HashMap<String, i32> = data.iter().map(|(k, v)| (k.to_string(), *v)).collect();
    assert_eq!(result.values, expected);
    assert!(!result.values.contains_key("d"));
}

#[tokio::test]
async fn test_set_many_overwrites() {
    let cache = memory_cache(CacheOptions::default()).await;

    cache.set("a", &0, Timeout::Never).await.unwrap();
    cache
        .set_many([("a", &10), ("b", &20)], Timeout::Never)
        .await
        .unwrap();

    assert_eq!(cache.get::<i32>("a").await.unwrap(), Some(10));
    assert_eq!(row_count(&cache).await, 2);
}

#[tokio::test]
async fn test_set_many_empty_is_noop() {
    let cache = memory_cache(CacheOptions::default()).await;
    let empty: HashMap<String, i32> = HashMap::new();
    cache.set_many(&empty, Timeout::Never).await.unwrap();
    assert_eq!(row_count(&cache).await, 0);
}

// == Delete / Clear ==

#[tokio::test]
async fn test_delete_idempotence() {
    let cache = memory_cache(CacheOptions::default()).await;

    assert!(!cache.delete("k").await.unwrap());
    assert!(!cache.delete("k").await.unwrap());
    assert_eq!(cache.delete_many(&["x", "y"]).await.unwrap(), 0);
}

#[tokio::test]
async fn test_clear_completeness() {
    let cache = memory_cache(CacheOptions::default()).await;

    let keys = ["a", "b", "c"];
    for (i, key) in keys.iter().enumerate() {
        cache.set(key, &i, Timeout::Never).await.unwrap();
    }
    cache.set("stale", &0, SHORT).await.unwrap();

    cache.clear().await.unwrap();

    let result = cache.get_many::<usize, _>(&keys).await.unwrap();
    assert!(result.values.is_empty());
    assert_eq!(row_count(&cache).await, 0);
}

// == Keys ==

#[tokio::test]
async fn test_key_length_boundary() {
    let cache = memory_cache(CacheOptions::default().key_func(identity_key)).await;

    let exact = "k".repeat(MAX_KEY_LENGTH);
    cache.set(&exact, "v", Timeout::Never).await.unwrap();
    assert!(cache.has_key(&exact).await.unwrap());

    let too_long = "k".repeat(MAX_KEY_LENGTH + 1);
    let result = cache.set(&too_long, "v", Timeout::Never).await;
    assert!(matches!(result, Err(CacheError::InvalidKey(_))));
    let result = cache.add(&too_long, "v", Timeout::Never).await;
    assert!(matches!(result, Err(CacheError::InvalidKey(_))));

    // Only the accepted key reached the table
    assert_eq!(row_count(&cache).await, 1);
}

#[tokio::test]
async fn test_namespacing_counts_toward_length() {
    let cache = memory_cache(CacheOptions::default().key_prefix("app")).await;

    // "app:1:" adds six characters
    let key = "k".repeat(MAX_KEY_LENGTH - 5);
    let result = cache.get::<String>(&key).await;
    assert!(matches!(result, Err(CacheError::InvalidKey(_))));
}

#[tokio::test]
async fn test_versions_are_isolated() {
    let pool = memory_pool().await;
    create_table(&pool, "cache_entries").await.unwrap();
    let v1 = CacheStore::new(pool.clone(), CacheOptions::default().version(1));
    let v2 = CacheStore::new(pool, CacheOptions::default().version(2));

    v1.set("k", "one", Timeout::Never).await.unwrap();
    assert!(v2.get::<String>("k").await.unwrap().is_none());
    assert!(v2.add("k", "two", Timeout::Never).await.unwrap());
    assert_eq!(v1.get::<String>("k").await.unwrap().as_deref(), Some("one"));
}

#[tokio::test]
async fn test_custom_table_name() {
    let cache = memory_cache(CacheOptions::new("my cache")).await;

    cache.set("k", &true, Timeout::Never).await.unwrap();
    assert_eq!(cache.get::<bool>("k").await.unwrap(), Some(true));
}
