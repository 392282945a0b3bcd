//! Cache Store Module
//!
//! Executes cache operations against the backing table. Each operation is a
//! single statement run on a connection checked out of the pool for the
//! duration of that statement.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::cache::codec::{decode, encode};
use crate::cache::entry::{is_live, CacheEntry};
use crate::cache::expiry::{backend_timeout, now_ms, Timeout};
use crate::cache::key::{default_key_func, validate_key, KeyFunc};
use crate::cache::statements::{Statements, MAX_BATCH_KEYS, MAX_BATCH_ROWS};
use crate::cache::DEFAULT_TABLE;
use crate::error::{CacheError, Result};

// == Cache Options ==
/// Table name, key namespacing and default timeout for a [`CacheStore`].
#[derive(Clone)]
pub struct CacheOptions {
    /// Backing table name (unquoted)
    pub table: String,
    /// Prefix passed to the key function
    pub key_prefix: String,
    /// Version passed to the key function
    pub version: i32,
    /// Timeout used for `Timeout::Default`; `None` = never expire
    pub default_timeout: Option<Duration>,
    /// Builds the stored key
    pub key_func: KeyFunc,
}

impl CacheOptions {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    pub fn default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn key_func(mut self, key_func: KeyFunc) -> Self {
        self.key_func = key_func;
        self
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            key_prefix: String::new(),
            version: 1,
            default_timeout: Some(Duration::from_secs(300)),
            key_func: default_key_func,
        }
    }
}

impl fmt::Debug for CacheOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheOptions")
            .field("table", &self.table)
            .field("key_prefix", &self.key_prefix)
            .field("version", &self.version)
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}

// == Get Many Result ==
/// Result of a bulk read, keyed by the caller's (un-namespaced) keys.
///
/// Keys that are missing or expired appear in neither map. Rows whose blob
/// failed to decode are reported in `errors` instead of failing the batch.
/// Caller keys that the key function maps to the same stored key each get
/// their own copy of that row's outcome.
#[derive(Debug)]
pub struct GetMany<T> {
    pub values: HashMap<String, T>,
    pub errors: HashMap<String, CacheError>,
}

impl<T> Default for GetMany<T> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            errors: HashMap::new(),
        }
    }
}

// == Cache Store ==
/// Cache backed by a relational table.
#[derive(Debug, Clone)]
pub struct CacheStore {
    pool: SqlitePool,
    statements: Statements,
    options: CacheOptions,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store over an existing table. The table is never created here.
    pub fn new(pool: SqlitePool, options: CacheOptions) -> Self {
        Self {
            pool,
            statements: Statements::new(&options.table),
            options,
        }
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // == Framework Hooks ==
    /// Applies the configured key function.
    pub fn make_key(&self, key: &str) -> String {
        (self.options.key_func)(key, &self.options.key_prefix, self.options.version)
    }

    /// Absolute expiry in milliseconds for `timeout`.
    pub fn get_backend_timeout(&self, timeout: Timeout) -> i64 {
        backend_timeout(timeout, self.options.default_timeout)
    }

    fn made_key(&self, key: &str) -> Result<String> {
        let key = self.make_key(key);
        validate_key(&key)?;
        Ok(key)
    }

    // == Get ==
    /// Returns the live value for `key`, or `None` on a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let key = self.made_key(key)?;

        let row: Option<(Vec<u8>, i64)> = {
            let mut conn = self.pool.acquire().await?;
            let row = sqlx::query_as(&self.statements.get)
                .bind(key.as_str())
                .fetch_optional(&mut *conn)
                .await?;
            row
        };

        match row {
            Some((blob, expires)) if is_live(expires, now_ms()) => {
                debug!("get {}: hit", key);
                decode(&blob).map(Some)
            }
            Some(_) => {
                debug!("get {}: expired", key);
                Ok(None)
            }
            None => {
                debug!("get {}: miss", key);
                Ok(None)
            }
        }
    }

    /// Like [`get`](Self::get) but falls back to `default` on a miss.
    pub async fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T> {
        Ok(self.get(key).await?.unwrap_or(default))
    }

    // == Get Many ==
    /// Reads all `keys` in one statement.
    pub async fn get_many<T, K>(&self, keys: &[K]) -> Result<GetMany<T>>
    where
        T: DeserializeOwned,
        K: AsRef<str>,
    {
        let mut originals: HashMap<String, Vec<String>> = HashMap::with_capacity(keys.len());
        for key in keys {
            let made = self.made_key(key.as_ref())?;
            let callers = originals.entry(made).or_default();
            if !callers.iter().any(|k| k == key.as_ref()) {
                callers.push(key.as_ref().to_string());
            }
        }

        let mut result = GetMany::default();
        if originals.is_empty() {
            return Ok(result);
        }
        check_batch_size("get_many", originals.len(), MAX_BATCH_KEYS)?;

        let made_keys: Vec<String> = originals.keys().cloned().collect();
        let rows: Vec<CacheEntry> = {
            let mut conn = self.pool.acquire().await?;
            let mut query = self.statements.get_many(&made_keys);
            let rows = query.build_query_as().fetch_all(&mut *conn).await?;
            rows
        };

        let now = now_ms();
        for row in rows {
            if !row.is_live_at(now) {
                continue;
            }
            let Some(callers) = originals.remove(&row.cache_key) else {
                continue;
            };
            for original in callers {
                match decode(&row.value) {
                    Ok(value) => {
                        result.values.insert(original, value);
                    }
                    Err(e) => {
                        warn!("get_many {}: skipping undecodable entry: {}", row.cache_key, e);
                        result.errors.insert(original, e);
                    }
                }
            }
        }

        debug!(
            "get_many: {} requested, {} hits",
            made_keys.len(),
            result.values.len()
        );
        Ok(result)
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any existing entry.
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        timeout: Timeout,
    ) -> Result<()> {
        let key = self.made_key(key)?;
        let blob = encode(value)?;
        let expires = self.get_backend_timeout(timeout);

        let mut conn = self.pool.acquire().await?;
        sqlx::query(&self.statements.set)
            .bind(key.as_str())
            .bind(blob)
            .bind(expires)
            .execute(&mut *conn)
            .await?;

        debug!("set {} (expires {})", key, expires);
        Ok(())
    }

    // == Add ==
    /// Stores `value` only if `key` holds no live entry.
    ///
    /// Returns `true` if the value was stored (the key was absent or its entry
    /// had expired) and `false` if a live entry was left untouched.
    pub async fn add<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        timeout: Timeout,
    ) -> Result<bool> {
        let key = self.made_key(key)?;
        let blob = encode(value)?;
        let expires = self.get_backend_timeout(timeout);

        let mut conn = self.pool.acquire().await?;
        let stored: Option<(String,)> = sqlx::query_as(&self.statements.add)
            .bind(key.as_str())
            .bind(blob)
            .bind(expires)
            .bind(now_ms())
            .fetch_optional(&mut *conn)
            .await?;

        let added = stored.is_some();
        debug!("add {}: {}", key, if added { "stored" } else { "rejected" });
        Ok(added)
    }

    // == Get Or Set ==
    /// Returns the live value for `key`, storing `default()` first on a miss.
    ///
    /// The default is stored with `add`, so when callers race the value of the
    /// winning `add` is what everyone reads back.
    pub async fn get_or_set<T, F>(&self, key: &str, default: F, timeout: Timeout) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        if let Some(value) = self.get(key).await? {
            return Ok(value);
        }

        let value = default();
        self.add(key, &value, timeout).await?;
        Ok(self.get(key).await?.unwrap_or(value))
    }

    // == Set Many ==
    /// Upserts every item in one statement with a shared timeout.
    ///
    /// All keys are validated and all values encoded before the store is touched.
    pub async fn set_many<'a, K, T, I>(&self, items: I, timeout: Timeout) -> Result<()>
    where
        I: IntoIterator<Item = (K, &'a T)>,
        K: AsRef<str>,
        T: Serialize + ?Sized + 'a,
    {
        let mut rows = Vec::new();
        for (key, value) in items {
            let key = self.made_key(key.as_ref())?;
            rows.push((key, encode(value)?));
        }

        if rows.is_empty() {
            return Ok(());
        }
        check_batch_size("set_many", rows.len(), MAX_BATCH_ROWS)?;

        let count = rows.len();
        let expires = self.get_backend_timeout(timeout);

        let mut conn = self.pool.acquire().await?;
        let mut query = self.statements.set_many(rows, expires);
        query.build().execute(&mut *conn).await?;

        debug!("set_many: {} entries (expires {})", count, expires);
        Ok(())
    }

    // == Delete ==
    /// Removes `key`. Returns whether a row existed; an absent key is not an error.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let key = self.made_key(key)?;

        let mut conn = self.pool.acquire().await?;
        let done = sqlx::query(&self.statements.delete)
            .bind(key.as_str())
            .execute(&mut *conn)
            .await?;

        debug!("delete {}: {} rows", key, done.rows_affected());
        Ok(done.rows_affected() > 0)
    }

    // == Delete Many ==
    /// Removes all `keys` in one statement, returning the number of rows removed.
    pub async fn delete_many<K: AsRef<str>>(&self, keys: &[K]) -> Result<u64> {
        let made_keys = keys
            .iter()
            .map(|key| self.made_key(key.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        if made_keys.is_empty() {
            return Ok(0);
        }
        check_batch_size("delete_many", made_keys.len(), MAX_BATCH_KEYS)?;

        let mut conn = self.pool.acquire().await?;
        let mut query = self.statements.delete_many(&made_keys);
        let done = query.build().execute(&mut *conn).await?;

        debug!("delete_many: {} rows", done.rows_affected());
        Ok(done.rows_affected())
    }

    // == Has Key ==
    /// True iff `key` holds a live entry.
    pub async fn has_key(&self, key: &str) -> Result<bool> {
        let key = self.made_key(key)?;

        let mut conn = self.pool.acquire().await?;
        let row: Option<(String,)> = sqlx::query_as(&self.statements.has_key)
            .bind(key.as_str())
            .bind(now_ms())
            .fetch_optional(&mut *conn)
            .await?;

        Ok(row.is_some())
    }

    // == Clear ==
    /// Removes every row in the table, live or expired.
    pub async fn clear(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        let done = sqlx::query(&self.statements.clear)
            .execute(&mut *conn)
            .await?;

        debug!("clear: {} rows removed from {}", done.rows_affected(), self.statements.table());
        Ok(())
    }
}

/// Refuses a bulk statement whose bind count would exceed SQLite's limit.
fn check_batch_size(operation: &str, size: usize, max: usize) -> Result<()> {
    if size > max {
        return Err(CacheError::InvalidRequest(format!(
            "{} batch of {} exceeds the maximum of {}",
            operation, size, max
        )));
    }
    Ok(())
}
