//! Cache Table Schema
//!
//! DDL for the backing table. The cache itself never creates or migrates the
//! table; this is for operators and tests.

use sqlx::SqlitePool;
use tracing::info;

use crate::cache::{quote_identifier, MAX_KEY_LENGTH};
use crate::error::Result;

/// Renders `CREATE TABLE IF NOT EXISTS` for a cache table.
pub fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\
         cache_key VARCHAR({}) NOT NULL PRIMARY KEY, \
         value BLOB NOT NULL, \
         expires INTEGER NOT NULL)",
        quote_identifier(table),
        MAX_KEY_LENGTH
    )
}

/// Creates the cache table if it does not exist.
pub async fn create_table(pool: &SqlitePool, table: &str) -> Result<()> {
    sqlx::query(&create_table_sql(table)).execute(pool).await?;
    info!("Cache table {} ready", table);
    Ok(())
}
