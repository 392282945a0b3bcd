//! Statement Builder Module
//!
//! Renders the parameterized statements the store executor runs against the
//! cache table. Point statements are rendered once per table; bulk statements
//! are assembled per call with `sqlx::QueryBuilder`.

use sqlx::{QueryBuilder, Sqlite};

/// Most bound parameters SQLite accepts in one statement (`SQLITE_MAX_VARIABLE_NUMBER`)
pub const MAX_BIND_PARAMETERS: usize = 32766;

/// Most keys one bulk read or bulk delete can carry
pub const MAX_BATCH_KEYS: usize = MAX_BIND_PARAMETERS;

/// Most rows one bulk upsert can carry; each row binds key, value and expiry
pub const MAX_BATCH_ROWS: usize = MAX_BIND_PARAMETERS / 3;

/// Quotes a table name as an SQL identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

// == Statements ==
/// Statements for one cache table.
#[derive(Debug, Clone)]
pub struct Statements {
    table: String,
    /// Point read: binds `cache_key`
    pub get: String,
    /// Liveness probe: binds `cache_key`, `now`
    pub has_key: String,
    /// Unconditional upsert: binds `cache_key`, `value`, `expires`
    pub set: String,
    /// Conditional insert: binds `cache_key`, `value`, `expires`, `now`
    pub add: String,
    /// Point delete: binds `cache_key`
    pub delete: String,
    /// Removes every row
    pub clear: String,
}

const UPSERT_CLAUSE: &str =
    " ON CONFLICT(cache_key) DO UPDATE SET value = excluded.value, expires = excluded.expires";

impl Statements {
    // == Constructor ==
    /// Renders the point statements for `table`.
    pub fn new(table: &str) -> Self {
        let table = quote_identifier(table);

        let get = format!("SELECT value, expires FROM {} WHERE cache_key = ?", table);
        let has_key = format!(
            "SELECT cache_key FROM {} WHERE cache_key = ? AND expires > ?",
            table
        );
        let set = format!(
            "INSERT INTO {} (cache_key, value, expires) VALUES (?, ?, ?){}",
            table, UPSERT_CLAUSE
        );
        // The update branch only fires when the existing row has expired. A
        // row comes back from RETURNING iff the insert or the replacement
        // happened; a live row makes the WHERE false and nothing is returned.
        let add = format!(
            "INSERT INTO {t} (cache_key, value, expires) VALUES (?, ?, ?){u} \
             WHERE {t}.expires <= ? RETURNING cache_key",
            t = table,
            u = UPSERT_CLAUSE
        );
        let delete = format!("DELETE FROM {} WHERE cache_key = ?", table);
        let clear = format!("DELETE FROM {}", table);

        Self {
            table,
            get,
            has_key,
            set,
            add,
            delete,
            clear,
        }
    }

    /// Quoted table identifier.
    pub fn table(&self) -> &str {
        &self.table
    }

    // == Bulk Read ==
    /// `SELECT cache_key, value, expires ... WHERE cache_key IN (...)`.
    pub fn get_many(&self, keys: &[String]) -> QueryBuilder<'static, Sqlite> {
        let mut query = QueryBuilder::new(format!(
            "SELECT cache_key, value, expires FROM {} WHERE cache_key IN (",
            self.table
        ));
        push_key_list(&mut query, keys);
        query
    }

    // == Bulk Upsert ==
    /// One multi-row upsert sharing a single expiry.
    pub fn set_many(&self, rows: Vec<(String, Vec<u8>)>, expires: i64) -> QueryBuilder<'static, Sqlite> {
        let mut query = QueryBuilder::new(format!(
            "INSERT INTO {} (cache_key, value, expires) ",
            self.table
        ));
        query.push_values(rows, |mut tuple, (key, blob)| {
            tuple.push_bind(key).push_bind(blob).push_bind(expires);
        });
        query.push(UPSERT_CLAUSE);
        query
    }

    // == Bulk Delete ==
    /// `DELETE ... WHERE cache_key IN (...)`.
    pub fn delete_many(&self, keys: &[String]) -> QueryBuilder<'static, Sqlite> {
        let mut query = QueryBuilder::new(format!(
            "DELETE FROM {} WHERE cache_key IN (",
            self.table
        ));
        push_key_list(&mut query, keys);
        query
    }
}

fn push_key_list(query: &mut QueryBuilder<'static, Sqlite>, keys: &[String]) {
    let mut list = query.separated(", ");
    for key in keys {
        list.push_bind(key.clone());
    }
    list.push_unseparated(")");
}
