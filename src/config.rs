//! Configuration Module
//!
//! Handles loading and managing configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::{CacheOptions, DEFAULT_TABLE};

/// Server and cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL
    pub database_url: String,
    /// Maximum pooled connections
    pub db_max_connections: u32,
    /// Backing table name
    pub table: String,
    /// Prefix applied to every key
    pub key_prefix: String,
    /// Key version applied to every key
    pub version: i32,
    /// Default timeout in seconds, `None` = never expire
    pub default_timeout: Option<u64>,
    /// Create the table at startup if it is missing
    pub create_table: bool,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_URL` - SQLite URL (default: `sqlite://cache.db?mode=rwc`)
    /// - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
    /// - `CACHE_TABLE` - Table name (default: `cache_entries`)
    /// - `CACHE_KEY_PREFIX` - Key prefix (default: empty)
    /// - `CACHE_VERSION` - Key version (default: 1)
    /// - `CACHE_DEFAULT_TIMEOUT` - Seconds, or `none` for no expiry (default: 300)
    /// - `CACHE_CREATE_TABLE` - `true`/`1` to create the table (default: false)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(defaults.db_max_connections),
            table: env::var("CACHE_TABLE").unwrap_or(defaults.table),
            key_prefix: env::var("CACHE_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            version: parse_var("CACHE_VERSION").unwrap_or(defaults.version),
            default_timeout: match env::var("CACHE_DEFAULT_TIMEOUT") {
                Ok(v) if v.eq_ignore_ascii_case("none") => None,
                Ok(v) => v.parse().ok().or(defaults.default_timeout),
                Err(_) => defaults.default_timeout,
            },
            create_table: env::var("CACHE_CREATE_TABLE")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.create_table),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Cache options derived from this configuration.
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions::new(self.table.clone())
            .key_prefix(self.key_prefix.clone())
            .version(self.version)
            .default_timeout(self.default_timeout.map(Duration::from_secs))
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://cache.db?mode=rwc".to_string(),
            db_max_connections: 5,
            table: DEFAULT_TABLE.to_string(),
            key_prefix: String::new(),
            version: 1,
            default_timeout: Some(300),
            create_table: false,
            server_port: 3000,
        }
    }
}
