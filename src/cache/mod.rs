//! Cache Module
//!
//! Cache backed by a relational table, with lazy TTL expiration and an
//! atomic set-if-absent.

mod codec;
mod entry;
mod expiry;
mod key;
mod statements;
mod store;


// Re-export public types
pub use codec::{decode, encode, FORMAT_VERSION};
pub use entry::{is_live, CacheEntry};
pub use expiry::{backend_timeout, now_ms, Timeout, FOREVER};
pub use key::{default_key_func, validate_key, KeyFunc};
pub use statements::{
    quote_identifier, Statements, MAX_BATCH_KEYS, MAX_BATCH_ROWS, MAX_BIND_PARAMETERS,
};
pub use store::{CacheOptions, CacheStore, GetMany};

// == Public Constants ==
/// Maximum allowed key length in characters, matching the `cache_key` column width
pub const MAX_KEY_LENGTH: usize = 250;

/// Table used when none is configured
pub const DEFAULT_TABLE: &str = "cache_entries";
