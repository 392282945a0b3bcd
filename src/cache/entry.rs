//! Cache Entry Module
//!
//! Row shape of the backing table and the liveness check applied on read.

use sqlx::FromRow;

// == Cache Entry ==
/// One row of the cache table.
#[derive(Debug, Clone, FromRow)]
pub struct CacheEntry {
    /// Stored (namespaced) key
    pub cache_key: String,
    /// Encoded value blob
    pub value: Vec<u8>,
    /// Expiration timestamp (Unix milliseconds), `FOREVER` = no expiration
    pub expires: i64,
}

impl CacheEntry {
    // == Is Live ==
    /// An entry is live while `expires` is strictly in the future.
    pub fn is_live_at(&self, now: i64) -> bool {
        is_live(self.expires, now)
    }
}

/// Shared expiry comparison used by every read path.
pub fn is_live(expires: i64, now: i64) -> bool {
    expires > now
}
