//! Cache Key Module
//!
//! Key construction and validation. Validation runs before any store access.

use crate::cache::MAX_KEY_LENGTH;
use crate::error::{CacheError, Result};

/// Builds the stored key from the caller's key, the cache prefix and version.
pub type KeyFunc = fn(key: &str, prefix: &str, version: i32) -> String;

// == Default Key Function ==
/// Joins prefix, version and key with colons: `prefix:version:key`.
pub fn default_key_func(key: &str, prefix: &str, version: i32) -> String {
    format!("{}:{}:{}", prefix, version, key)
}

// == Validate ==
/// Rejects keys that would not fit the `cache_key` column or that contain
/// control characters or spaces.
pub fn validate_key(key: &str) -> Result<()> {
    let length = key.chars().count();
    if length > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "key is {} characters, maximum is {}: {}",
            length, MAX_KEY_LENGTH, key
        )));
    }

    if let Some(c) = key.chars().find(|c| (*c as u32) < 33 || *c as u32 == 127) {
        return Err(CacheError::InvalidKey(format!(
            "key contains disallowed character {:?}: {}",
            c, key
        )));
    }

    Ok(())
}
