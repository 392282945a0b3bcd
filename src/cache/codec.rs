//! Value Codec Module
//!
//! Serializes values into the opaque blobs stored in the `value` column.
//!
//! Blob layout: one format version byte followed by the JSON encoding of the
//! value. Blobs with an unknown version byte are rejected rather than guessed at.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{CacheError, Result};

/// Current blob format version.
pub const FORMAT_VERSION: u8 = 1;

// == Encode ==
/// Serializes a value into a versioned blob.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut blob = vec![FORMAT_VERSION];
    serde_json::to_writer(&mut blob, value).map_err(|e| CacheError::Encode(e.to_string()))?;
    Ok(blob)
}

// == Decode ==
/// Deserializes a blob produced by [`encode`].
pub fn decode<T: DeserializeOwned>(blob: &[u8]) -> Result<T> {
    let (version, payload) = blob
        .split_first()
        .ok_or_else(|| CacheError::Decode("empty blob".to_string()))?;

    if *version != FORMAT_VERSION {
        return Err(CacheError::Decode(format!(
            "unknown format version {}",
            version
        )));
    }

    serde_json::from_slice(payload).map_err(|e| CacheError::Decode(e.to_string()))
}
