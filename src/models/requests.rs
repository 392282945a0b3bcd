//! Request DTOs for the cache HTTP API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::cache::Timeout;

/// Request body for `PUT /cache/:key` and `POST /cache/:key/add`
///
/// # Fields
/// - `value`: Any JSON value
/// - `ttl`: Optional TTL in seconds (uses the cache default if not specified)
/// - `forever`: Store without expiry
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The value to store
    pub value: Value,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
    /// Never expire
    #[serde(default)]
    pub forever: bool,
}

impl SetRequest {
    /// Resolves `ttl`/`forever` into a timeout.
    ///
    /// Returns an error message if both are given.
    pub fn timeout(&self) -> Result<Timeout, String> {
        resolve_timeout(self.ttl, self.forever)
    }
}

/// Request body for `PUT /batch/set`
#[derive(Debug, Clone, Deserialize)]
pub struct SetManyRequest {
    /// Values to store, by key
    pub items: HashMap<String, Value>,
    /// Optional TTL in seconds, shared by every item
    #[serde(default)]
    pub ttl: Option<u64>,
    /// Never expire
    #[serde(default)]
    pub forever: bool,
}

impl SetManyRequest {
    /// Resolves `ttl`/`forever` into a timeout.
    pub fn timeout(&self) -> Result<Timeout, String> {
        resolve_timeout(self.ttl, self.forever)
    }
}

/// Request body for `POST /batch/get` and `POST /batch/delete`
#[derive(Debug, Clone, Deserialize)]
pub struct KeysRequest {
    pub keys: Vec<String>,
}

fn resolve_timeout(ttl: Option<u64>, forever: bool) -> Result<Timeout, String> {
    match (ttl, forever) {
        (Some(_), true) => Err("ttl and forever are mutually exclusive".to_string()),
        (Some(secs), false) => Ok(Timeout::After(Duration::from_secs(secs))),
        (None, true) => Ok(Timeout::Never),
        (None, false) => Ok(Timeout::Default),
    }
}
