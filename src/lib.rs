//! SQL Cache - A cache backed by a relational table
//!
//! Provides get/set/add/delete with per-entry millisecond expiration, bulk
//! operations, and an atomic set-if-absent, plus an HTTP front end.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod schema;

pub use api::AppState;
pub use cache::{CacheOptions, CacheStore, Timeout};
pub use config::Config;
pub use error::{CacheError, Result};
