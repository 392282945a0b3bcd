//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache and its HTTP surface.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key is too long or contains disallowed characters
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    /// Value could not be serialized
    #[error("Encode error: {0}")]
    Encode(String),

    /// Stored bytes could not be deserialized
    #[error("Decode error: {0}")]
    Decode(String),

    /// The backing store rejected or failed a statement
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    /// No live entry for the key (HTTP surface only; the store reports misses as `None`)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidKey(_) | CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Encode(_) | CacheError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
