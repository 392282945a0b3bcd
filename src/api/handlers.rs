//! API Handlers
//!
//! HTTP request handlers exposing the cache operations as JSON endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::{CacheStore, GetMany};
use crate::error::{CacheError, Result};
use crate::models::{
    AddResponse, ClearResponse, DeleteManyResponse, DeleteResponse, ExistsResponse,
    GetManyResponse, GetResponse, HealthResponse, KeysRequest, SetManyRequest, SetRequest,
    SetManyResponse, SetResponse,
};

/// Application state shared across all handlers.
///
/// `CacheStore` is cheap to clone; the pool inside is shared.
#[derive(Clone)]
pub struct AppState {
    pub cache: CacheStore,
}

impl AppState {
    /// Creates a new AppState with the given cache store.
    pub fn new(cache: CacheStore) -> Self {
        Self { cache }
    }
}

/// Handler for GET /cache/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get::<Value>(&key).await? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for PUT /cache/:key
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    let timeout = req.timeout().map_err(CacheError::InvalidRequest)?;
    state.cache.set(&key, &req.value, timeout).await?;

    Ok(Json(SetResponse::new(key)))
}

/// Handler for POST /cache/:key/add
pub async fn add_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<SetRequest>,
) -> Result<Json<AddResponse>> {
    let timeout = req.timeout().map_err(CacheError::InvalidRequest)?;
    let added = state.cache.add(&key, &req.value, timeout).await?;

    Ok(Json(AddResponse { key, added }))
}

/// Handler for DELETE /cache/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let deleted = state.cache.delete(&key).await?;

    Ok(Json(DeleteResponse { key, deleted }))
}

/// Handler for GET /cache/:key/exists
pub async fn exists_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ExistsResponse>> {
    let exists = state.cache.has_key(&key).await?;

    Ok(Json(ExistsResponse { key, exists }))
}

/// Handler for POST /batch/get
pub async fn get_many_handler(
    State(state): State<AppState>,
    Json(req): Json<KeysRequest>,
) -> Result<Json<GetManyResponse>> {
    let GetMany { values, errors } = state.cache.get_many::<Value, _>(&req.keys).await?;

    Ok(Json(GetManyResponse {
        values,
        errors: errors
            .into_iter()
            .map(|(key, err)| (key, err.to_string()))
            .collect(),
    }))
}

/// Handler for PUT /batch/set
pub async fn set_many_handler(
    State(state): State<AppState>,
    Json(req): Json<SetManyRequest>,
) -> Result<Json<SetManyResponse>> {
    let timeout = req.timeout().map_err(CacheError::InvalidRequest)?;
    state.cache.set_many(&req.items, timeout).await?;

    Ok(Json(SetManyResponse {
        stored: req.items.len(),
    }))
}

/// Handler for POST /batch/delete
pub async fn delete_many_handler(
    State(state): State<AppState>,
    Json(req): Json<KeysRequest>,
) -> Result<Json<DeleteManyResponse>> {
    let deleted = state.cache.delete_many(&req.keys).await?;

    Ok(Json(DeleteManyResponse { deleted }))
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
    state.cache.clear().await?;

    Ok(Json(ClearResponse::cleared()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
