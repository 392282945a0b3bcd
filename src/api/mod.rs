//! API Module
//!
//! HTTP handlers and routing exposing the cache as a JSON API.
//!
//! # Endpoints
//! - `GET /cache/:key` - Retrieve a value by key
//! - `PUT /cache/:key` - Store a value
//! - `POST /cache/:key/add` - Store a value only if the key is free
//! - `DELETE /cache/:key` - Delete a key
//! - `GET /cache/:key/exists` - Check for a live entry
//! - `DELETE /cache` - Clear the table
//! - `POST /batch/get`, `PUT /batch/set`, `POST /batch/delete` - Bulk operations
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
