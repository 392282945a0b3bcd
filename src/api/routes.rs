//! API Routes
//!
//! Configures the Axum router with all cache endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_handler, clear_handler, delete_handler, delete_many_handler, exists_handler,
    get_handler, get_many_handler, health_handler, set_handler, set_many_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET|PUT|DELETE /cache/:key` - Get, set or delete one entry
/// - `POST /cache/:key/add` - Store only if no live entry exists
/// - `GET /cache/:key/exists` - Liveness check
/// - `DELETE /cache` - Remove every entry
/// - `POST /batch/get`, `PUT /batch/set`, `POST /batch/delete` - Bulk operations
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/cache/:key",
            get(get_handler).put(set_handler).delete(delete_handler),
        )
        .route("/cache/:key/add", post(add_handler))
        .route("/cache/:key/exists", get(exists_handler))
        .route("/cache", delete(clear_handler))
        .route("/batch/get", post(get_many_handler))
        .route("/batch/set", put(set_many_handler))
        .route("/batch/delete", post(delete_many_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
