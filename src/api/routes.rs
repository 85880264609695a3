//! API Routes
//!
//! Configures the Axum router with all caching service endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    append_row_handler, delete_row_handler, health_handler, read_batch_handler,
    read_rows_handler, refresh_handler, stats_handler, update_row_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /tables/:resource/rows` - Cached range read (`?range=` optional)
/// - `POST /tables/:resource/rows` - Append a row, invalidating the cache
/// - `PUT /tables/:resource/rows/:index` - Update a row, invalidating the cache
/// - `DELETE /tables/:resource/rows/:index` - Delete a row, invalidating the cache
/// - `POST /tables/batch` - Coalesced multi-range read
/// - `POST /refresh` - Authenticated refetch-and-replace webhook
/// - `GET /stats` - Cache statistics
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

    // Build router with all endpoints
    Router::new()
        .route(
            "/tables/:resource/rows",
            get(read_rows_handler).post(append_row_handler),
        )
        .route(
            "/tables/:resource/rows/:index",
            put(update_row_handler).delete(delete_row_handler),
        )
        .route("/tables/batch", post(read_batch_handler))
        .route("/refresh", post(refresh_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
