//! API Routes
//!
//! Configures the Axum router with all dashboard endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, create_handler, delete_handler, health_handler, invalidate_handler,
    list_handler, recent_handler, stats_handler, summary_handler, update_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/:resource` - List records (cached)
/// - `GET /api/:resource/recent/:days` - Records from the last N days (cached)
/// - `POST /api/:resource` - Create a record, invalidating its cached reads
/// - `PUT /api/:resource/:id` - Update a record, invalidating its cached reads
/// - `DELETE /api/:resource/:id` - Delete a record, invalidating its cached reads
/// - `GET /summary/financial` - Income/expense totals (cached)
/// - `POST /cache/invalidate` - Drop entries by key, prefix or pattern
/// - `DELETE /cache` - Drop every entry (sign-out)
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/:resource", get(list_handler).post(create_handler))
        .route("/api/:resource/recent/:days", get(recent_handler))
        .route("/api/:resource/:id", delete(delete_handler).put(update_handler))
        .route("/summary/financial", get(summary_handler))
        .route("/cache/invalidate", post(invalidate_handler))
        .route("/cache", delete(clear_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
