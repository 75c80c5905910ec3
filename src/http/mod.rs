//! HTTP REST adapter
//!
//! Depends only on core/.
//!
//! Serves the page index through a Bleve-compatible search route
//! plus a few read-only helpers via Axum web framework.

pub mod error;
pub mod handlers;
pub mod middleware;

pub use handlers::*;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::core::services::Services;

/// Build the API router over shared services
///
/// CORS is attached only when `server.cors` is enabled.
pub fn router(services: Arc<Services>) -> Router {
    let mut app = Router::new()
        // Health check endpoint
        .route("/health", get(health_handler))
        // Index endpoints
        .route("/api/:index", get(index_info_handler))
        .route("/api/:index/_count", get(count_handler))
        .route("/api/:index/_search", post(search_handler))
        .route("/api/:index/:doc_id", get(document_handler))
        .layer(axum_middleware::from_fn(middleware::log_request));

    if services.config.server.cors {
        app = app.layer(CorsLayer::permissive());
    }

    app.with_state(services)
}
