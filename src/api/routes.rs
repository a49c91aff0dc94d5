//! HTTP API route definitions.

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::cors::CorsPolicy;
use super::docs::swagger_ui;
use super::handlers::{health, not_found, root, AppState};
use crate::metrics::track_http_requests;

/// Create the API router.
///
/// The CORS layer wraps the whole router, fallback included, so pre-flight
/// requests are answered for any path. Requests without CORS headers skip it.
pub fn create_router(state: AppState, cors: &CorsPolicy) -> Router {
    let meta = state.meta;

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route_layer(middleware::from_fn(track_http_requests))
        .with_state(state)
        .merge(swagger_ui(&meta))
        .fallback(not_found)
        .layer(cors.layer())
        .layer(TraceLayer::new_for_http())
}
