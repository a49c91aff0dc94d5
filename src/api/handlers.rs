//! HTTP API handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::metadata::ServiceMetadata;

/// Application state shared with handlers.
///
/// Holds only immutable values, so cloning it per request is free of
/// synchronization.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppState {
    /// Service name and version.
    pub meta: ServiceMetadata,
}

impl AppState {
    /// Create new app state.
    pub fn new(meta: ServiceMetadata) -> Self {
        Self { meta }
    }
}

/// Root status response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RootResponse {
    /// Status line, e.g. "DeepBlocks API is running".
    #[schema(example = "DeepBlocks API is running")]
    pub message: String,
    /// Service version.
    #[schema(example = "1.0.0")]
    pub version: String,
    /// Path of the interactive API docs.
    #[schema(example = "/docs")]
    pub docs: String,
}

/// Liveness indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Operating normally.
    Healthy,
}

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "healthy" while the process serves requests.
    pub status: HealthStatus,
    /// Service version.
    #[schema(example = "1.0.0")]
    pub version: String,
}

/// Body returned for unknown paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Short reason phrase.
    #[schema(example = "Not Found")]
    pub detail: String,
}

/// Root handler - reports that the service is up and where the docs live.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is running", body = RootResponse)
    ),
    tag = "Service"
)]
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: state.meta.running_message(),
        version: state.meta.version.to_string(),
        docs: state.meta.docs_path.to_string(),
    })
}

/// Health check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "Observability"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: state.meta.version.to_string(),
    })
}

/// Fallback for paths with no registered route.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            detail: "Not Found".to_string(),
        }),
    )
}
