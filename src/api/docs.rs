//! OpenAPI document and Swagger UI.

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{self, ErrorResponse, HealthResponse, HealthStatus, RootResponse};
use crate::error::Result;
use crate::metadata::{ServiceMetadata, OPENAPI_PATH};

#[derive(OpenApi)]
#[openapi(
    paths(handlers::root, handlers::health),
    components(schemas(RootResponse, HealthResponse, HealthStatus, ErrorResponse)),
    tags(
        (name = "Service", description = "Service status"),
        (name = "Observability", description = "Liveness probing"),
    )
)]
pub struct ApiDoc;

/// OpenAPI document with `info` filled from the service metadata.
pub fn openapi(meta: &ServiceMetadata) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = meta.name.to_string();
    doc.info.version = meta.version.to_string();
    doc.info.description = Some(meta.description.to_string());
    doc
}

/// [`openapi`] rendered as pretty-printed JSON.
pub fn openapi_json(meta: &ServiceMetadata) -> Result<String> {
    Ok(serde_json::to_string_pretty(&openapi(meta))?)
}

/// Swagger UI mounted at the docs path, backed by [`openapi`].
pub fn swagger_ui(meta: &ServiceMetadata) -> SwaggerUi {
    SwaggerUi::new(meta.docs_path).url(OPENAPI_PATH, openapi(meta))
}
