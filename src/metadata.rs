//! Service metadata fixed at compile time.

/// Name, version and description of the running service.
///
/// Values are `'static` and never change after startup, so the struct is
/// `Copy` and handed to the router state by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceMetadata {
    /// Human-readable service name.
    pub name: &'static str,
    /// Version string reported by every endpoint.
    pub version: &'static str,
    /// One-line description used in the OpenAPI document.
    pub description: &'static str,
    /// Path where the interactive API docs are served.
    pub docs_path: &'static str,
}

impl ServiceMetadata {
    /// Metadata of this build.
    pub const fn current() -> Self {
        Self {
            name: "DeepBlocks API",
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            docs_path: DOCS_PATH,
        }
    }

    /// Status line returned by `GET /`.
    pub fn running_message(&self) -> String {
        format!("{} is running", self.name)
    }
}

impl Default for ServiceMetadata {
    fn default() -> Self {
        Self::current()
    }
}

/// Swagger UI mount point.
pub const DOCS_PATH: &str = "/docs";

/// OpenAPI document path.
pub const OPENAPI_PATH: &str = "/openapi.json";
