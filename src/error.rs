//! Unified error types for the service.

use thiserror::Error;

/// Unified error type for the service.
///
/// Request handlers are infallible; these errors only occur while the
/// process is starting up or binding its listeners.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration could not be read from the environment.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration was read but is not usable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Prometheus exporter could not be installed.
    #[error("metrics exporter error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The CORS allow-list is empty.
    #[error("CORS_ALLOWED_ORIGINS must contain at least one origin")]
    NoOrigins,

    /// An allow-list entry is not a valid origin.
    #[error("invalid CORS origin {origin:?}: {reason}")]
    InvalidOrigin {
        /// The rejected entry.
        origin: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A CORS method entry is not a valid HTTP method.
    #[error("invalid CORS method {0:?}")]
    InvalidMethod(String),

    /// A CORS header entry is not a valid header name.
    #[error("invalid CORS header {0:?}")]
    InvalidHeader(String),

    /// Listen port is zero.
    #[error("PORT must be non-zero")]
    InvalidPort,

    /// Metrics exporter would collide with the API listener.
    #[error("METRICS_PORT {0} collides with PORT")]
    MetricsPortCollision(u16),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;
