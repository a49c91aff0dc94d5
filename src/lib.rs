//! DeepBlocks API service.
//!
//! Backend bootstrap for the DeepBlocks visual ML editor. The service exposes
//! a status endpoint and a health endpoint behind a cross-origin policy that
//! lets the browser frontend read the responses:
//!
//! ```text
//! GET /        {"message": "DeepBlocks API is running", "version": "1.0.0", "docs": "/docs"}
//! GET /health  {"status": "healthy", "version": "1.0.0"}
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`metadata`]: Immutable service name, version and description
//! - [`api`]: HTTP router, handlers, CORS policy and OpenAPI docs
//! - [`metrics`]: Prometheus metrics for HTTP traffic
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metadata;
pub mod metrics;
pub mod utils;

pub use config::Config;
pub use error::{Result, ServiceError};
pub use metadata::ServiceMetadata;
