//! HTTP API module for the status, health and documentation endpoints.

pub mod cors;
pub mod docs;
pub mod handlers;
pub mod routes;

pub use cors::CorsPolicy;
pub use handlers::AppState;
pub use routes::create_router;
