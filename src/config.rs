//! Application configuration loaded from environment variables.

use std::net::SocketAddr;

use serde::Deserialize;
use url::Url;

use crate::api::cors::CorsPolicy;
use crate::error::{ConfigError, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Address the HTTP listener binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    // === CORS Policy ===
    /// Origins allowed to read responses from a browser (comma-separated).
    #[serde(default = "default_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,

    /// Methods allowed on cross-origin requests; `*` means all.
    #[serde(default = "default_wildcard")]
    pub cors_allow_methods: Vec<String>,

    /// Request headers allowed on cross-origin requests; `*` means all.
    #[serde(default = "default_wildcard")]
    pub cors_allow_headers: Vec<String>,

    /// Whether credentialed cross-origin requests may read responses.
    #[serde(default = "default_true")]
    pub cors_allow_credentials: bool,

    /// Seconds a browser may cache a pre-flight response.
    #[serde(default = "default_cors_max_age")]
    pub cors_max_age_secs: u64,

    // === Observability ===
    /// Port for the Prometheus exporter; disabled when unset.
    #[serde(default)]
    pub metrics_port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()] // Vite dev server
}

fn default_wildcard() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_cors_max_age() -> u64 {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_allowed_origins: default_allowed_origins(),
            cors_allow_methods: default_wildcard(),
            cors_allow_headers: default_wildcard(),
            cors_allow_credentials: default_true(),
            cors_max_age_secs: default_cors_max_age(),
            metrics_port: None,
            rust_log: default_log_level(),
            log_json: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        if self.metrics_port == Some(self.port) {
            return Err(ConfigError::MetricsPortCollision(self.port));
        }

        let origins = self.allowed_origins();
        if origins.is_empty() {
            return Err(ConfigError::NoOrigins);
        }

        for origin in origins {
            validate_origin(origin)?;
        }

        CorsPolicy::from_config(self)?;

        Ok(())
    }

    /// Allow-list entries with surrounding whitespace and empty items removed.
    pub fn allowed_origins(&self) -> Vec<&str> {
        self.cors_allowed_origins
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .collect()
    }

    /// Socket address for the API listener.
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        use std::net::ToSocketAddrs;

        (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::AddrNotAvailable,
                    format!("could not resolve {}:{}", self.host, self.port),
                )
                .into()
            })
    }
}

/// An origin is `scheme://host[:port]` exactly as a browser sends it.
fn validate_origin(origin: &str) -> std::result::Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidOrigin {
        origin: origin.to_string(),
        reason,
    };

    let url = Url::parse(origin).map_err(|e| invalid(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }

    let canonical = url.origin().ascii_serialization();
    if canonical != origin {
        return Err(invalid(format!("expected origin form {canonical:?}")));
    }

    Ok(())
}
