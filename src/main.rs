//! DeepBlocks API entry point.

use std::net::SocketAddr;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};

use deepblocks_api::api::{create_router, docs, AppState, CorsPolicy};
use deepblocks_api::config::Config;
use deepblocks_api::metadata::ServiceMetadata;
use deepblocks_api::metrics;
use deepblocks_api::utils::{init_logging, shutdown_signal};

/// Backend API for the DeepBlocks visual ML platform.
#[derive(Parser, Debug)]
#[command(name = "deepblocks-api")]
#[command(about = "Backend API for DeepBlocks visual ML platform")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    /// Address to bind (overrides HOST).
    #[arg(long, global = true)]
    host: Option<String>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Check configuration validity.
    CheckConfig,

    /// Print the OpenAPI document.
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load().context("failed to load configuration")?;

    // Override with CLI args if provided
    if let Some(host) = args.host.clone() {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    config.log_json |= args.json_logs;

    // Initialize logging
    init_logging(&config.rust_log, args.verbose, config.log_json);

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::Openapi) => cmd_openapi(),
        Some(Command::Serve) | None => cmd_serve(config).await,
    }
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("DEEPBLOCKS API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Listen: {}:{}", config.host, config.port);
    println!("  CORS Origins: {}", config.allowed_origins().join(", "));
    println!("  CORS Max Age: {}s", config.cors_max_age_secs);
    match config.metrics_port {
        Some(port) => println!("  Metrics Port: {}", port),
        None => println!("  Metrics: Disabled"),
    }
    println!("  Log Level: {}", config.rust_log);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Print the OpenAPI document as pretty JSON.
fn cmd_openapi() -> anyhow::Result<()> {
    println!("{}", docs::openapi_json(&ServiceMetadata::current())?);
    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let meta = ServiceMetadata::current();
    info!("Starting {} v{}", meta.name, meta.version);

    // Initialize metrics (recorder first so descriptions are kept)
    if let Some(metrics_port) = config.metrics_port {
        let metrics_addr = SocketAddr::new(config.listen_addr()?.ip(), metrics_port);
        metrics::install_exporter(metrics_addr).map_err(|e| {
            error!("Failed to start metrics exporter: {}", e);
            e
        })?;
    }
    metrics::init_metrics();

    let cors = CorsPolicy::from_config(&config)?;
    info!("CORS allowed origins: {}", config.allowed_origins().join(", "));

    let router = create_router(AppState::new(meta), &cors);

    // Start HTTP server
    let addr = config.listen_addr()?;
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind {}: {}", addr, e);
        e
    })?;
    info!("HTTP server listening on {}", addr);
    info!("API docs available at http://{}{}", addr, meta.docs_path);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
