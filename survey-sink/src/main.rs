//! survey-sink - Survey submission endpoint
//!
//! Accepts survey submissions over HTTP and appends them as rows to a flat
//! response table. Also serves read-only browsing and simple counts.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use survey_common::config::{resolve_config_path, SinkConfig};
use survey_sink::{build_router, db, AppState};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for survey-sink
#[derive(Parser, Debug)]
#[command(name = "survey-sink")]
#[command(about = "Survey submission sink")]
#[command(version)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "SURVEY_SINK_PORT")]
    port: Option<u16>,

    /// Address to bind (overrides config)
    #[arg(long, env = "SURVEY_SINK_BIND")]
    bind: Option<String>,

    /// Response database path (overrides config)
    #[arg(short, long, env = "SURVEY_SINK_DATABASE")]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing starts because it carries the log level
    let config_path = resolve_config_path(args.config.as_deref());
    let mut config = SinkConfig::load_or_default(config_path.as_deref())
        .context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!(
        "Starting survey-sink v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config_path {
        Some(path) if path.exists() => info!("Configuration: {}", path.display()),
        _ => info!("Configuration: compiled defaults"),
    }

    // CLI overrides
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    if let Some(database) = args.database {
        config.database_path = database;
    }

    info!("Database path: {}", config.database_path.display());
    let pool = db::init_store(&config.database_path)
        .await
        .context("Failed to open response store")?;

    let schema = db::ensure_schema(&pool, &config.schema.column_schema())
        .await
        .context("Failed to ensure header row")?;
    info!("✓ Response table ready ({} columns)", schema.len());

    let state = AppState::new(pool, schema, config.summary.columns.clone());
    let app = build_router(state);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("survey-sink listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
