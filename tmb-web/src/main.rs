//! tmb-web - Topic model browser service
//!
//! Reads `info.json` synchronously at startup, then serves the view API while
//! the remaining model artifacts load in the background.

use std::fs::OpenOptions;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tmb_common::config::{load_toml_config, resolve_data_dir, LoggingConfig, DATA_DIR_ENV};
use tmb_common::events::EventBus;
use tmb_web::{build_router, loader};

/// Capacity of the artifact event channel
const EVENT_CAPACITY: usize = 32;

/// Command-line arguments for tmb-web
#[derive(Parser, Debug)]
#[command(name = "tmb-web")]
#[command(about = "Topic model browser service")]
#[command(version)]
struct Args {
    /// Bootstrap TOML file (default: <config dir>/tmb/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the model artifacts
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "TMB_PORT")]
    port: Option<u16>,

    /// Address to bind (overrides the config file)
    #[arg(short, long)]
    bind: Option<String>,
}

/// Install the tracing subscriber
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .context("Invalid log level")?;

    match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = load_toml_config(args.config.as_deref())
        .context("Failed to load configuration")?;
    init_tracing(&toml_config.logging)?;

    // Build identification, before any model data is touched
    info!(
        "Starting Topic Model Browser (tmb-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let data_dir = resolve_data_dir(args.data_dir.as_deref(), DATA_DIR_ENV, &toml_config);
    info!("Data directory: {}", data_dir.display());

    let state = match loader::bootstrap(&data_dir, EventBus::new(EVENT_CAPACITY)).await {
        Ok(state) => {
            info!("✓ Loaded info.json");
            state
        }
        Err(e) => {
            error!("Failed to load info.json: {}", e);
            return Err(e).context("Model info is required to start");
        }
    };

    // Background loads; handles are dropped, the tasks run to completion
    loader::spawn_artifact_loads(&state);

    let app = build_router(state);

    let bind = args.bind.unwrap_or(toml_config.bind);
    let port = args.port.unwrap_or(toml_config.port);
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("tmb-web listening on http://{}", addr);
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
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
