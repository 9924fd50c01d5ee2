//! lateshow-api - HTTP server for the Late Show API
//!
//! Serves guests, episodes and rated appearances from a SQLite database.
//! The database is created with an empty schema on first run; use
//! `lateshow-seed` to load the sample data.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lateshow_api::{build_router, startup, AppState};
use lateshow_common::config::{resolve_database_path, resolve_port};
use lateshow_common::db::init_database;
use tokio::signal;
use tracing::{error, info};

/// Command-line arguments for lateshow-api
#[derive(Parser, Debug)]
#[command(name = "lateshow-api")]
#[command(about = "Late Show guests, episodes and appearances over HTTP")]
#[command(version)]
struct Args {
    /// SQLite database file (overrides LATESHOW_DATABASE and config file)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Port to listen on (overrides LATESHOW_PORT and config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: std::net::IpAddr,

    /// TOML config file (default: <config dir>/lateshow/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = startup::init(args.config.as_deref());
    startup::log_build_info("lateshow-api");

    let db_path = resolve_database_path(args.database.as_deref(), &config);
    let port = resolve_port(args.port, &config)?;
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let app = build_router(AppState::new(pool.clone()));

    let addr = SocketAddr::new(args.host, port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("lateshow-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
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
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
