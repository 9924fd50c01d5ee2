//! lateshow-seed - one-shot sample data loader
//!
//! Wipes guests, episodes and appearances, then inserts ten of each.
//!
//! **Usage:**
//! ```bash
//! lateshow-seed [--database <file>] [--config <file>]
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lateshow_api::startup;
use lateshow_common::config::resolve_database_path;
use lateshow_common::db::{init_database, seed_database};
use tracing::info;

/// Sample data loader
#[derive(Parser, Debug)]
#[command(name = "lateshow-seed")]
#[command(about = "Clear the Late Show database and load sample data")]
struct Args {
    /// SQLite database file (overrides LATESHOW_DATABASE and config file)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = startup::init(args.config.as_deref());
    startup::log_build_info("lateshow-seed");

    let db_path = resolve_database_path(args.database.as_deref(), &config);
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path)
        .await
        .context("Failed to open database")?;

    let summary = seed_database(&pool)
        .await
        .context("Error seeding the database")?;

    info!(
        "✓ Seeded {} guests, {} episodes, {} appearances",
        summary.guests, summary.episodes, summary.appearances
    );

    pool.close().await;
    Ok(())
}
