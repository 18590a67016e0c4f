//! Binary entry point that glues the SQLite-backed blob store to the TUI: we
//! resolve the configuration, start file logging, hydrate the catalog and
//! drive the Ratatui event loop until the user exits.
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use library_catalog::config::{Config, StorageMode, LOG_LEVEL_ENV};
use library_catalog::{ensure_schema, open_in_memory, run_app, App, SqliteBlobStore};

#[derive(Parser, Debug)]
#[command(name = "library-catalog", about = "Browse and curate a small book catalog")]
struct CliArgs {
    /// Directory holding the catalog database and log file.
    #[clap(long)]
    data_dir: Option<PathBuf>,

    /// Path to the SQLite blob store, overriding the one in the data directory.
    #[clap(long)]
    db_file: Option<PathBuf>,

    /// Path to the log file, overriding the one in the data directory.
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to disk except logs.
    #[clap(long)]
    ephemeral: bool,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    let config = Config::resolve(
        cli_args.data_dir,
        cli_args.db_file,
        cli_args.log_file,
        cli_args.ephemeral,
    )?;

    init_logging(&config.log_file)?;

    let conn = match &config.storage {
        StorageMode::File(path) => {
            info!("Opening catalog database at {:?}", path);
            ensure_schema(path).context("failed to open catalog database")?
        }
        StorageMode::Ephemeral => {
            info!("Running with an in-memory catalog");
            open_in_memory().context("failed to open in-memory database")?
        }
    };

    let mut app = App::new(SqliteBlobStore::new(conn))?;
    info!(books = app.catalog().len(), "Catalog ready");
    run_app(&mut app)
}

/// Send tracing output to `log_file`; the terminal itself belongs to the UI.
fn init_logging(log_file: &Path) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("failed to create log directory")?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var(LOG_LEVEL_ENV)
                .from_env_lossy(),
        )
        .try_init()
        .context("failed to install log subscriber")
}
