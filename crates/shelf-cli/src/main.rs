//! `shelf` — interactive book catalog backed by Open Library and SQLite.
//!
//! # Usage
//!
//! ```
//! shelf --database ~/books.db
//! shelf --config shelf.toml --timeout-secs 10
//! ```

mod client;
mod menu;
mod settings;

use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use client::{ClientConfig, OpenLibraryClient};
use menu::Menu;
use settings::{Overrides, Settings};
use shelf_store_sqlite::SqliteStore;
use tokio::io::BufReader;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "shelf", version, about = "Search Open Library and browse a local book catalog")]
struct Cli {
  /// Path to a TOML config file (database_path, api_url, timeout_secs).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// SQLite database file (default: shelf.db).
  #[arg(long, value_name = "PATH")]
  database: Option<PathBuf>,

  /// Search endpoint URL.
  #[arg(long)]
  api_url: Option<String>,

  /// HTTP request timeout in seconds.
  #[arg(long)]
  timeout_secs: Option<u64>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so stdout carries only menu output.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = Settings::load(cli.config.as_deref(), Overrides {
    database_path: cli.database,
    api_url:       cli.api_url,
    timeout_secs:  cli.timeout_secs,
  })?;

  let store = SqliteStore::open(&settings.database_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.database_path))?;
  info!(path = %settings.database_path.display(), "opened catalog store");

  let source = OpenLibraryClient::new(ClientConfig {
    base_url: settings.api_url.clone(),
    timeout:  Duration::from_secs(settings.timeout_secs),
  })?;
  info!(url = %settings.api_url, "using search endpoint");

  let mut input = BufReader::new(tokio::io::stdin());
  let mut output = std::io::stdout();
  Menu::new(&store, &source)
    .run(&mut input, &mut output)
    .await
    .context("terminal I/O failed")?;

  Ok(())
}
