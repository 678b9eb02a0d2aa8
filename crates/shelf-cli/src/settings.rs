//! Layered runtime settings.
//!
//! Precedence, lowest first: built-in defaults, the optional TOML file,
//! `SHELF_*` environment variables, then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "https://openlibrary.org/search.json";

/// Resolved settings for one run of the tool.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
  #[serde(default = "default_database_path")]
  pub database_path: PathBuf,
  #[serde(default = "default_api_url")]
  pub api_url:       String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs:  u64,
}

fn default_database_path() -> PathBuf { PathBuf::from("shelf.db") }

fn default_api_url() -> String { DEFAULT_API_URL.to_owned() }

fn default_timeout_secs() -> u64 { 30 }

/// Values supplied on the command line; `None` leaves the lower layers alone.
#[derive(Debug, Default)]
pub struct Overrides {
  pub database_path: Option<PathBuf>,
  pub api_url:       Option<String>,
  pub timeout_secs:  Option<u64>,
}

impl Settings {
  pub fn load(file: Option<&Path>, overrides: Overrides) -> anyhow::Result<Self> {
    let mut builder = config::Config::builder();
    if let Some(path) = file {
      builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
      .add_source(config::Environment::with_prefix("SHELF"))
      .set_override_option(
        "database_path",
        overrides.database_path.map(|p| p.to_string_lossy().into_owned()),
      )?
      .set_override_option("api_url", overrides.api_url)?
      .set_override_option("timeout_secs", overrides.timeout_secs)?
      .build()
      .context("failed to read configuration")?;

    settings
      .try_deserialize()
      .context("failed to deserialise settings")
  }
}
