//! Configuration loading and database location resolution
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the database location
pub const DATABASE_ENV: &str = "LATESHOW_DATABASE";
/// Environment variable overriding the listen port
pub const PORT_ENV: &str = "LATESHOW_PORT";

pub const DEFAULT_PORT: u16 = 5555;
pub const DEFAULT_LOG_FILTER: &str = "lateshow_api=info,lateshow_common=info,tower_http=info";

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub database: Option<PathBuf>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// Parse a TOML document
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load the config file, falling back to defaults on any problem
    ///
    /// `explicit` is the `--config` argument. Without it the platform config
    /// directory is tried, and a missing file there is not a problem. A
    /// missing or broken file is never fatal; the second element carries the
    /// reason so the caller can log it once tracing is set up.
    pub fn load_or_default(explicit: Option<&Path>) -> (Self, Option<String>) {
        let path = match explicit.map(Path::to_path_buf).or_else(default_config_path) {
            Some(path) => path,
            None => return (Self::default(), None),
        };

        if explicit.is_none() && !path.exists() {
            return (Self::default(), None);
        }

        match Self::load(&path) {
            Ok(config) => (config, None),
            Err(e) => (
                Self::default(),
                Some(format!("Ignoring config file {}: {}", path.display(), e)),
            ),
        }
    }
}

/// `<config dir>/lateshow/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lateshow").join("config.toml"))
}

/// `<local data dir>/lateshow/app.db`, or `./app.db` when the platform has none
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("lateshow").join("app.db"))
        .unwrap_or_else(|| PathBuf::from("app.db"))
}

/// Resolve the SQLite file location
pub fn resolve_database_path(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(DATABASE_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.database {
        return path.clone();
    }

    default_database_path()
}

/// Resolve the HTTP listen port
///
/// An unparsable environment value is reported as a configuration error
/// rather than silently ignored.
pub fn resolve_port(cli_arg: Option<u16>, config: &TomlConfig) -> Result<u16> {
    if let Some(port) = cli_arg {
        return Ok(port);
    }

    if let Ok(raw) = std::env::var(PORT_ENV) {
        return raw
            .trim()
            .parse::<u16>()
            .map_err(|_| Error::Config(format!("{} is not a valid port: {:?}", PORT_ENV, raw)));
    }

    Ok(config.port.unwrap_or(DEFAULT_PORT))
}

/// Tracing filter directive: `RUST_LOG` wins, then the config file, then the default
pub fn resolve_log_filter(config: &TomlConfig) -> String {
    std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}
