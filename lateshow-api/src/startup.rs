//! Process setup shared by the server and seed binaries

use lateshow_common::config::{resolve_log_filter, TomlConfig};
use std::path::Path;
use tracing::{info, warn};

/// Load the optional config file and install the tracing subscriber
///
/// The config file is read first because it may carry the log level;
/// anything wrong with it is logged once the subscriber is up.
pub fn init(config_arg: Option<&Path>) -> TomlConfig {
    let (config, warning) = TomlConfig::load_or_default(config_arg);

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(resolve_log_filter(&config)))
        .init();

    if let Some(warning) = warning {
        warn!("{}", warning);
    }

    config
}

/// Log build identification immediately after tracing init
pub fn log_build_info(binary: &str) {
    let profile = if cfg!(debug_assertions) { "debug" } else { "release" };
    info!(
        "Starting {} v{} ({}, {} build, {})",
        binary,
        env!("CARGO_PKG_VERSION"),
        env!("LATESHOW_GIT_DESCRIBE"),
        profile,
        env!("LATESHOW_BUILT_AT")
    );
}
