//! CLI command implementations

pub mod args;
pub mod check;
pub mod init;
pub mod plugins;
pub mod run_plugins;
pub mod show;

use milkee_core::config::LoadedConfig;
use std::path::Path;

/// Load the configuration named on the command line, or discover one
pub fn load(path: Option<&Path>) -> milkee_core::Result<LoadedConfig> {
    let loaded = LoadedConfig::load(path)?;
    tracing::debug!(path = %loaded.path.display(), "Using configuration");
    Ok(loaded)
}
