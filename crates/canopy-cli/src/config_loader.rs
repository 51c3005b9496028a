//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use canopy_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "canopy.toml";

/// Resolve defaults, the config file, `CANOPY_*` variables and CLI overrides
pub fn load_config(path: Option<&Path>, overrides: CliConfigOverrides) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    match config_path(path) {
        Some(file) => {
            tracing::debug!(path = %file.display(), "Loading configuration file");
            config = config
                .load_from_file(&file)
                .with_context(|| format!("Failed to load configuration from {}", file.display()))?;
        }
        None => tracing::debug!("No configuration file, using defaults"),
    }

    let mut config = config.load_from_env();
    config.update_from_cli(overrides);
    Ok(config)
}

/// An explicit path always wins; otherwise `./canopy.toml` if it exists
fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
    fallback.is_file().then_some(fallback)
}
