//! Configuration file discovery and loading.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;
use super::validation::validate_config;
use crate::common::constants::*;

/// The directory holding `nerdshade.toml`.
///
/// A custom directory given with `--config` is used as-is; otherwise the
/// platform config directory (`$XDG_CONFIG_HOME` or `~/.config`) plus `nerdshade`.
pub fn get_config_dir(custom_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = custom_dir {
        return Ok(dir.to_path_buf());
    }
    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join(CONFIG_DIR_NAME))
}

/// Full path of the configuration file.
pub fn get_config_path(custom_dir: Option<&Path>) -> Result<PathBuf> {
    Ok(get_config_dir(custom_dir)?.join(CONFIG_FILE_NAME))
}

/// Parse the configuration file at `path`.
///
/// A missing file is not an error and yields an empty configuration, so all
/// defaults apply. The result is not validated; validation runs after the
/// command-line layer has been merged in.
pub fn load_from_path(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))?;

    Ok(config)
}

/// Load the configuration file from the default or custom directory.
pub fn load(custom_dir: Option<&Path>) -> Result<Config> {
    let config_path = get_config_path(custom_dir)?;
    load_from_path(&config_path)
}

/// Load the file layer, apply command-line overrides, and validate the result.
pub fn load_with_overrides(custom_dir: Option<&Path>, overrides: &Config) -> Result<Config> {
    let config = load(custom_dir)?.merge(overrides);
    validate_config(&config)?;
    Ok(config)
}
