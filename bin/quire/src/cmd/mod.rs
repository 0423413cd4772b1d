//! CLI command implementations.

pub mod build;
pub mod check;
pub mod new;

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use quire_core::Config;

/// Load the configuration with `QUIRE__*` environment overrides.
pub(crate) fn load_config(config_path: &Path) -> Result<Config> {
    let config = Config::load_with_env(config_path)
        .wrap_err_with(|| format!("Failed to load configuration from {}", config_path.display()))?;
    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Directory holding the configuration file; relative site paths resolve against it.
pub(crate) fn site_root(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

/// Resolve a configured directory against the site root unless it is absolute.
pub(crate) fn resolve_dir(root: &Path, dir: impl AsRef<Path>) -> PathBuf {
    let dir = dir.as_ref();
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        root.join(dir)
    }
}
