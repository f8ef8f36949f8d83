use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::renderer::ReprOptions;

pub const APP_DIR: &str = "prettyrepr";
pub const CONFIG_FILE: &str = "config.json";

/// `<config dir>/prettyrepr/config.json`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Reads render options.
///
/// An explicit path must exist. Otherwise the default location is used when
/// present, and built-in defaults when not.
pub fn load_options(explicit: Option<&Path>) -> Result<ReprOptions> {
    if let Some(path) = explicit {
        return read_options(path);
    }

    match default_config_path() {
        Some(path) if path.is_file() => read_options(&path),
        _ => {
            debug!("no config file, using defaults");
            Ok(ReprOptions::default())
        }
    }
}

pub fn read_options(path: &Path) -> Result<ReprOptions> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let options = serde_json::from_str(&content)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    debug!(path = %path.display(), "loaded config");
    Ok(options)
}
