//! Configuration file loading.

use super::CovgateConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = ".covgate.toml";

/// Load configuration.
///
/// An explicitly requested file must exist and parse; the default
/// `.covgate.toml` lookup is best-effort — a missing file means defaults,
/// and an unreadable or invalid one warns and falls back to defaults.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<CovgateConfig> {
    match explicit {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            parse_config(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))
        }
        None => Ok(try_load_config_from_path(&cwd.join(CONFIG_FILE_NAME)).unwrap_or_default()),
    }
}

/// Pure function to parse config from TOML contents.
pub fn parse_config(contents: &str) -> Result<CovgateConfig> {
    toml::from_str(contents).map_err(Into::into)
}

fn try_load_config_from_path(config_path: &Path) -> Option<CovgateConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // Only log actual errors, not "file not found".
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("failed to read {}: {}", config_path.display(), e);
            }
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            eprintln!(
                "Warning: invalid {}: {}. Using defaults.",
                config_path.display(),
                e
            );
            None
        }
    }
}
