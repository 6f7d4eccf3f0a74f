//! Configuration loading
//!
//! Resolves the effective [`Config`] from defaults, the TOML config file and
//! command-line overrides, in that order.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

pub use types::{AiConfig, Config, PartialAiConfig, PartialConfig};

use crate::error::ConfigError;

const CONFIG_DIR: &str = "commit-whisper";
const CONFIG_FILE: &str = "config.toml";

/// Default location of the config file (`~/.config/commit-whisper/config.toml`)
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".config").join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Parse config file contents into a partial configuration
pub fn parse_partial(content: &str, path: &Path) -> Result<PartialConfig, ConfigError> {
    toml::from_str::<PartialConfig>(content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}

/// Read a config file; a missing file yields `Ok(None)`
pub fn load_partial_from_path(path: &Path) -> Result<Option<PartialConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No config file at {}", path.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    parse_partial(&content, path).map(Some)
}

/// Build the effective configuration
///
/// `path` overrides the default config location. `overrides` (typically
/// from command-line flags) are merged last and win over the file.
pub fn load_config(path: Option<&Path>, overrides: PartialConfig) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    let path = path.map(Path::to_path_buf).or_else(config_path);
    if let Some(path) = path
        && let Some(partial) = load_partial_from_path(&path)?
    {
        config.merge(partial);
    }

    config.merge(overrides);
    Ok(config)
}

/// Write the default configuration to `path` unless a file already exists
///
/// Returns `true` when a new file was written.
pub fn write_default_config(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }

    let rendered = toml::to_string_pretty(&Config::default())
        .map_err(|e| ConfigError::Serialize(e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, rendered).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(true)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
