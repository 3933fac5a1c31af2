//! Configuration file discovery, loading and validation.

use crate::error::ConfigError;
use crate::types::IndexConfig;
use std::path::{Path, PathBuf};

/// File name of the configuration file.
pub const CONFIG_FILE: &str = "depindex.toml";

/// Walks up from `start` looking for the nearest directory containing `depindex.toml`.
///
/// Returns the path of the configuration file, or `None` if there is none.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Loads and validates the configuration in `<dir>/depindex.toml`.
pub fn load_config(dir: &Path) -> Result<IndexConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE))
}

/// Loads and validates a configuration file at an explicit path.
///
/// Errors name `path`.
pub fn load_config_file(path: &Path) -> Result<IndexConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, Some(path))
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<IndexConfig, ConfigError> {
    parse_config(content, None)
}

fn parse_config(content: &str, path: Option<&Path>) -> Result<IndexConfig, ConfigError> {
    let config: IndexConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
        path: path.map(Path::to_path_buf),
        message: e.to_string().trim_end().to_string(),
    })?;
    validate_config(&config, path)?;
    Ok(config)
}

/// Checks the values serde cannot: non-blank roots and a bare extension.
fn validate_config(config: &IndexConfig, path: Option<&Path>) -> Result<(), ConfigError> {
    let path = || path.map(Path::to_path_buf);
    if config.index.roots.is_empty() || config.index.roots.iter().any(|r| r.trim().is_empty()) {
        return Err(ConfigError::EmptyRoots { path: path() });
    }
    let ext = &config.index.extension;
    if ext.is_empty() || ext.starts_with('.') {
        return Err(ConfigError::BadExtension {
            path: path(),
            extension: ext.clone(),
        });
    }
    Ok(())
}
