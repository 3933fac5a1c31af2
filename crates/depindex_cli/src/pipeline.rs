//! Shared helpers for CLI commands.
//!
//! Locates and loads `depindex.toml`, installs the log subscriber, resolves
//! the directories to scan and builds a fresh index from them.

use std::path::{Path, PathBuf};

use depindex_artifact::{BinaryArtifactReader, DEFAULT_EXTENSION};
use depindex_config::{IndexConfig, DEFAULT_LOG_FILTER};
use depindex_core::{DigestIndex, UpdateSummary};
use tracing_subscriber::EnvFilter;

use crate::GlobalArgs;

/// A loaded configuration together with the directory it was read from.
pub struct LocatedConfig {
    /// The parsed configuration.
    pub config: IndexConfig,
    /// Directory containing the configuration file; roots are relative to it.
    pub base_dir: PathBuf,
}

/// Loads the configuration named by `--config`, or the nearest `depindex.toml`
/// above the current directory.
///
/// An explicit `--config` that cannot be loaded is an error; a missing
/// implicit one is not.
pub fn locate_config(
    global: &GlobalArgs,
) -> Result<Option<LocatedConfig>, Box<dyn std::error::Error>> {
    let path = match global.config {
        Some(ref explicit) => {
            if explicit.is_dir() {
                explicit.join(depindex_config::CONFIG_FILE)
            } else {
                explicit.clone()
            }
        }
        None => match depindex_config::find_config(&std::env::current_dir()?) {
            Some(found) => found,
            None => return Ok(None),
        },
    };

    let config = depindex_config::load_config_file(&path)?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(Some(LocatedConfig { config, base_dir }))
}

/// Returns the log filter directive to use when `RUST_LOG` is not set.
pub fn log_directive(global: &GlobalArgs, located: Option<&LocatedConfig>) -> String {
    if global.verbose {
        "debug".to_string()
    } else if global.quiet {
        "error".to_string()
    } else {
        located
            .map(|l| l.config.log.filter.clone())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` takes precedence over flags and configuration.
pub fn init_logging(global: &GlobalArgs, located: Option<&LocatedConfig>) {
    let directive = log_directive(global, located);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Resolves the directories to scan: command-line directories win over the
/// configured roots.
pub fn resolve_roots(
    dirs: &[PathBuf],
    located: Option<&LocatedConfig>,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    if !dirs.is_empty() {
        return Ok(dirs.to_vec());
    }
    match located {
        Some(l) => Ok(l.config.index.resolved_roots(&l.base_dir)),
        None => Err(format!(
            "no directories given and no {} found in the current directory or any parent",
            depindex_config::CONFIG_FILE
        )
        .into()),
    }
}

/// Returns the artifact extension from the configuration, or the default.
pub fn extension(located: Option<&LocatedConfig>) -> &str {
    located
        .map(|l| l.config.index.extension.as_str())
        .unwrap_or(DEFAULT_EXTENSION)
}

/// Builds a fresh index over the resolved directories.
pub fn build_index(
    dirs: &[PathBuf],
    located: Option<&LocatedConfig>,
) -> Result<(DigestIndex, UpdateSummary), Box<dyn std::error::Error>> {
    let roots = resolve_roots(dirs, located)?;
    let reader = BinaryArtifactReader::new(extension(located));
    let mut index = DigestIndex::new();
    let summary = index.update(&reader, &roots);
    Ok((index, summary))
}
