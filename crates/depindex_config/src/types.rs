//! Configuration types deserialized from `depindex.toml`.

use depindex_common::DEFAULT_EXTENSION;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

/// Default log filter when `[log] filter` is not given.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// The top-level configuration parsed from `depindex.toml`.
#[derive(Debug, Deserialize)]
pub struct IndexConfig {
    /// Where artifacts live and how they are recognized.
    pub index: IndexSection,
    /// Logging settings.
    #[serde(default)]
    pub log: LogSection,
}

/// The `[index]` table.
#[derive(Debug, Deserialize)]
pub struct IndexSection {
    /// Directories scanned for artifacts, relative to the config file's directory.
    ///
    /// Accepts either a single string or a list of strings.
    #[serde(deserialize_with = "one_or_many")]
    pub roots: Vec<String>,
    /// Artifact file extension, without the leading dot.
    #[serde(default = "default_extension")]
    pub extension: String,
}

/// The `[log]` table.
#[derive(Debug, Deserialize)]
pub struct LogSection {
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl IndexSection {
    /// Returns the root directories resolved against `base`.
    ///
    /// Absolute roots are returned unchanged.
    pub fn resolved_roots(&self, base: &Path) -> Vec<PathBuf> {
        self.roots.iter().map(|root| base.join(root)).collect()
    }
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// `roots` as written in the file: one directory or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum RootsValue {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RootsValue::deserialize(deserializer)? {
        RootsValue::One(root) => vec![root],
        RootsValue::Many(roots) => roots,
    })
}
