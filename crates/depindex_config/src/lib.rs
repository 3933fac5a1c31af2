//! Parsing and validation of `depindex.toml` configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`IndexConfig`] naming the artifact root directories, the recognized
//! artifact extension and the default log filter.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{find_config, load_config, load_config_file, load_config_from_str, CONFIG_FILE};
pub use types::*;
