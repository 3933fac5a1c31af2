//! Errors raised while loading `depindex.toml`.

use std::path::PathBuf;

/// Errors that can occur when loading or validating a configuration.
///
/// Every variant raised after the file was read names that file, so callers
/// can print the error as is. Configurations parsed from a string carry no
/// path.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The content is not TOML, or does not have the expected tables.
    #[error("{}invalid configuration: {message}", origin(.path))]
    Parse {
        /// The configuration file, when loaded from disk.
        path: Option<PathBuf>,
        /// The TOML parser's message.
        message: String,
    },

    /// `[index] roots` is empty or lists a blank directory.
    #[error("{}index.roots must list at least one non-empty directory", origin(.path))]
    EmptyRoots {
        /// The configuration file, when loaded from disk.
        path: Option<PathBuf>,
    },

    /// `[index] extension` is empty or written with its leading dot.
    #[error(
        "{}index.extension '{extension}' must be non-empty and given without the leading '.'",
        origin(.path)
    )]
    BadExtension {
        /// The configuration file, when loaded from disk.
        path: Option<PathBuf>,
        /// The rejected extension.
        extension: String,
    },
}

fn origin(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!("{}: ", path.display()),
        None => String::new(),
    }
}
