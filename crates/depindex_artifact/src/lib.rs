//! Compiled interface artifacts: on-disk format, reading, writing, discovery.
//!
//! An artifact declares a module name and an import manifest of
//! `(name, optional digest)` pairs. The entry naming the unit itself carries
//! the unit's own digest; every other pinned entry is a dependency. This crate
//! turns artifact files into [`ArtifactRecord`]s for the dependency index and
//! expands root directories into candidate artifact paths.

#![warn(missing_docs)]

pub mod error;
pub mod expand;
pub mod format;
pub mod reader;
pub mod writer;

pub use error::ArtifactError;
pub use expand::expand_directories;
pub use format::{ImportEntry, InterfaceUnit};
pub use depindex_common::DEFAULT_EXTENSION;
pub use reader::{modification_time, ArtifactReader, ArtifactRecord, BinaryArtifactReader};
pub use writer::ArtifactWriter;
