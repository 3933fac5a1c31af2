//! Reading artifact manifests into index records.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use depindex_common::{Digest, DEFAULT_EXTENSION};

use crate::error::ArtifactError;
use crate::format::decode_unit;

/// What the index knows about one artifact on disk.
///
/// `digest` is the identity key; `path` is also unique among live records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRecord {
    /// Module name declared by the artifact.
    pub name: String,

    /// Filesystem path the artifact was read from.
    pub path: PathBuf,

    /// Modification time observed when the artifact was read.
    pub mtime: SystemTime,

    /// The artifact's own content digest.
    pub digest: Digest,

    /// Digests of the units this artifact depends on, in manifest order.
    pub deps: Vec<Digest>,
}

/// Source of [`ArtifactRecord`]s for the staleness scanner.
pub trait ArtifactReader {
    /// File extension (without the dot) of the artifacts this reader understands.
    fn extension(&self) -> &str;

    /// Reads one artifact, capturing its modification time at read time.
    fn read(&self, path: &Path) -> Result<ArtifactRecord, ArtifactError>;
}

/// Reader for the binary artifact layout defined in [`crate::format`].
#[derive(Debug, Clone)]
pub struct BinaryArtifactReader {
    extension: String,
}

impl BinaryArtifactReader {
    /// Creates a reader recognizing the given extension.
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }
}

impl Default for BinaryArtifactReader {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}

impl ArtifactReader for BinaryArtifactReader {
    fn extension(&self) -> &str {
        &self.extension
    }

    fn read(&self, path: &Path) -> Result<ArtifactRecord, ArtifactError> {
        let io_err = |source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        };

        // One handle for both the mtime and the contents; dropped on every return.
        let mut file = File::open(path).map_err(io_err)?;
        let mtime = file.metadata().and_then(|m| m.modified()).map_err(io_err)?;
        let mut raw = Vec::new();
        file.read_to_end(&mut raw).map_err(io_err)?;
        drop(file);

        let unit = decode_unit(path, &raw)?;
        let digest = unit
            .self_digest()
            .ok_or_else(|| ArtifactError::MalformedArtifact {
                path: path.to_path_buf(),
                name: unit.name.clone(),
            })?;
        let deps = unit.dependency_digests();

        Ok(ArtifactRecord {
            name: unit.name,
            path: path.to_path_buf(),
            mtime,
            digest,
            deps,
        })
    }
}

/// Returns the current modification time of `path`, or `None` if it cannot
/// be determined.
///
/// `None` never equals a recorded modification time, so a path that fails to
/// stat always compares as changed.
pub fn modification_time(path: &Path) -> Option<SystemTime> {
    match std::fs::metadata(path).and_then(|m| m.modified()) {
        Ok(mtime) => Some(mtime),
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "stat failed");
            None
        }
    }
}
