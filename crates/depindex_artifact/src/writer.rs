//! Producing interface artifacts.

use std::path::Path;

use depindex_common::Digest;

use crate::error::ArtifactError;
use crate::format::{encode_unit, ImportEntry, InterfaceUnit};

/// Writes interface artifacts in the layout [`BinaryArtifactReader`] reads.
///
/// [`BinaryArtifactReader`]: crate::reader::BinaryArtifactReader
pub struct ArtifactWriter;

impl ArtifactWriter {
    /// Computes the digest a unit with this name and body is published under.
    pub fn unit_digest(name: &str, body: &[u8]) -> Digest {
        let mut bytes = Vec::with_capacity(name.len() + 1 + body.len());
        bytes.extend_from_slice(name.as_bytes());
        bytes.push(0);
        bytes.extend_from_slice(body);
        Digest::from_bytes(&bytes)
    }

    /// Writes an artifact for unit `name` to `path` and returns its digest.
    ///
    /// The self entry is written first, followed by `imports` in order.
    /// Parent directories must already exist.
    pub fn write(
        path: &Path,
        name: &str,
        body: &[u8],
        imports: &[ImportEntry],
    ) -> Result<Digest, ArtifactError> {
        let digest = Self::unit_digest(name, body);

        let mut entries = Vec::with_capacity(imports.len() + 1);
        entries.push(ImportEntry::pinned(name, digest));
        entries.extend_from_slice(imports);

        let unit = InterfaceUnit {
            name: name.to_string(),
            imports: entries,
            body: body.to_vec(),
        };
        let bytes = encode_unit(&unit)?;
        std::fs::write(path, bytes).map_err(|e| ArtifactError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), name, %digest, "wrote artifact");
        Ok(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_depends_on_body() {
        let a = ArtifactWriter::unit_digest("A", b"type t = int");
        let b = ArtifactWriter::unit_digest("A", b"type t = string");
        assert_ne!(a, b);
    }

    #[test]
    fn digest_depends_on_name() {
        assert_ne!(
            ArtifactWriter::unit_digest("A", b"x"),
            ArtifactWriter::unit_digest("B", b"x")
        );
    }

    #[test]
    fn name_and_body_are_separated() {
        assert_ne!(
            ArtifactWriter::unit_digest("ab", b"c"),
            ArtifactWriter::unit_digest("a", b"bc")
        );
    }

    #[test]
    fn write_returns_unit_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.ifc");
        let digest = ArtifactWriter::write(&path, "A", b"body", &[]).unwrap();
        assert_eq!(digest, ArtifactWriter::unit_digest("A", b"body"));
        assert!(path.exists());
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("a.ifc");
        let err = ArtifactWriter::write(&path, "A", b"body", &[]).unwrap_err();
        assert!(matches!(err, ArtifactError::Io { .. }));
    }
}
