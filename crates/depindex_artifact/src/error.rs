//! Error types for artifact reading and writing.

use std::path::PathBuf;

use depindex_common::Digest;

/// Errors that can occur while reading or writing an interface artifact.
///
/// Reading is fail-safe at the batch level: the index downgrades every one of
/// these to "this path yields no record" and moves on to the next candidate.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// An I/O error occurred while opening, stat-ing or reading an artifact.
    #[error("artifact I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The artifact file has an invalid or missing header.
    #[error("invalid artifact header in {path}: {reason}")]
    InvalidHeader {
        /// The artifact file path.
        path: PathBuf,
        /// Description of the header problem.
        reason: String,
    },

    /// The stored checksum does not match the computed checksum of the payload.
    #[error("checksum mismatch in {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The artifact file path.
        path: PathBuf,
        /// The checksum recorded in the header.
        expected: Digest,
        /// The checksum computed from the payload.
        actual: Digest,
    },

    /// The artifact format version does not match the current version.
    #[error("version mismatch in {path}: expected {expected}, got {actual}")]
    VersionMismatch {
        /// The artifact file path.
        path: PathBuf,
        /// The expected format version.
        expected: u32,
        /// The format version found in the file.
        actual: u32,
    },

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },

    /// The unit's manifest does not carry a digest for the unit itself.
    #[error("malformed artifact {path}: no digest recorded for unit '{name}'")]
    MalformedArtifact {
        /// The artifact file path.
        path: PathBuf,
        /// The unit name declared by the artifact.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = ArtifactError::Io {
            path: PathBuf::from("/tmp/lib/foo.ifc"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("artifact I/O error"));
        assert!(msg.contains("foo.ifc"));
    }

    #[test]
    fn checksum_mismatch_display() {
        let expected = Digest::from_bytes(b"expected");
        let actual = Digest::from_bytes(b"actual");
        let err = ArtifactError::ChecksumMismatch {
            path: PathBuf::from("file.ifc"),
            expected,
            actual,
        };
        let msg = err.to_string();
        assert!(msg.contains("checksum mismatch"));
        assert!(msg.contains(&expected.to_string()));
        assert!(msg.contains(&actual.to_string()));
    }

    #[test]
    fn version_mismatch_display() {
        let err = ArtifactError::VersionMismatch {
            path: PathBuf::from("old.ifc"),
            expected: 2,
            actual: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("expected 2"));
        assert!(msg.contains("got 1"));
    }

    #[test]
    fn malformed_artifact_display() {
        let err = ArtifactError::MalformedArtifact {
            path: PathBuf::from("lib/stdlib.ifc"),
            name: "Stdlib".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("malformed artifact"));
        assert!(msg.contains("'Stdlib'"));
    }
}
