//! Binary layout of compiled interface artifacts.
//!
//! Every artifact is a 4-byte little-endian header length, a bincode-encoded
//! [`ArtifactHeader`], and a bincode-encoded [`InterfaceUnit`] payload. The
//! header carries magic bytes, a format version and a checksum of the payload
//! so that truncated or foreign files are rejected before the manifest is used.

use std::path::Path;

use depindex_common::Digest;
use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;

/// Magic bytes identifying a compiled interface artifact.
pub const ARTIFACT_MAGIC: [u8; 4] = *b"DXIF";

/// Current artifact format version. Increment on breaking changes to
/// the header or payload format.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Upper bound on the bytes a single decode may claim.
///
/// Length prefixes are checked against it before anything is allocated, so a
/// corrupt prefix fails the decode instead of exhausting memory.
pub const MAX_DECODE_BYTES: usize = 16 * 1024 * 1024;

fn decode_config() -> impl bincode::config::Config {
    bincode::config::standard().with_limit::<MAX_DECODE_BYTES>()
}

/// Header prepended to every artifact for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactHeader {
    /// Magic bytes: must be `b"DXIF"`.
    pub magic: [u8; 4],

    /// Artifact format version.
    pub format_version: u32,

    /// Digest of the payload bytes (integrity check only, not the unit digest).
    pub checksum: Digest,
}

/// One `(name, optional digest)` entry of a unit's import manifest.
///
/// The entry naming the unit itself carries the unit's own digest. Entries
/// without a digest are imports the producer could not pin to a specific
/// interface; they are not dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEntry {
    /// Module name of the imported (or own) unit.
    pub name: String,

    /// Digest of the imported interface, when known.
    pub digest: Option<Digest>,
}

impl ImportEntry {
    /// Creates an import entry pinned to a digest.
    pub fn pinned(name: impl Into<String>, digest: Digest) -> Self {
        Self {
            name: name.into(),
            digest: Some(digest),
        }
    }

    /// Creates an import entry with no digest.
    pub fn unpinned(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            digest: None,
        }
    }
}

/// The decoded payload of an interface artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceUnit {
    /// Module name of this unit.
    pub name: String,

    /// Import manifest, including the entry for the unit itself.
    pub imports: Vec<ImportEntry>,

    /// Opaque interface body. Not interpreted by the index.
    pub body: Vec<u8>,
}

impl InterfaceUnit {
    /// Returns the unit's own digest: the first self-named entry carrying one.
    pub fn self_digest(&self) -> Option<Digest> {
        self.imports
            .iter()
            .find(|entry| entry.name == self.name && entry.digest.is_some())
            .and_then(|entry| entry.digest)
    }

    /// Returns the digests of every other pinned entry, in manifest order.
    ///
    /// Entries without a digest are skipped. Only the entry that supplied the
    /// self digest is excluded, so a duplicated self-named entry still counts.
    pub fn dependency_digests(&self) -> Vec<Digest> {
        let self_pos = self
            .imports
            .iter()
            .position(|entry| entry.name == self.name && entry.digest.is_some());
        self.imports
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != self_pos)
            .filter_map(|(_, entry)| entry.digest)
            .collect()
    }
}

/// Encodes a unit into the on-disk artifact layout.
pub fn encode_unit(unit: &InterfaceUnit) -> Result<Vec<u8>, ArtifactError> {
    let payload = bincode::serde::encode_to_vec(unit, bincode::config::standard()).map_err(
        |e| ArtifactError::Serialization {
            reason: e.to_string(),
        },
    )?;
    if payload.len() > MAX_DECODE_BYTES {
        return Err(ArtifactError::Serialization {
            reason: format!(
                "unit payload is {} bytes, readers accept at most {MAX_DECODE_BYTES}",
                payload.len()
            ),
        });
    }

    let header = ArtifactHeader {
        magic: ARTIFACT_MAGIC,
        format_version: ARTIFACT_FORMAT_VERSION,
        checksum: Digest::from_bytes(&payload),
    };
    let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
        .map_err(|e| ArtifactError::Serialization {
            reason: e.to_string(),
        })?;

    let header_len = header_bytes.len() as u32;
    let mut output = Vec::with_capacity(4 + header_bytes.len() + payload.len());
    output.extend_from_slice(&header_len.to_le_bytes());
    output.extend_from_slice(&header_bytes);
    output.extend_from_slice(&payload);
    Ok(output)
}

/// Decodes and validates raw artifact bytes read from `path`.
///
/// `path` is only used to label errors.
pub fn decode_unit(path: &Path, raw: &[u8]) -> Result<InterfaceUnit, ArtifactError> {
    let invalid = |reason: &str| ArtifactError::InvalidHeader {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    if raw.len() < 4 {
        return Err(invalid("file too short for header length"));
    }
    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&raw[..4]);
    let header_len = u32::from_le_bytes(len_bytes) as usize;
    if raw.len() - 4 < header_len {
        return Err(invalid("header length exceeds file size"));
    }

    let (header, _): (ArtifactHeader, usize) =
        bincode::serde::decode_from_slice(&raw[4..4 + header_len], decode_config())
            .map_err(|e| invalid(&e.to_string()))?;

    if header.magic != ARTIFACT_MAGIC {
        return Err(invalid("missing magic bytes"));
    }
    if header.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(ArtifactError::VersionMismatch {
            path: path.to_path_buf(),
            expected: ARTIFACT_FORMAT_VERSION,
            actual: header.format_version,
        });
    }

    let payload = &raw[4 + header_len..];
    let actual = Digest::from_bytes(payload);
    if actual != header.checksum {
        return Err(ArtifactError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: header.checksum,
            actual,
        });
    }

    let (unit, _): (InterfaceUnit, usize) =
        bincode::serde::decode_from_slice(payload, decode_config()).map_err(|e| {
            ArtifactError::Serialization {
                reason: e.to_string(),
            }
        })?;
    Ok(unit)
}
