//! Error types for index lookups.

use std::fmt;
use std::path::PathBuf;

use depindex_common::Digest;

/// The key a lookup was made with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    /// Lookup by content digest.
    Digest(Digest),
    /// Lookup by artifact path.
    Path(PathBuf),
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKey::Digest(digest) => write!(f, "digest {digest}"),
            LookupKey::Path(path) => write!(f, "path {}", path.display()),
        }
    }
}

/// Errors surfaced by keyed index lookups.
///
/// Batch operations never return these: per-item failures during a refresh
/// are logged and skipped instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// No live record exists for the key.
    #[error("no indexed artifact for {0}")]
    NotFound(LookupKey),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_digest_display() {
        let digest = Digest::from_bytes(b"missing");
        let err = IndexError::NotFound(LookupKey::Digest(digest));
        let msg = err.to_string();
        assert!(msg.starts_with("no indexed artifact for digest "));
        assert!(msg.contains(&digest.to_string()));
    }

    #[test]
    fn not_found_path_display() {
        let err = IndexError::NotFound(LookupKey::Path(PathBuf::from("lib/a.ifc")));
        assert_eq!(err.to_string(), "no indexed artifact for path lib/a.ifc");
    }
}
