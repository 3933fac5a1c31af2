//! Content digests identifying compiled interface units.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of bytes in a [`Digest`].
pub const DIGEST_LEN: usize = 16;

/// A 128-bit content digest computed using XXH3.
///
/// Two artifacts with the same `Digest` are assumed to have identical content.
/// The digest is the identity key of every record in the dependency index, and
/// the unit in which dependencies between artifacts are expressed.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Computes a digest from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Wraps raw digest bytes without hashing them.
    pub fn from_raw(raw: [u8; DIGEST_LEN]) -> Self {
        Self(raw)
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, ..] = self.0;
        write!(f, "Digest({a:02x}{b:02x}{c:02x}{d:02x}..)")
    }
}

/// Error returned when a string is not a 32-character hex digest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid digest: '{input}' (expected {} hex characters)", DIGEST_LEN * 2)]
pub struct ParseDigestError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for Digest {
    type Err = ParseDigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseDigestError {
            input: s.to_string(),
        };

        if s.len() != DIGEST_LEN * 2 || !s.is_ascii() {
            return Err(err());
        }

        let mut raw = [0u8; DIGEST_LEN];
        for (i, byte) in raw.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).map_err(|_| err())?;
        }
        Ok(Self(raw))
    }
}
