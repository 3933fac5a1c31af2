//! Shared foundational types used across the depindex workspace.
//!
//! This crate provides the content [`Digest`] that identifies every compiled
//! interface unit tracked by the dependency index, and the artifact file
//! extension shared by the reader and the configuration defaults.

#![warn(missing_docs)]

pub mod digest;

pub use digest::{Digest, ParseDigestError, DIGEST_LEN};

/// Default file extension of compiled interface artifacts, without the dot.
pub const DEFAULT_EXTENSION: &str = "ifc";
