//! Digest-addressed dependency index for compiled interface units.
//!
//! The index answers two questions for an incremental analysis pipeline:
//! which indexed units depend on the unit with a given digest, and which
//! indexed artifacts changed on disk since they were last read. Structural
//! changes are applied eagerly to the primary index and folded lazily into
//! the reverse-dependency graph before the next query.
//!
//! ```no_run
//! use depindex_artifact::BinaryArtifactReader;
//! use depindex_core::DigestIndex;
//!
//! let mut index = DigestIndex::new();
//! index.update(&BinaryArtifactReader::default(), &["_build/lib"]);
//! for record in index.records() {
//!     println!("{} {}", record.digest, record.name);
//! }
//! ```

#![warn(missing_docs)]

pub mod delta;
pub mod error;
pub mod graph;
pub mod index;
pub mod staleness;

pub use delta::PendingDelta;
pub use error::{IndexError, LookupKey};
pub use graph::BackDepGraph;
pub use index::{DigestIndex, IndexStats, RecordId};
pub use staleness::UpdateSummary;
