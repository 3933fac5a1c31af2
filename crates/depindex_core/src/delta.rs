//! Structural changes queued since the last compaction.

use depindex_artifact::ArtifactRecord;

/// Records added to and removed from the index since the last compaction.
///
/// Both lists keep insertion order. A path whose content is replaced shows up
/// as a removal of the old record followed by an addition of the new one.
#[derive(Debug, Default)]
pub struct PendingDelta {
    /// Records inserted into the index.
    pub additions: Vec<ArtifactRecord>,

    /// Records taken out of the index.
    pub removals: Vec<ArtifactRecord>,
}

impl PendingDelta {
    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }
}
