//! The digest-addressed dependency index.
//!
//! Records live in a single arena keyed by [`RecordId`]. Two secondary indices
//! map paths and digests to arena ids, so both views of a live record resolve
//! to the same stored value. Structural changes are applied to the arena and
//! indices immediately and queued in a [`PendingDelta`]; the reverse-dependency
//! graph only catches up when [`DigestIndex::compact`] runs, which every lookup
//! does first.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use depindex_artifact::ArtifactRecord;
use depindex_common::Digest;
use serde::Serialize;

use crate::delta::PendingDelta;
use crate::error::{IndexError, LookupKey};
use crate::graph::BackDepGraph;

/// Opaque identifier of a record slot in the index arena.
///
/// Ids are never reused within one index, so a stale id cannot alias a newer
/// record.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RecordId(u64);

impl RecordId {
    /// Returns the raw `u64` value of this id.
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

/// Size counters for an index, taken without compacting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IndexStats {
    /// Live records.
    pub records: usize,
    /// Digests with at least one dependent in the compacted graph.
    pub graph_entries: usize,
    /// Dependent edges in the compacted graph.
    pub graph_edges: usize,
    /// Additions waiting for the next compaction.
    pub pending_additions: usize,
    /// Removals waiting for the next compaction.
    pub pending_removals: usize,
}

/// Dual-keyed store of artifact records plus their reverse-dependency graph.
///
/// Not thread-safe; callers serialize all operations.
#[derive(Debug, Default)]
pub struct DigestIndex {
    records: HashMap<RecordId, ArtifactRecord>,
    by_path: BTreeMap<PathBuf, RecordId>,
    by_digest: HashMap<Digest, RecordId>,
    next_id: u64,
    pending: PendingDelta,
    graph: BackDepGraph,
}

impl DigestIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns size counters, including the not-yet-compacted delta.
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            records: self.records.len(),
            graph_entries: self.graph.entry_count(),
            graph_edges: self.graph.edge_count(),
            pending_additions: self.pending.additions.len(),
            pending_removals: self.pending.removals.len(),
        }
    }

    /// Iterates over live records in path order.
    pub fn records(&self) -> impl Iterator<Item = &ArtifactRecord> + '_ {
        self.by_path.values().map(move |id| self.slot(*id))
    }

    /// Removes the record with `digest`, if any, and queues the removal.
    ///
    /// # Panics
    ///
    /// Panics if the path index does not point at the same record as the
    /// digest index. That state means the index is corrupt and continuing
    /// could silently lose records.
    pub fn remove(&mut self, digest: Digest) {
        let Some(&id) = self.by_digest.get(&digest) else {
            return;
        };
        let path = self.slot(id).path.clone();
        match self.by_path.get(&path) {
            Some(&path_id) if path_id == id => {}
            other => panic!(
                "digest index corrupted: digest {digest} maps to {id:?} at {} but path maps to {other:?}",
                path.display()
            ),
        }

        self.by_digest.remove(&digest);
        self.by_path.remove(&path);
        let Some(record) = self.records.remove(&id) else {
            unreachable!("slot {id:?} vanished between lookup and removal");
        };

        tracing::debug!(path = %record.path.display(), %digest, "remove");
        self.pending.removals.push(record);
    }

    /// Adds a freshly read record, replacing whatever was recorded at its path.
    ///
    /// Re-adding the content already recorded at a path is a no-op. A
    /// different digest at the same path first removes the old record, so a
    /// replacement is queued as a removal followed by an addition. A digest
    /// already indexed under another path is left where it is and the new
    /// path stays unrecorded.
    pub fn add(&mut self, record: ArtifactRecord) {
        if let Some(&id) = self.by_path.get(&record.path) {
            let existing = self.slot(id).digest;
            if existing == record.digest {
                tracing::debug!(
                    path = %record.path.display(),
                    digest = %record.digest,
                    "add skipped, content unchanged"
                );
                return;
            }
            self.remove(existing);
        }

        if let Some(&other) = self.by_digest.get(&record.digest) {
            tracing::debug!(
                path = %record.path.display(),
                digest = %record.digest,
                indexed_at = %self.slot(other).path.display(),
                "add skipped, digest already indexed under another path"
            );
            return;
        }

        let id = RecordId(self.next_id);
        self.next_id += 1;
        tracing::debug!(
            path = %record.path.display(),
            digest = %record.digest,
            name = %record.name,
            deps = record.deps.len(),
            "add"
        );
        self.by_path.insert(record.path.clone(), id);
        self.by_digest.insert(record.digest, id);
        self.pending.additions.push(record.clone());
        self.records.insert(id, record);
    }

    /// Folds all queued changes into the reverse-dependency graph.
    ///
    /// Runs automatically before every lookup; calling it directly is only
    /// useful to move the cost to a convenient point.
    pub fn compact(&mut self) {
        if self.pending.is_empty() {
            tracing::debug!("compaction skipped, nothing pending");
            return;
        }

        let delta = std::mem::take(&mut self.pending);
        tracing::debug!(
            additions = delta.additions.len(),
            removals = delta.removals.len(),
            "compaction start"
        );
        let by_digest = &self.by_digest;
        self.graph
            .fold(delta, |digest| by_digest.contains_key(digest));
    }

    /// Returns the record with `digest`.
    pub fn find_by_digest(&mut self, digest: Digest) -> Result<&ArtifactRecord, IndexError> {
        self.compact();
        match self.by_digest.get(&digest) {
            Some(&id) => Ok(self.slot(id)),
            None => Err(IndexError::NotFound(LookupKey::Digest(digest))),
        }
    }

    /// Returns the record read from `path`.
    pub fn find_by_path(&mut self, path: &Path) -> Result<&ArtifactRecord, IndexError> {
        self.compact();
        match self.by_path.get(path) {
            Some(&id) => Ok(self.slot(id)),
            None => Err(IndexError::NotFound(LookupKey::Path(path.to_path_buf()))),
        }
    }

    /// Returns the digests of units that declare `digest` as a dependency.
    ///
    /// Unknown digests have no dependents. The result is sorted.
    pub fn reverse_dependencies(&mut self, digest: Digest) -> Vec<Digest> {
        self.compact();
        self.graph
            .dependents(&digest)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Returns every unit that depends on `digest` directly or indirectly.
    ///
    /// The result is sorted and never contains `digest` itself.
    pub fn transitive_reverse_dependencies(&mut self, digest: Digest) -> Vec<Digest> {
        self.compact();
        self.graph.transitive_dependents(&digest).into_iter().collect()
    }

    /// Returns the record at `path` without compacting.
    pub(crate) fn recorded_at(&self, path: &Path) -> Option<&ArtifactRecord> {
        self.by_path.get(path).map(|id| self.slot(*id))
    }

    fn slot(&self, id: RecordId) -> &ArtifactRecord {
        match self.records.get(&id) {
            Some(record) => record,
            None => panic!("digest index corrupted: no record stored for {id:?}"),
        }
    }
}
