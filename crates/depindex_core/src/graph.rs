//! Reverse-dependency graph derived from the digest index.
//!
//! The graph maps a digest to the digests of units that declare it as a
//! dependency. It is never edited directly by index mutations: queued
//! [`PendingDelta`]s are folded in by [`BackDepGraph::fold`], so the cost of an
//! update is proportional to the size of the delta rather than the index.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use depindex_common::Digest;

use crate::delta::PendingDelta;

/// Digest → set of dependent digests. Empty sets are never stored.
#[derive(Debug, Default)]
pub struct BackDepGraph {
    dependents: HashMap<Digest, BTreeSet<Digest>>,
}

impl BackDepGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the dependents recorded for `digest`, if any.
    pub fn dependents(&self, digest: &Digest) -> Option<&BTreeSet<Digest>> {
        self.dependents.get(digest)
    }

    /// Returns every digest reachable from `digest` through dependent edges,
    /// excluding `digest` itself.
    pub fn transitive_dependents(&self, digest: &Digest) -> BTreeSet<Digest> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([*digest]);
        while let Some(current) = queue.pop_front() {
            let Some(next) = self.dependents.get(&current) else {
                continue;
            };
            for dependent in next {
                if *dependent != *digest && seen.insert(*dependent) {
                    queue.push_back(*dependent);
                }
            }
        }
        seen
    }

    /// Number of digests with at least one dependent.
    pub fn entry_count(&self) -> usize {
        self.dependents.len()
    }

    /// Total number of dependent edges.
    pub fn edge_count(&self) -> usize {
        self.dependents.values().map(BTreeSet::len).sum()
    }

    /// Folds a batch of queued changes into the graph.
    ///
    /// `is_live` reports whether a digest is present in the index right now.
    /// Removals are processed before additions:
    ///
    /// 1. A removed record whose digest is live again was re-added within the
    ///    batch and is ignored. Otherwise its digest is marked deleted and each
    ///    of its dependencies is marked for recomputation.
    /// 2. An added record whose digest is marked deleted was removed again
    ///    later in the batch and is ignored. Otherwise it is accumulated as a
    ///    fresh dependent of each of its dependencies.
    /// 3. Each marked digest keeps its previous dependents minus deleted
    ///    digests, plus the fresh ones; an empty result drops the entry.
    pub fn fold(&mut self, delta: PendingDelta, is_live: impl Fn(&Digest) -> bool) {
        let mut deleted: HashSet<Digest> = HashSet::new();
        let mut pending: HashMap<Digest, BTreeSet<Digest>> = HashMap::new();

        for removed in &delta.removals {
            if is_live(&removed.digest) {
                continue;
            }
            deleted.insert(removed.digest);
            for dep in &removed.deps {
                pending.entry(*dep).or_default();
            }
        }

        for added in &delta.additions {
            if deleted.contains(&added.digest) {
                continue;
            }
            for dep in &added.deps {
                pending.entry(*dep).or_default().insert(added.digest);
            }
        }

        for (digest, fresh) in pending {
            let mut merged = self.dependents.remove(&digest).unwrap_or_default();
            merged.retain(|dependent| !deleted.contains(dependent));
            merged.extend(fresh);
            if merged.is_empty() {
                tracing::debug!(%digest, "graph entry removed");
            } else {
                tracing::debug!(%digest, dependents = merged.len(), "graph entry updated");
                self.dependents.insert(digest, merged);
            }
        }
    }
}
