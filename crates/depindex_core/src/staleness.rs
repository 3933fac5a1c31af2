//! Detecting on-disk changes and refreshing the index in batches.

use std::path::{Path, PathBuf};

use depindex_artifact::{expand_directories, modification_time, ArtifactReader, ArtifactRecord};
use depindex_common::Digest;
use serde::Serialize;

use crate::index::DigestIndex;

/// Counts describing one [`DigestIndex::update`] batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct UpdateSummary {
    /// Candidate artifact paths found under the given directories.
    pub scanned: usize,
    /// Records retracted because their file changed or vanished.
    pub removed: usize,
    /// Records (re)read from disk and offered to the index.
    pub added: usize,
}

impl DigestIndex {
    /// Returns the digests of records whose file's modification time no longer
    /// matches the recorded one.
    ///
    /// A file that can no longer be stat-ed is always reported.
    pub fn outdated(&self) -> Vec<Digest> {
        self.records()
            .filter(|record| modification_time(&record.path) != Some(record.mtime))
            .map(|record| record.digest)
            .collect()
    }

    /// Re-reads every candidate path that is unrecorded or whose modification
    /// time differs from the recorded one.
    ///
    /// Read failures are logged and skipped. Only successfully read records are
    /// returned; the index is not modified.
    pub fn updated<R, P>(&self, reader: &R, paths: &[P]) -> Vec<ArtifactRecord>
    where
        R: ArtifactReader + ?Sized,
        P: AsRef<Path>,
    {
        let mut fresh = Vec::new();
        for path in paths {
            let path = path.as_ref();
            if let Some(recorded) = self.recorded_at(path) {
                if modification_time(path) == Some(recorded.mtime) {
                    continue;
                }
            }
            match reader.read(path) {
                Ok(record) => fresh.push(record),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "skipping unreadable artifact");
                }
            }
        }
        fresh
    }

    /// Brings the index in line with the artifacts found in `dirs`.
    ///
    /// Every outdated record is retracted first, across the whole index, so a
    /// record whose file moved or disappeared is dropped even when its old
    /// directory is no longer listed. Changed and new artifacts are then read
    /// and added, and the result is compacted.
    pub fn update<R, P>(&mut self, reader: &R, dirs: &[P]) -> UpdateSummary
    where
        R: ArtifactReader + ?Sized,
        P: AsRef<Path>,
    {
        let paths: Vec<PathBuf> = expand_directories(dirs, reader.extension());

        let outdated = self.outdated();
        for digest in &outdated {
            self.remove(*digest);
        }

        let fresh = self.updated(reader, &paths);
        let added = fresh.len();
        for record in fresh {
            self.add(record);
        }
        self.compact();

        let summary = UpdateSummary {
            scanned: paths.len(),
            removed: outdated.len(),
            added,
        };
        tracing::info!(
            scanned = summary.scanned,
            removed = summary.removed,
            added = summary.added,
            records = self.len(),
            "index updated"
        );
        summary
    }
}
