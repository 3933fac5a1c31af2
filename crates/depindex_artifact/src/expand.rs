//! Expanding root directories into candidate artifact paths.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Lists the artifact files found directly inside each of `dirs`.
///
/// Only regular files whose extension equals `extension` are returned; the
/// listing is not recursive. A directory that cannot be listed is logged and
/// skipped. The result is sorted and free of duplicates.
pub fn expand_directories<P: AsRef<Path>>(dirs: &[P], extension: &str) -> Vec<PathBuf> {
    let mut found = BTreeSet::new();
    for dir in dirs {
        let dir = dir.as_ref();
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), %err, "cannot list directory, skipping");
                continue;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if is_file && has_extension(&path, extension) {
                found.insert(path);
            }
        }
    }
    found.into_iter().collect()
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_matching_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.ifc"), b"").unwrap();
        std::fs::write(dir.path().join("b.ifc"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();
        std::fs::write(dir.path().join("ifc"), b"").unwrap();

        let paths = expand_directories(&[dir.path()], "ifc");
        assert_eq!(
            paths,
            vec![dir.path().join("a.ifc"), dir.path().join("b.ifc")]
        );
    }

    #[test]
    fn does_not_recurse() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("deep.ifc"), b"").unwrap();
        std::fs::write(dir.path().join("top.ifc"), b"").unwrap();

        let paths = expand_directories(&[dir.path()], "ifc");
        assert_eq!(paths, vec![dir.path().join("top.ifc")]);
    }

    #[test]
    fn directories_named_like_artifacts_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("fake.ifc")).unwrap();
        assert!(expand_directories(&[dir.path()], "ifc").is_empty());
    }

    #[test]
    fn unlistable_directory_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.ifc"), b"").unwrap();
        let missing = dir.path().join("missing");

        let paths = expand_directories(&[missing.as_path(), dir.path()], "ifc");
        assert_eq!(paths, vec![dir.path().join("a.ifc")]);
    }

    #[test]
    fn repeated_directory_is_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.ifc"), b"").unwrap();
        let paths = expand_directories(&[dir.path(), dir.path()], "ifc");
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn merges_multiple_directories() {
        let one = tempfile::tempdir().unwrap();
        let two = tempfile::tempdir().unwrap();
        std::fs::write(one.path().join("a.ifc"), b"").unwrap();
        std::fs::write(two.path().join("b.ifc"), b"").unwrap();
        let paths = expand_directories(&[one.path(), two.path()], "ifc");
        assert_eq!(paths.len(), 2);
    }
}
