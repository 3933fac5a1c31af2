//! `depindex show`: print one indexed artifact.

use std::path::Path;

use depindex_artifact::ArtifactRecord;
use depindex_common::Digest;
use depindex_core::DigestIndex;

use crate::pipeline::{build_index, LocatedConfig};
use crate::{GlobalArgs, ReportFormat, ShowArgs};

/// Runs the `depindex show` command.
///
/// The target is tried as a digest first, then as an exact path, then as a
/// path suffix matching exactly one record.
pub fn run(
    args: &ShowArgs,
    global: &GlobalArgs,
    located: Option<&LocatedConfig>,
) -> Result<i32, Box<dyn std::error::Error>> {
    let (mut index, _) = build_index(&args.dirs, located)?;
    let record = lookup(&mut index, &args.target)?;
    print!("{}", render(&record, global.format)?);
    Ok(0)
}

fn render(record: &ArtifactRecord, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Json => {
            let deps: Vec<String> = record.deps.iter().map(Digest::to_string).collect();
            let report = serde_json::json!({
                "name": record.name,
                "path": record.path.display().to_string(),
                "digest": record.digest.to_string(),
                "deps": deps,
            });
            Ok(serde_json::to_string_pretty(&report)? + "\n")
        }
        ReportFormat::Text => {
            let mut out = format!(
                "name:   {}\npath:   {}\ndigest: {}\n",
                record.name,
                record.path.display(),
                record.digest
            );
            if record.deps.is_empty() {
                out.push_str("deps:   (none)\n");
            } else {
                for (i, dep) in record.deps.iter().enumerate() {
                    let label = if i == 0 { "deps:" } else { "" };
                    out.push_str(&format!("{label:<7} {dep}\n"));
                }
            }
            Ok(out)
        }
    }
}

fn lookup(
    index: &mut DigestIndex,
    target: &str,
) -> Result<ArtifactRecord, Box<dyn std::error::Error>> {
    if let Ok(digest) = target.parse::<Digest>() {
        return Ok(index.find_by_digest(digest)?.clone());
    }

    let path = Path::new(target);
    tracing::debug!(query = target, "not a digest, looking up by path");
    if let Ok(record) = index.find_by_path(path) {
        return Ok(record.clone());
    }

    let mut matches: Vec<ArtifactRecord> = index
        .records()
        .filter(|r| r.path.ends_with(path))
        .cloned()
        .collect();
    if matches.len() > 1 {
        return Err(format!("`{target}` matches {} indexed artifacts", matches.len()).into());
    }
    match matches.pop() {
        Some(record) => Ok(record),
        None => Ok(index.find_by_path(path)?.clone()),
    }
}
