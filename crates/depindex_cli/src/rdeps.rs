//! `depindex rdeps`: list the units depending on a digest.

use depindex_common::Digest;
use depindex_core::DigestIndex;

use crate::pipeline::{build_index, LocatedConfig};
use crate::{GlobalArgs, RdepsArgs, ReportFormat};

/// A dependent digest and, when it is still indexed, its unit name.
type Dependent = (Digest, Option<String>);

/// Runs the `depindex rdeps` command.
///
/// An unknown digest simply has no dependents; the exit code is 0 either way.
pub fn run(
    args: &RdepsArgs,
    global: &GlobalArgs,
    located: Option<&LocatedConfig>,
) -> Result<i32, Box<dyn std::error::Error>> {
    let digest: Digest = args.digest.parse()?;
    let (mut index, _) = build_index(&args.dirs, located)?;
    let rows = dependents(&mut index, digest, args.transitive);

    print!("{}", render(digest, args.transitive, &rows, global.format)?);
    if global.format == ReportFormat::Text && !global.quiet {
        eprintln!("   {} dependent(s) of {digest}", rows.len());
    }
    Ok(0)
}

fn dependents(index: &mut DigestIndex, digest: Digest, transitive: bool) -> Vec<Dependent> {
    let digests = if transitive {
        index.transitive_reverse_dependencies(digest)
    } else {
        index.reverse_dependencies(digest)
    };
    digests
        .into_iter()
        .map(|d| (d, index.find_by_digest(d).ok().map(|r| r.name.clone())))
        .collect()
}

fn render(
    digest: Digest,
    transitive: bool,
    rows: &[Dependent],
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Json => {
            let items: Vec<_> = rows
                .iter()
                .map(|(d, name)| serde_json::json!({ "digest": d.to_string(), "name": name }))
                .collect();
            let report = serde_json::json!({
                "digest": digest.to_string(),
                "transitive": transitive,
                "dependents": items,
            });
            Ok(serde_json::to_string_pretty(&report)? + "\n")
        }
        ReportFormat::Text => Ok(rows
            .iter()
            .map(|(d, name)| match name {
                Some(name) => format!("{d}  {name}\n"),
                None => format!("{d}  (not indexed)\n"),
            })
            .collect()),
    }
}
