//! `depindex emit`: write an interface artifact.

use depindex_artifact::{ArtifactWriter, ImportEntry};
use depindex_common::Digest;

use crate::{EmitArgs, GlobalArgs, ReportFormat};

/// Runs the `depindex emit` command.
pub fn run(args: &EmitArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let imports = args
        .deps
        .iter()
        .map(|spec| parse_import(spec))
        .collect::<Result<Vec<_>, _>>()?;

    let digest = ArtifactWriter::write(&args.output, &args.name, args.body.as_bytes(), &imports)?;
    tracing::info!(
        path = %args.output.display(),
        name = %args.name,
        %digest,
        imports = imports.len(),
        "artifact emitted"
    );

    print!("{}", render(args, digest, global)?);
    Ok(0)
}

/// Renders the stdout report: the digest alone in text mode, nothing when quiet.
fn render(
    args: &EmitArgs,
    digest: Digest,
    global: &GlobalArgs,
) -> Result<String, serde_json::Error> {
    match global.format {
        ReportFormat::Json => {
            let report = serde_json::json!({
                "name": args.name,
                "path": args.output.display().to_string(),
                "digest": digest.to_string(),
            });
            Ok(serde_json::to_string_pretty(&report)? + "\n")
        }
        ReportFormat::Text if global.quiet => Ok(String::new()),
        ReportFormat::Text => Ok(format!("{digest}\n")),
    }
}

/// Parses `NAME=DIGEST` into a pinned import and bare `NAME` into an
/// unpinned one.
fn parse_import(spec: &str) -> Result<ImportEntry, Box<dyn std::error::Error>> {
    let (name, digest) = match spec.split_once('=') {
        Some((name, digest)) => (name.trim(), Some(digest.trim())),
        None => (spec.trim(), None),
    };
    if name.is_empty() {
        return Err(format!("invalid import `{spec}`: missing module name").into());
    }
    match digest {
        Some(raw) => {
            let digest: Digest = raw
                .parse()
                .map_err(|e| format!("invalid import `{spec}`: {e}"))?;
            Ok(ImportEntry::pinned(name, digest))
        }
        None => Ok(ImportEntry::unpinned(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depindex_artifact::{ArtifactReader, BinaryArtifactReader};
    use std::path::PathBuf;

    #[test]
    fn parse_pinned_and_unpinned() {
        let d = ArtifactWriter::unit_digest("A", b"a");
        let pinned = parse_import(&format!("A={d}")).unwrap();
        assert_eq!(pinned, ImportEntry::pinned("A", d));

        let unpinned = parse_import("Stdlib").unwrap();
        assert_eq!(unpinned, ImportEntry::unpinned("Stdlib"));
    }

    #[test]
    fn parse_rejects_bad_specs() {
        assert!(parse_import("=00112233445566778899aabbccddeeff").is_err());
        assert!(parse_import("A=xyz").is_err());
        assert!(parse_import("").is_err());
    }

    #[test]
    fn emitted_artifact_is_readable() {
        let dir = tempfile::tempdir().unwrap();
        let da = ArtifactWriter::unit_digest("A", b"a");
        let args = EmitArgs {
            output: dir.path().join("b.ifc"),
            name: "B".to_string(),
            body: "b".to_string(),
            deps: vec![format!("A={da}"), "Stdlib".to_string()],
        };
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            format: ReportFormat::Text,
            config: None,
        };
        assert_eq!(run(&args, &global).unwrap(), 0);

        let record = BinaryArtifactReader::default().read(&args.output).unwrap();
        assert_eq!(record.name, "B");
        assert_eq!(record.digest, ArtifactWriter::unit_digest("B", b"b"));
        assert_eq!(record.deps, vec![da]);
    }

    #[test]
    fn report_prints_digest_unless_quiet() {
        let args = EmitArgs {
            output: PathBuf::from("out/a.ifc"),
            name: "A".to_string(),
            body: String::new(),
            deps: Vec::new(),
        };
        let digest = ArtifactWriter::unit_digest("A", b"");
        let mut global = GlobalArgs {
            quiet: false,
            verbose: false,
            format: ReportFormat::Text,
            config: None,
        };
        assert_eq!(render(&args, digest, &global).unwrap(), format!("{digest}\n"));

        global.quiet = true;
        assert!(render(&args, digest, &global).unwrap().is_empty());

        global.format = ReportFormat::Json;
        let report: serde_json::Value =
            serde_json::from_str(&render(&args, digest, &global).unwrap()).unwrap();
        assert_eq!(report["name"], "A");
        assert_eq!(report["path"], "out/a.ifc");
        assert_eq!(report["digest"], digest.to_string());
    }
}
