//! `depindex scan`: index artifact directories and report the result.

use depindex_core::{DigestIndex, UpdateSummary};

use crate::pipeline::{build_index, LocatedConfig};
use crate::{GlobalArgs, ReportFormat, ScanArgs};

/// Runs the `depindex scan` command.
pub fn run(
    args: &ScanArgs,
    global: &GlobalArgs,
    located: Option<&LocatedConfig>,
) -> Result<i32, Box<dyn std::error::Error>> {
    let (index, summary) = build_index(&args.dirs, located)?;
    print!("{}", render(&index, &summary, args.list, global.format)?);

    if global.format == ReportFormat::Text && !global.quiet {
        let stats = index.stats();
        eprintln!(
            "   Scanned {} artifact(s): {} indexed, {} dependency edge(s)",
            summary.scanned, stats.records, stats.graph_edges
        );
    }
    Ok(0)
}

/// Renders the stdout report. Text output is empty unless `list` is set.
fn render(
    index: &DigestIndex,
    summary: &UpdateSummary,
    list: bool,
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Json => {
            let mut report = serde_json::json!({
                "summary": summary,
                "stats": index.stats(),
            });
            if list {
                let records: Vec<_> = index
                    .records()
                    .map(|r| {
                        serde_json::json!({
                            "name": r.name,
                            "path": r.path.display().to_string(),
                            "digest": r.digest.to_string(),
                        })
                    })
                    .collect();
                report["records"] = serde_json::Value::Array(records);
            }
            Ok(serde_json::to_string_pretty(&report)? + "\n")
        }
        ReportFormat::Text => {
            let mut out = String::new();
            if list {
                for r in index.records() {
                    out.push_str(&format!(
                        "{}  {:<24} {}\n",
                        r.digest,
                        r.name,
                        r.path.display()
                    ));
                }
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depindex_artifact::{ArtifactWriter, ImportEntry};
    use std::path::PathBuf;

    #[test]
    fn json_report_carries_summary_stats_and_records() {
        let dir = tempfile::tempdir().unwrap();
        let da = ArtifactWriter::write(&dir.path().join("a.ifc"), "A", b"a", &[]).unwrap();
        ArtifactWriter::write(
            &dir.path().join("b.ifc"),
            "B",
            b"b",
            &[ImportEntry::pinned("A", da)],
        )
        .unwrap();
        let (index, summary) = build_index(&[dir.path().to_path_buf()], None).unwrap();

        let out = render(&index, &summary, true, ReportFormat::Json).unwrap();
        let report: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(report["summary"]["scanned"], 2);
        assert_eq!(report["summary"]["added"], 2);
        assert_eq!(report["stats"]["records"], 2);
        assert_eq!(report["stats"]["graph_edges"], 1);
        assert_eq!(report["records"][0]["name"], "A");
        assert_eq!(report["records"][0]["digest"], da.to_string());
        assert_eq!(report["records"][1]["name"], "B");
    }

    #[test]
    fn json_report_omits_records_unless_listed() {
        let dir = tempfile::tempdir().unwrap();
        ArtifactWriter::write(&dir.path().join("a.ifc"), "A", b"a", &[]).unwrap();
        let (index, summary) = build_index(&[dir.path().to_path_buf()], None).unwrap();

        let out = render(&index, &summary, false, ReportFormat::Json).unwrap();
        let report: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(report.get("records").is_none());
    }

    #[test]
    fn text_listing_has_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let da = ArtifactWriter::write(&dir.path().join("a.ifc"), "A", b"a", &[]).unwrap();
        let db = ArtifactWriter::write(&dir.path().join("b.ifc"), "B", b"b", &[]).unwrap();
        let (index, summary) = build_index(&[dir.path().to_path_buf()], None).unwrap();

        let out = render(&index, &summary, true, ReportFormat::Text).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(&da.to_string()));
        assert!(lines[0].ends_with(&dir.path().join("a.ifc").display().to_string()));
        assert!(lines[1].starts_with(&db.to_string()));

        assert!(render(&index, &summary, false, ReportFormat::Text)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn scan_without_dirs_or_config_fails() {
        let args = ScanArgs {
            dirs: Vec::<PathBuf>::new(),
            list: false,
        };
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            format: ReportFormat::Text,
            config: None,
        };
        assert!(run(&args, &global, None).is_err());
    }
}
