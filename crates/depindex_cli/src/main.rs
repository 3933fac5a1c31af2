//! depindex CLI for inspecting the compiled-interface dependency index.
//!
//! Provides `depindex scan` to index artifact directories, `depindex rdeps`
//! to list the units depending on a digest, `depindex show` to print one
//! indexed record, and `depindex emit` to write an artifact by hand.

#![warn(missing_docs)]

mod emit;
mod pipeline;
mod rdeps;
mod scan;
mod show;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Reverse-dependency index for compiled interface artifacts.
#[derive(Parser, Debug)]
#[command(name = "depindex", version, about = "Compiled-interface dependency index")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for command results.
    #[arg(short, long, global = true, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Path to a custom `depindex.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Index artifact directories and report what was found.
    Scan(ScanArgs),
    /// List the units that depend on a digest.
    Rdeps(RdepsArgs),
    /// Print one indexed artifact, by path or digest.
    Show(ShowArgs),
    /// Write an interface artifact.
    Emit(EmitArgs),
}

/// Arguments for the `depindex scan` subcommand.
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Directories to scan (default: `[index] roots` from the config).
    pub dirs: Vec<PathBuf>,

    /// List every indexed record.
    #[arg(short, long)]
    pub list: bool,
}

/// Arguments for the `depindex rdeps` subcommand.
#[derive(Parser, Debug)]
pub struct RdepsArgs {
    /// Digest to look up (32 hex characters).
    pub digest: String,

    /// Directories to scan (default: `[index] roots` from the config).
    pub dirs: Vec<PathBuf>,

    /// Include indirect dependents.
    #[arg(short, long)]
    pub transitive: bool,
}

/// Arguments for the `depindex show` subcommand.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Artifact path or digest.
    pub target: String,

    /// Directories to scan (default: `[index] roots` from the config).
    pub dirs: Vec<PathBuf>,
}

/// Arguments for the `depindex emit` subcommand.
#[derive(Parser, Debug)]
pub struct EmitArgs {
    /// Output artifact path.
    pub output: PathBuf,

    /// Module name of the unit.
    #[arg(short, long)]
    pub name: String,

    /// Interface body; the unit digest is derived from the name and body.
    #[arg(short, long, default_value = "")]
    pub body: String,

    /// Imported unit as `NAME=DIGEST`, or `NAME` for an import without digest.
    #[arg(short, long = "dep")]
    pub deps: Vec<String>,
}

/// Result output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to log at debug level.
    pub verbose: bool,
    /// Result output format.
    pub format: ReportFormat,
    /// Optional path to a custom config file.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        format: cli.format,
        config: cli.config,
    };

    match run(cli.command, &global) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn run(command: Command, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let located = pipeline::locate_config(global)?;
    pipeline::init_logging(global, located.as_ref());

    match command {
        Command::Scan(ref args) => scan::run(args, global, located.as_ref()),
        Command::Rdeps(ref args) => rdeps::run(args, global, located.as_ref()),
        Command::Show(ref args) => show::run(args, global, located.as_ref()),
        Command::Emit(ref args) => emit::run(args, global),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_scan_default() {
        let cli = Cli::parse_from(["depindex", "scan"]);
        match cli.command {
            Command::Scan(ref args) => {
                assert!(args.dirs.is_empty());
                assert!(!args.list);
            }
            _ => panic!("expected Scan command"),
        }
        assert_eq!(cli.format, ReportFormat::Text);
    }

    #[test]
    fn parse_scan_with_dirs() {
        let cli = Cli::parse_from(["depindex", "scan", "--list", "_build/a", "_build/b"]);
        match cli.command {
            Command::Scan(ref args) => {
                assert!(args.list);
                assert_eq!(
                    args.dirs,
                    vec![PathBuf::from("_build/a"), PathBuf::from("_build/b")]
                );
            }
            _ => panic!("expected Scan command"),
        }
    }

    #[test]
    fn parse_rdeps() {
        let cli = Cli::parse_from([
            "depindex",
            "rdeps",
            "00112233445566778899aabbccddeeff",
            "lib",
            "--transitive",
        ]);
        match cli.command {
            Command::Rdeps(ref args) => {
                assert_eq!(args.digest, "00112233445566778899aabbccddeeff");
                assert_eq!(args.dirs, vec![PathBuf::from("lib")]);
                assert!(args.transitive);
            }
            _ => panic!("expected Rdeps command"),
        }
    }

    #[test]
    fn parse_show() {
        let cli = Cli::parse_from(["depindex", "show", "lib/a.ifc"]);
        match cli.command {
            Command::Show(ref args) => {
                assert_eq!(args.target, "lib/a.ifc");
                assert!(args.dirs.is_empty());
            }
            _ => panic!("expected Show command"),
        }
    }

    #[test]
    fn parse_emit_with_deps() {
        let cli = Cli::parse_from([
            "depindex",
            "emit",
            "out/b.ifc",
            "--name",
            "B",
            "--body",
            "val f : unit -> unit",
            "--dep",
            "A=00112233445566778899aabbccddeeff",
            "--dep",
            "Stdlib",
        ]);
        match cli.command {
            Command::Emit(ref args) => {
                assert_eq!(args.output, PathBuf::from("out/b.ifc"));
                assert_eq!(args.name, "B");
                assert_eq!(args.body, "val f : unit -> unit");
                assert_eq!(args.deps.len(), 2);
            }
            _ => panic!("expected Emit command"),
        }
    }

    #[test]
    fn parse_emit_body_defaults_empty() {
        let cli = Cli::parse_from(["depindex", "emit", "a.ifc", "-n", "A"]);
        match cli.command {
            Command::Emit(ref args) => {
                assert!(args.body.is_empty());
                assert!(args.deps.is_empty());
            }
            _ => panic!("expected Emit command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from([
            "depindex",
            "--quiet",
            "--format",
            "json",
            "--config",
            "/p/depindex.toml",
            "scan",
        ]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.format, ReportFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("/p/depindex.toml")));
    }

    #[test]
    fn parse_global_flag_after_subcommand() {
        let cli = Cli::parse_from(["depindex", "scan", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn emit_requires_name() {
        assert!(Cli::try_parse_from(["depindex", "emit", "a.ifc"]).is_err());
    }
}
