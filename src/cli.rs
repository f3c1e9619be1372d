//! Command-line interface for symcheck.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::compare;
use crate::extract;
use crate::parser;
use crate::report;
use crate::snapshot;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_SETUP: i32 = 1;
pub const EXIT_INCOMPATIBLE: i32 = 2;

/// Check a Go package's exported surface for plugin ABI compatibility.
///
/// Without a baseline, symcheck prints a JSON snapshot of the package's
/// exported symbols to stdout (take one at every major release). With a
/// baseline, it compares the current surface against the snapshot and
/// reports every structural incompatibility, one per line, on stderr.
#[derive(Parser)]
#[command(name = "symcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing the Go package to snapshot
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Baseline snapshot to compare against
    #[arg(short = 'b', long)]
    pub baseline: Option<PathBuf>,

    /// Package name - can be omitted if only one package exists
    #[arg(short = 'p', long)]
    pub package: Option<String>,

    /// Write the snapshot to a file instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Run the tool and return the process exit code.
///
/// Setup and extraction failures are returned as errors; the caller maps
/// them to [`EXIT_SETUP`]. Incompatibility is not an error: comparison
/// always completes and the diagnostic count decides the code.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    let files = parser::load_package(&cli.dir, cli.package.as_deref())?;
    let exports = extract::extract(&files)?;

    match &cli.baseline {
        Some(path) => {
            let baseline = snapshot::read_baseline(path)?;
            let diffs = compare::compare_trees(&baseline, &exports, true);
            report::write_diagnostics(&diffs, std::io::stderr().lock())?;
            report::print_verdict(diffs.is_empty());
            if diffs.is_empty() {
                Ok(EXIT_SUCCESS)
            } else {
                Ok(EXIT_INCOMPATIBLE)
            }
        }
        None => {
            match &cli.output {
                Some(path) => {
                    let json = snapshot::encode(&exports)?;
                    fs::write(path, json).with_context(|| {
                        format!("failed to write snapshot to {}", path.display())
                    })?;
                }
                None => snapshot::write(&exports, std::io::stdout().lock())?,
            }
            Ok(EXIT_SUCCESS)
        }
    }
}
