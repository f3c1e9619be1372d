//! Terminal output for comparison results.
//!
//! Diagnostics and the verdict go to stderr so stdout stays reserved for
//! snapshot JSON (the tool is routinely used with redirection).

use std::io::Write;

use colored::*;

/// Write diagnostics, one per line.
pub fn write_diagnostics<W: Write>(diffs: &[String], mut out: W) -> std::io::Result<()> {
    for diff in diffs {
        writeln!(out, "{}", diff)?;
    }
    Ok(())
}

/// Print the comparison verdict to stderr.
pub fn print_verdict(compatible: bool) {
    if compatible {
        eprintln!("{}", "symbols are compatible".green());
    } else {
        eprintln!("{}", "symbols are not compatible".red());
    }
}
