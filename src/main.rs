//! Symcheck CLI entry point.

use clap::Parser;
use symcheck::cli::{self, Cli, EXIT_SETUP};

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli::run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_SETUP
        }
    };

    std::process::exit(exit_code);
}
