//! # Natrium CLI
//!
//! This is the binary entry point for the `natrium` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Reporting fatal errors as `Error: [Natrium] <message>` with exit status 1.
//!
//! The core application logic is defined in the `lib.rs` library crate, so the
//! binary stays a thin wrapper around it.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: [Natrium] {:#}", e);
            ExitCode::FAILURE
        }
    }
}
