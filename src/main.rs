//! sdsorter — streaming sorter for scanner audio dumps.
//!
//! Thin binary entry point. All logic lives in the `sdsorter-core`
//! and `sdsorter-cli` crates.

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = sdsorter_cli::Args::parse();
    ExitCode::from(sdsorter_cli::main_with(&args))
}
