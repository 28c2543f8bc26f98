//! Implementation of `sift schema`.

use std::process::ExitCode;

use sift_index::SCHEMA;

/// Prints the tables the relational backend reads.
pub fn run() -> ExitCode {
    print!("{SCHEMA}");
    ExitCode::SUCCESS
}
