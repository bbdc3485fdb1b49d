//! hbit - Local-first habit tracking

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = hbit::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
