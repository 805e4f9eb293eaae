//! Flowdiff - visual diff reports for pipeline definitions

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = flowdiff::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
