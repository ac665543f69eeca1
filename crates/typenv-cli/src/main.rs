//! typenv CLI entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    typenv_cli::run()
}
