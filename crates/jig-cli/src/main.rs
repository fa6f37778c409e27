//! Entry point for `jig-grammars`.
//!
//! The binary delegates to [`jig_cli::run`] with the process arguments and
//! locked standard streams.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    jig_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
