//! Command-line front end for the Jig grammar toolkit.
//!
//! [`run`] parses arguments, installs telemetry, and dispatches to one of
//! the subcommands. Generation and manifest reconciliation are computed in
//! full before anything is written, so a failing run leaves the tree as it
//! found it.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;
mod errors;
pub mod telemetry;

use cli::{Cli, CliCommand};
use commands::Outcome;
use errors::AppError;

/// Runs `jig-grammars` with `args`, writing results to `stdout` and
/// diagnostics to `stderr`.
///
/// Returns success when the command completed and found nothing to report,
/// and failure on any error or, for `check`, on drift.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => return report_usage(&error, stdout, stderr),
    };
    match execute(&cli, stdout) {
        Ok(Outcome::Clean) => ExitCode::SUCCESS,
        Ok(Outcome::Drift) => ExitCode::FAILURE,
        Err(error) => {
            let _ = writeln!(stderr, "error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn execute<W: Write>(cli: &Cli, stdout: &mut W) -> Result<Outcome, AppError> {
    telemetry::initialise(&cli.config)?;
    match &cli.command {
        CliCommand::Generate => commands::generate(&cli.config, stdout),
        CliCommand::Check => commands::check(&cli.config, stdout),
        CliCommand::Languages => commands::languages(&cli.config, stdout),
        CliCommand::Tokenize(args) => commands::tokenize(&cli.config, args, stdout),
    }
}

/// Help and version requests go to `stdout` and succeed; usage errors go to
/// `stderr` and fail.
fn report_usage<W: Write, E: Write>(
    error: &clap::Error,
    stdout: &mut W,
    stderr: &mut E,
) -> ExitCode {
    let rendered = error.render();
    if error.use_stderr() {
        let _ = write!(stderr, "{rendered}");
        ExitCode::from(2)
    } else {
        let _ = write!(stdout, "{rendered}");
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests;
