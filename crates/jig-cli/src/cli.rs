//! Command-line argument definitions.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use jig_config::Config;

/// Generates and checks the Jig grammar family.
#[derive(Parser, Debug)]
#[command(
    name = "jig-grammars",
    version,
    disable_help_subcommand = true,
    arg_required_else_help = true
)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: Config,
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Subcommands of `jig-grammars`.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Writes every grammar and reconciles the extension manifest.
    Generate,
    /// Reports grammars or manifest entries that differ from a fresh
    /// generation; exits with status 1 on drift.
    Check,
    /// Prints the language catalogue and reserved tags as JSON.
    Languages,
    /// Tokenizes a template with the grammars the manifest declares.
    Tokenize(TokenizeArgs),
}

/// Arguments of the `tokenize` subcommand.
#[derive(Args, Debug, Clone)]
pub(crate) struct TokenizeArgs {
    /// Template to tokenize.
    #[arg(value_name = "FILE")]
    pub(crate) file: Utf8PathBuf,
    /// Root scope to tokenize with; inferred from the file name when absent.
    #[arg(long, value_name = "SCOPE")]
    pub(crate) scope: Option<String>,
    /// Supplies bundled stand-ins for host grammars the manifest lacks.
    #[arg(long)]
    pub(crate) fixtures: bool,
    /// Additional grammar files for scopes the manifest lacks.
    #[arg(long = "grammar", value_name = "PATH")]
    pub(crate) grammars: Vec<Utf8PathBuf>,
}
