//! `tokenize`: print the scopes the editor would assign to a template.

use std::fs;
use std::io::Write;

use jig_config::Config;
use jig_grammar::scopes::{BASE_SCOPE, grammar_scope};
use jig_registry::Registry;
use jig_textmate::{Harness, fixtures, load_grammar};
use tracing::debug;

use super::{Outcome, load_registry};
use crate::cli::TokenizeArgs;
use crate::errors::AppError;

pub(crate) fn tokenize<W: Write>(
    config: &Config,
    args: &TokenizeArgs,
    stdout: &mut W,
) -> Result<Outcome, AppError> {
    let scope = args.scope.clone().map_or_else(
        || load_registry(config).and_then(|registry| infer_scope(&registry, args)),
        Ok,
    )?;
    let text =
        fs::read_to_string(&args.file).map_err(|error| AppError::read_document(&args.file, error))?;

    let mut extra = args
        .grammars
        .iter()
        .map(|path| load_grammar(path))
        .collect::<Result<Vec<_>, _>>()?;
    if args.fixtures {
        extra.extend(fixtures::host_grammars()?);
    }
    let harness = Harness::from_manifest(config.manifest(), extra)?;
    debug!(%scope, file = %args.file, "tokenizing");

    for token in harness.tokenize(&scope, &text)?.iter().flatten() {
        writeln!(stdout, "{token}")?;
    }
    Ok(Outcome::Clean)
}

/// Chooses a root scope from the template's file name.
pub(crate) fn infer_scope(registry: &Registry, args: &TokenizeArgs) -> Result<String, AppError> {
    if let Some(language) = registry.for_path(args.file.as_std_path()) {
        return Ok(grammar_scope(language));
    }
    if args.file.extension() == Some("jig") {
        return Ok(BASE_SCOPE.to_owned());
    }
    Err(AppError::unknown_document(&args.file))
}
