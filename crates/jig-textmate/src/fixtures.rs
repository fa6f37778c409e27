//! Host language grammars bundled for tests.
//!
//! These are compact stand-ins for the grammars an editor ships: they carry
//! the constructs Jig composition interacts with (markup tags, strings,
//! begin/while blocks, blank-line continuation) and nothing more.

use camino::Utf8PathBuf;
use jig_grammar::tm::Grammar;

use crate::error::HarnessError;

const HOST_GRAMMARS: [(&str, &str); 8] = [
    (
        "html.tmLanguage.json",
        include_str!("../fixtures/html.tmLanguage.json"),
    ),
    (
        "markdown.tmLanguage.json",
        include_str!("../fixtures/markdown.tmLanguage.json"),
    ),
    (
        "typescript.tmLanguage.json",
        include_str!("../fixtures/typescript.tmLanguage.json"),
    ),
    (
        "typescriptreact.tmLanguage.json",
        include_str!("../fixtures/typescriptreact.tmLanguage.json"),
    ),
    (
        "javascript.tmLanguage.json",
        include_str!("../fixtures/javascript.tmLanguage.json"),
    ),
    (
        "css.tmLanguage.json",
        include_str!("../fixtures/css.tmLanguage.json"),
    ),
    (
        "json.tmLanguage.json",
        include_str!("../fixtures/json.tmLanguage.json"),
    ),
    (
        "yaml.tmLanguage.json",
        include_str!("../fixtures/yaml.tmLanguage.json"),
    ),
];

/// The bundled host grammars, one per built-in language.
///
/// # Errors
///
/// Returns [`HarnessError::Parse`] if a bundled grammar is malformed.
pub fn host_grammars() -> Result<Vec<Grammar>, HarnessError> {
    HOST_GRAMMARS
        .iter()
        .map(|(name, source)| {
            serde_json::from_str(source)
                .map_err(|error| HarnessError::parse(Utf8PathBuf::from(*name), error))
        })
        .collect()
}
