//! `languages`: the catalogue as seen by tools outside this workspace.

use std::io::Write;

use jig_config::Config;
use jig_grammar::scopes::{content_scope, editor_language, grammar_scope};
use jig_registry::{LanguageDescriptor, Registry, ReservedTags};
use serde::Serialize;

use super::{Outcome, load_registry};
use crate::errors::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LanguageListing<'a> {
    pub(crate) reserved_tags: &'a ReservedTags,
    pub(crate) languages: Vec<LanguageEntry<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LanguageEntry<'a> {
    pub(crate) id: &'a str,
    pub(crate) display_name: &'a str,
    pub(crate) aliases: &'a [String],
    pub(crate) file_extensions: &'a [String],
    pub(crate) host_grammar_scope: &'a str,
    pub(crate) grammar_scope: String,
    pub(crate) content_scope: String,
    pub(crate) editor_language: String,
    pub(crate) greedy: bool,
}

impl<'a> From<&'a LanguageDescriptor> for LanguageEntry<'a> {
    fn from(language: &'a LanguageDescriptor) -> Self {
        Self {
            id: language.id(),
            display_name: language.display_name(),
            aliases: language.alias_names(),
            file_extensions: language.file_extensions(),
            host_grammar_scope: language.host_grammar_scope(),
            grammar_scope: grammar_scope(language),
            content_scope: content_scope(language),
            editor_language: editor_language(language),
            greedy: language.has_greedy_contexts(),
        }
    }
}

impl<'a> LanguageListing<'a> {
    pub(crate) fn new(registry: &'a Registry) -> Self {
        Self {
            reserved_tags: registry.reserved_tags(),
            languages: registry.languages().iter().map(LanguageEntry::from).collect(),
        }
    }
}

pub(crate) fn languages<W: Write>(config: &Config, stdout: &mut W) -> Result<Outcome, AppError> {
    let registry = load_registry(config)?;
    serde_json::to_writer_pretty(&mut *stdout, &LanguageListing::new(&registry))
        .map_err(AppError::SerialiseLanguages)?;
    stdout.write_all(b"\n")?;
    Ok(Outcome::Clean)
}
