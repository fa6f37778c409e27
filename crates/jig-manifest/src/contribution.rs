//! Manifest entries produced by grammar generation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A `contributes.languages` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageContribution {
    /// Editor language identifier, for example `jig-html`.
    pub id: String,
    /// Human-readable names shown by the editor.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// File suffixes associated with the language.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,
    /// Literal file names associated with the language.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filenames: Vec<String>,
    /// Path to the shared language configuration, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,
}

/// A `contributes.grammars` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarContribution {
    /// Language the grammar highlights; absent for injection-only grammars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Root scope of the grammar.
    pub scope_name: String,
    /// Manifest-relative path of the grammar file.
    pub path: String,
    /// Content scope to editor language id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub embedded_languages: BTreeMap<String, String>,
    /// Root scopes this grammar is injected into.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inject_to: Vec<String>,
}

/// Everything a generation run contributes to the manifest, in generation
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributions {
    /// Generated language registrations.
    pub languages: Vec<LanguageContribution>,
    /// Generated grammar registrations.
    pub grammars: Vec<GrammarContribution>,
}

impl Contributions {
    /// Whether nothing was contributed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty() && self.grammars.is_empty()
    }
}
