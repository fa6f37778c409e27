//! Language descriptors: one record per supported host language.
//!
//! A descriptor names the pre-existing grammar that handles the host
//! language's own syntax and the properties that change how Jig regions are
//! composed around it.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// A host language Jig can embed and be embedded in.
///
/// Descriptors are loaded once per generation run and never mutated
/// afterwards; the builder-style `with_*` methods exist for constructing
/// registries in code and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LanguageDescriptor {
    id: String,
    display_name: String,
    #[serde(default)]
    file_extensions: Vec<String>,
    host_grammar_scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    editor_language_id: Option<String>,
    #[serde(default)]
    alias_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    injection_target: Option<String>,
    #[serde(default)]
    has_greedy_contexts: bool,
    #[serde(default)]
    markup_scopes: Vec<String>,
}

impl LanguageDescriptor {
    /// Creates a descriptor with no aliases, file associations, or flags.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        host_grammar_scope: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            file_extensions: Vec::new(),
            host_grammar_scope: host_grammar_scope.into(),
            editor_language_id: None,
            alias_names: Vec::new(),
            injection_target: None,
            has_greedy_contexts: false,
            markup_scopes: Vec::new(),
        }
    }

    /// Adds alias names accepted inside embed markers.
    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alias_names.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Adds file associations (suffixes starting with `.` or literal names).
    #[must_use]
    pub fn with_file_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_extensions
            .extend(extensions.into_iter().map(Into::into));
        self
    }

    /// Overrides the editor language identifier.
    #[must_use]
    pub fn with_editor_language_id(mut self, editor_language_id: impl Into<String>) -> Self {
        self.editor_language_id = Some(editor_language_id.into());
        self
    }

    /// Overrides the scope the primary injection is anchored at.
    #[must_use]
    pub fn with_injection_target(mut self, injection_target: impl Into<String>) -> Self {
        self.injection_target = Some(injection_target.into());
        self
    }

    /// Marks the host grammar as containing greedy multi-line contexts.
    #[must_use]
    pub const fn greedy(mut self) -> Self {
        self.has_greedy_contexts = true;
        self
    }

    /// Declares the host grammar's own tag and attribute scopes.
    #[must_use]
    pub fn with_markup_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.markup_scopes.extend(scopes.into_iter().map(Into::into));
        self
    }

    /// Unique short identifier, for example `typescript`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name, for example `TypeScript`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Ordered file associations.
    #[must_use]
    pub fn file_extensions(&self) -> &[String] {
        &self.file_extensions
    }

    /// Scope of the independently maintained grammar for this language.
    #[must_use]
    pub fn host_grammar_scope(&self) -> &str {
        &self.host_grammar_scope
    }

    /// Identifier understood by the editor, defaulting to [`Self::id`].
    #[must_use]
    pub fn editor_language_id(&self) -> &str {
        self.editor_language_id.as_deref().unwrap_or(&self.id)
    }

    /// Additional names accepted inside embed markers.
    #[must_use]
    pub fn alias_names(&self) -> &[String] {
        &self.alias_names
    }

    /// Explicit anchor for the primary injection, if any.
    #[must_use]
    pub fn injection_target(&self) -> Option<&str> {
        self.injection_target.as_deref()
    }

    /// Whether the host grammar can absorb lines across blank lines.
    #[must_use]
    pub const fn has_greedy_contexts(&self) -> bool {
        self.has_greedy_contexts
    }

    /// The host grammar's own tag and attribute scope prefixes.
    #[must_use]
    pub fn markup_scopes(&self) -> &[String] {
        &self.markup_scopes
    }

    /// Whether the host is a markup language with nested tag regions.
    #[must_use]
    pub fn is_markup(&self) -> bool {
        !self.markup_scopes.is_empty()
    }

    /// Every name this language answers to: the id followed by its aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.id.as_str()).chain(self.alias_names.iter().map(String::as_str))
    }

    /// First segment of the host grammar scope (`text`, `source`, ...).
    ///
    /// Falls back to `source` when the scope has no usable first segment.
    #[must_use]
    pub fn scope_category(&self) -> &str {
        self.host_grammar_scope
            .split('.')
            .next()
            .filter(|segment| !segment.is_empty())
            .unwrap_or("source")
    }

    /// Whether `path` is associated with this language.
    ///
    /// Suffix entries (starting with `.`) match the end of the file name;
    /// any other entry must equal the file name exactly.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use jig_registry::LanguageDescriptor;
    ///
    /// let html = LanguageDescriptor::new("html", "HTML", "text.html.basic")
    ///     .with_file_extensions([".html.jig"]);
    /// assert!(html.matches_path(Path::new("views/home.html.jig")));
    /// assert!(!html.matches_path(Path::new("views/home.html")));
    /// ```
    #[must_use]
    pub fn matches_path(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            return false;
        };
        self.file_extensions.iter().any(|association| {
            if association.starts_with('.') {
                file_name.len() > association.len() && file_name.ends_with(association.as_str())
            } else {
                file_name == association
            }
        })
    }
}
