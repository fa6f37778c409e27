//! The TextMate grammar data model.
//!
//! These types serialise to the JSON rule format read by TextMate-compatible
//! engines. Field order follows the conventional layout of hand-written
//! grammars so generated files diff cleanly. Unknown fields found in
//! third-party grammars are ignored on input.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Capture index to the rule applied to that capture.
pub type Captures = BTreeMap<u32, Rule>;

/// Named rules shared within a grammar.
pub type Repository = BTreeMap<String, Rule>;

/// One TextMate rule: a match, a begin/end or begin/while region, an
/// include, or a bare pattern list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Include reference (`#name`, `$self`, `$base`, `scope`, `scope#name`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
    /// Scope applied to the whole match or region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Scope applied between the begin and end matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_name: Option<String>,
    /// Single-match regex.
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub match_pattern: Option<String>,
    /// Region opening regex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin: Option<String>,
    /// Region closing regex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// Per-line continuation regex.
    #[serde(rename = "while", default, skip_serializing_if = "Option::is_none")]
    pub while_pattern: Option<String>,
    /// Captures of `match`, and the fallback for the region captures.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub captures: Captures,
    /// Captures of `begin`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub begin_captures: Captures,
    /// Captures of `end`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub end_captures: Captures,
    /// Captures of `while`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub while_captures: Captures,
    /// Try `end` after the nested patterns rather than before.
    #[serde(
        default,
        deserialize_with = "flag",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub apply_end_pattern_last: bool,
    /// Nested patterns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<Rule>,
    /// Rules visible to the nested patterns only.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub repository: Repository,
}

impl Rule {
    /// An include reference.
    #[must_use]
    pub fn include(reference: impl Into<String>) -> Self {
        Self {
            include: Some(reference.into()),
            ..Self::default()
        }
    }

    /// A reference to a repository entry of the same grammar.
    #[must_use]
    pub fn local(name: &str) -> Self {
        Self::include(format!("#{name}"))
    }

    /// A rule that only assigns a scope, as used inside capture maps.
    #[must_use]
    pub fn scope(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A single-match rule.
    #[must_use]
    pub fn matching(pattern: impl Into<String>) -> Self {
        Self {
            match_pattern: Some(pattern.into()),
            ..Self::default()
        }
    }

    /// A begin/end region.
    #[must_use]
    pub fn begin_end(begin: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            begin: Some(begin.into()),
            end: Some(end.into()),
            ..Self::default()
        }
    }

    /// A begin/while region.
    #[must_use]
    pub fn begin_while(begin: impl Into<String>, while_pattern: impl Into<String>) -> Self {
        Self {
            begin: Some(begin.into()),
            while_pattern: Some(while_pattern.into()),
            ..Self::default()
        }
    }

    /// A bare pattern list.
    #[must_use]
    pub fn group(patterns: Vec<Self>) -> Self {
        Self {
            patterns,
            ..Self::default()
        }
    }

    /// Sets `name`.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets `contentName`.
    #[must_use]
    pub fn with_content_name(mut self, name: impl Into<String>) -> Self {
        self.content_name = Some(name.into());
        self
    }

    /// Sets `captures`.
    #[must_use]
    pub fn with_captures(mut self, captures: Captures) -> Self {
        self.captures = captures;
        self
    }

    /// Sets `beginCaptures`.
    #[must_use]
    pub fn with_begin_captures(mut self, captures: Captures) -> Self {
        self.begin_captures = captures;
        self
    }

    /// Sets `endCaptures`.
    #[must_use]
    pub fn with_end_captures(mut self, captures: Captures) -> Self {
        self.end_captures = captures;
        self
    }

    /// Sets `whileCaptures`.
    #[must_use]
    pub fn with_while_captures(mut self, captures: Captures) -> Self {
        self.while_captures = captures;
        self
    }

    /// Sets the nested patterns.
    #[must_use]
    pub fn with_patterns(mut self, patterns: Vec<Self>) -> Self {
        self.patterns = patterns;
        self
    }

    /// Visits this rule and every rule nested inside it, depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Self)) {
        visit(self);
        let captures = [
            &self.captures,
            &self.begin_captures,
            &self.end_captures,
            &self.while_captures,
        ];
        for capture in captures.into_iter().flat_map(BTreeMap::values) {
            capture.walk(visit);
        }
        for pattern in &self.patterns {
            pattern.walk(visit);
        }
        for nested in self.repository.values() {
            nested.walk(visit);
        }
    }
}

/// Builds a capture map from `(index, scope)` pairs.
#[must_use]
pub fn captures<'a>(entries: impl IntoIterator<Item = (u32, &'a str)>) -> Captures {
    entries
        .into_iter()
        .map(|(index, scope)| (index, Rule::scope(scope)))
        .collect()
}

/// A complete grammar file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grammar {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Root scope.
    pub scope_name: String,
    /// Selector under which the whole grammar is injected, for injection
    /// grammars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injection_selector: Option<String>,
    /// Top-level patterns in priority order.
    #[serde(default)]
    pub patterns: Vec<Rule>,
    /// Named rules.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub repository: Repository,
    /// Selector to injected rule, in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub injections: IndexMap<String, Rule>,
}

impl Grammar {
    /// Creates an empty grammar with the given root scope.
    #[must_use]
    pub fn new(scope_name: impl Into<String>) -> Self {
        Self {
            scope_name: scope_name.into(),
            ..Self::default()
        }
    }

    /// Visits every rule in the grammar: top-level patterns, repository
    /// entries, and injections.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Rule)) {
        for rule in self
            .patterns
            .iter()
            .chain(self.repository.values())
            .chain(self.injections.values())
        {
            rule.walk(visit);
        }
    }
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Number(value) => value != 0,
    })
}
