//! Reserved tag names.
//!
//! The reserved set is the single source for every tag name that has a
//! dedicated meaning: the closing marker, alternate-branch markers, and
//! inline tags that never open a block. Grammar generation derives its
//! exclusion lists from here, and so do the completion and link providers
//! that consume the registry.

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// The registry's reserved tag vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReservedTags {
    #[serde(default = "default_closing")]
    closing: String,
    #[serde(default = "default_alternates")]
    alternates: Vec<String>,
    #[serde(default = "default_inline")]
    inline: Vec<String>,
}

fn default_closing() -> String {
    String::from("end")
}

fn default_alternates() -> Vec<String> {
    vec![String::from("else"), String::from("elseif")]
}

fn default_inline() -> Vec<String> {
    ["include", "includeIf", "set", "inject", "debugger", "eval", "newError"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ReservedTags {
    fn default() -> Self {
        Self {
            closing: default_closing(),
            alternates: default_alternates(),
            inline: default_inline(),
        }
    }
}

impl ReservedTags {
    /// Creates a reserved set from explicit groups.
    #[must_use]
    pub fn new<A, I>(closing: impl Into<String>, alternates: A, inline: I) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            closing: closing.into(),
            alternates: alternates.into_iter().map(Into::into).collect(),
            inline: inline.into_iter().map(Into::into).collect(),
        }
    }

    /// The closing marker name (`end`).
    #[must_use]
    pub fn closing(&self) -> &str {
        &self.closing
    }

    /// Alternate-branch names (`else`, `elseif`).
    #[must_use]
    pub fn alternates(&self) -> &[String] {
        &self.alternates
    }

    /// Inline tag names that never open a block.
    #[must_use]
    pub fn inline(&self) -> &[String] {
        &self.inline
    }

    /// Names that have dedicated argument-less rules and must be excluded
    /// from the generic tag rule.
    pub fn dedicated(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.closing.as_str()).chain(self.alternates.iter().map(String::as_str))
    }

    /// Every reserved name, in declaration order.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.dedicated()
            .chain(self.inline.iter().map(String::as_str))
    }

    /// Whether `name` is reserved.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.all().any(|reserved| reserved == name)
    }

    pub(crate) fn validate(&self) -> Result<(), RegistryError> {
        let mut seen: Vec<&str> = Vec::new();
        for name in self.all() {
            if !is_tag_name(name) {
                return Err(RegistryError::InvalidReservedTag {
                    name: name.to_owned(),
                });
            }
            if seen.contains(&name) {
                return Err(RegistryError::DuplicateReservedTag {
                    name: name.to_owned(),
                });
            }
            seen.push(name);
        }
        Ok(())
    }
}

fn is_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}
