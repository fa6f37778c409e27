//! Error types for registry loading and validation.
//!
//! Every variant is a configuration error: generation must abort before any
//! artefact is written when one of these is raised.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a language registry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read registry {path}: {source}")]
    Read {
        /// Path that failed to load.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },

    /// The registry document is not valid JSON or does not match the schema.
    #[error("malformed registry record: {source}")]
    Parse {
        /// Underlying deserialisation failure.
        #[source]
        source: serde_json::Error,
    },

    /// The registry declares no languages.
    #[error("registry declares no languages")]
    Empty,

    /// A language identifier is not usable in scope names and file names.
    #[error("invalid language id '{id}': expected lower-case words joined by '-'")]
    InvalidId {
        /// The rejected identifier.
        id: String,
    },

    /// Two descriptors share the same identifier.
    #[error("duplicate language id '{id}'")]
    DuplicateId {
        /// The repeated identifier.
        id: String,
    },

    /// A language name (id or alias) is empty or contains whitespace.
    #[error("language '{language}' declares an unusable name '{name}'")]
    InvalidName {
        /// Language declaring the name.
        language: String,
        /// The rejected name.
        name: String,
    },

    /// Two languages claim the same case-folded name.
    #[error("name '{name}' is claimed by both '{first}' and '{second}'")]
    AliasCollision {
        /// The ambiguous name, case-folded.
        name: String,
        /// Language that claimed the name first.
        first: String,
        /// Language that claimed the name second.
        second: String,
    },

    /// A descriptor has no host grammar scope to delegate to.
    #[error("language '{id}' has an empty host grammar scope")]
    MissingHostScope {
        /// Identifier of the incomplete descriptor.
        id: String,
    },

    /// A reserved tag name is not a valid tag identifier.
    #[error("invalid reserved tag name '{name}'")]
    InvalidReservedTag {
        /// The rejected tag name.
        name: String,
    },

    /// A reserved tag name appears more than once.
    #[error("reserved tag '{name}' is declared more than once")]
    DuplicateReservedTag {
        /// The repeated tag name.
        name: String,
    },
}

impl RegistryError {
    /// Creates a read error for `path`.
    #[must_use]
    pub fn read(path: impl Into<Utf8PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub const fn parse(source: serde_json::Error) -> Self {
        Self::Parse { source }
    }

    /// Creates an invalid identifier error.
    #[must_use]
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId { id: id.into() }
    }

    /// Creates a duplicate identifier error.
    #[must_use]
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    /// Creates an invalid name error.
    #[must_use]
    pub fn invalid_name(language: impl Into<String>, name: impl Into<String>) -> Self {
        Self::InvalidName {
            language: language.into(),
            name: name.into(),
        }
    }

    /// Creates an alias collision error.
    #[must_use]
    pub fn alias_collision(
        name: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::AliasCollision {
            name: name.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Creates a missing host scope error.
    #[must_use]
    pub fn missing_host_scope(id: impl Into<String>) -> Self {
        Self::MissingHostScope { id: id.into() }
    }
}
