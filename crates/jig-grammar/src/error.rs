//! Error types for grammar generation.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while composing, validating, or writing grammars.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GrammarError {
    /// An embed was requested for a language outside the registry.
    #[error("language '{id}' is not registered")]
    UnregisteredLanguage {
        /// The unknown language id.
        id: String,
    },

    /// A target name would make the open-marker regex match two languages.
    #[error("embed target '{target}' is ambiguous: name '{name}' is also claimed by '{other}'")]
    AmbiguousTarget {
        /// Target whose rule was being built.
        target: String,
        /// The shared name, case-folded.
        name: String,
        /// The other language claiming it.
        other: String,
    },

    /// A `#name` include has no repository entry.
    #[error("grammar '{scope}' includes '{reference}', which is not in its repository")]
    UnresolvedInclude {
        /// Grammar root scope.
        scope: String,
        /// The dangling include.
        reference: String,
    },

    /// The primary injection's exclusions differ from the produced content
    /// scopes.
    #[error(
        "grammar '{scope}' excludes [{}] from its primary injection but produces [{}]",
        .excluded.join(", "),
        .produced.join(", ")
    )]
    ExclusionMismatch {
        /// Grammar root scope.
        scope: String,
        /// Content scopes excluded by the primary injection.
        excluded: Vec<String>,
        /// Content scopes produced by the grammar's embeds.
        produced: Vec<String>,
    },

    /// The output directory does not lie under the manifest's directory.
    #[error("output directory {output} is not inside {manifest_dir}")]
    OutputOutsideManifest {
        /// Requested output directory.
        output: Utf8PathBuf,
        /// Directory holding the manifest.
        manifest_dir: Utf8PathBuf,
    },

    /// A grammar could not be serialised.
    #[error("failed to serialise grammar '{scope}': {source}")]
    Serialise {
        /// Grammar root scope.
        scope: String,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },

    /// An artefact could not be read, written, or removed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// Path of the artefact.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
}

impl GrammarError {
    /// Creates an unregistered language error.
    #[must_use]
    pub fn unregistered(id: impl Into<String>) -> Self {
        Self::UnregisteredLanguage { id: id.into() }
    }

    /// Creates an ambiguous target error.
    #[must_use]
    pub fn ambiguous_target(
        target: impl Into<String>,
        name: impl Into<String>,
        other: impl Into<String>,
    ) -> Self {
        Self::AmbiguousTarget {
            target: target.into(),
            name: name.into(),
            other: other.into(),
        }
    }

    /// Creates an unresolved include error.
    #[must_use]
    pub fn unresolved_include(scope: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::UnresolvedInclude {
            scope: scope.into(),
            reference: reference.into(),
        }
    }

    /// Creates a serialisation error.
    #[must_use]
    pub fn serialise(scope: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialise {
            scope: scope.into(),
            source,
        }
    }

    /// Creates an IO error for `path`.
    #[must_use]
    pub fn io(path: impl Into<Utf8PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
