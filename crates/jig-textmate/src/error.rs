//! Error types for tokenization and the test harness.

use std::io;

use camino::Utf8PathBuf;
use jig_manifest::ManifestError;
use thiserror::Error;

/// Errors raised while compiling or running a tokenizer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TokenizeError {
    /// The requested root grammar is not registered.
    #[error("no grammar registered for scope '{scope}'")]
    UnknownGrammar {
        /// The requested root scope.
        scope: String,
    },

    /// A rule's regex failed to compile.
    #[error("invalid regex /{pattern}/: {message}")]
    Regex {
        /// Pattern source after anchor and back-reference substitution.
        pattern: String,
        /// Oniguruma's description of the failure.
        message: String,
    },
}

impl TokenizeError {
    /// Creates an unknown grammar error.
    #[must_use]
    pub fn unknown_grammar(scope: impl Into<String>) -> Self {
        Self::UnknownGrammar {
            scope: scope.into(),
        }
    }

    /// Creates a regex compilation error.
    #[must_use]
    pub fn regex(pattern: impl Into<String>, error: &onig::Error) -> Self {
        Self::Regex {
            pattern: pattern.into(),
            message: error.to_string(),
        }
    }
}

/// Errors raised while assembling a harness from disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HarnessError {
    /// The manifest could not be loaded or has an unexpected shape.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// A grammar file could not be read.
    #[error("failed to read grammar {path}: {source}")]
    Read {
        /// Path of the grammar file.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },

    /// A grammar file is not a valid TextMate grammar.
    #[error("malformed grammar {path}: {source}")]
    Parse {
        /// Path, or fixture name, of the grammar.
        path: Utf8PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },

    /// Tokenization failed.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
}

impl HarnessError {
    /// Creates a read error for `path`.
    #[must_use]
    pub fn read(path: impl Into<Utf8PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse error for `path`.
    #[must_use]
    pub fn parse(path: impl Into<Utf8PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}
