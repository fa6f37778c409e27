//! Error types for manifest loading and writing.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while reading, interpreting, or writing a manifest.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ManifestError {
    /// The manifest could not be read.
    #[error("failed to read manifest {path}: {source}")]
    Read {
        /// Manifest path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },

    /// The manifest could not be written.
    #[error("failed to write manifest {path}: {source}")]
    Write {
        /// Manifest path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },

    /// The manifest is not valid JSON.
    #[error("malformed manifest: {source}")]
    Parse {
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },

    /// A section of the manifest does not have the expected shape.
    #[error("manifest field '{field}' {problem}")]
    Shape {
        /// Dotted path of the offending field.
        field: String,
        /// What is wrong with it.
        problem: String,
    },
}

impl ManifestError {
    /// Creates a read error for `path`.
    #[must_use]
    pub fn read(path: impl Into<Utf8PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a write error for `path`.
    #[must_use]
    pub fn write(path: impl Into<Utf8PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub const fn parse(source: serde_json::Error) -> Self {
        Self::Parse { source }
    }

    /// Creates a shape error for `field`.
    #[must_use]
    pub fn shape(field: impl Into<String>, problem: impl Into<String>) -> Self {
        Self::Shape {
            field: field.into(),
            problem: problem.into(),
        }
    }
}
