//! Configuration errors.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Command-line arguments could not be parsed.
    #[error(transparent)]
    Arguments(#[from] clap::Error),

    /// The manifest path does not name a file.
    #[error("manifest path {path} does not name a file")]
    ManifestPath {
        /// The rejected path.
        path: Utf8PathBuf,
    },

    /// The output directory does not lie under the manifest's directory.
    #[error("output directory {output} must live inside the manifest directory {manifest_dir}")]
    OutputOutsideManifest {
        /// The configured output directory.
        output: Utf8PathBuf,
        /// Directory holding the manifest.
        manifest_dir: Utf8PathBuf,
    },
}

impl ConfigError {
    /// Builds a [`ConfigError::OutputOutsideManifest`].
    #[must_use]
    pub fn output_outside_manifest(
        output: impl Into<Utf8PathBuf>,
        manifest_dir: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self::OutputOutsideManifest {
            output: output.into(),
            manifest_dir: manifest_dir.into(),
        }
    }
}
