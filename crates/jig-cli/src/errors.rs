//! Error types for the command-line runtime.

use std::io;

use camino::Utf8PathBuf;
use jig_config::ConfigError;
use jig_grammar::GrammarError;
use jig_manifest::ManifestError;
use jig_registry::RegistryError;
use jig_textmate::HarnessError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

/// Failures surfaced to the operator as `error: <diagnostic>`.
#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Harness(#[from] HarnessError),
    #[error("failed to read {path}: {source}")]
    ReadDocument {
        path: Utf8PathBuf,
        source: io::Error,
    },
    #[error("cannot infer a grammar for {path}; pass --scope")]
    UnknownDocument { path: Utf8PathBuf },
    #[error("failed to serialise the language listing: {0}")]
    SerialiseLanguages(serde_json::Error),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl AppError {
    pub(crate) fn read_document(path: impl Into<Utf8PathBuf>, source: io::Error) -> Self {
        Self::ReadDocument {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn unknown_document(path: impl Into<Utf8PathBuf>) -> Self {
        Self::UnknownDocument { path: path.into() }
    }
}
