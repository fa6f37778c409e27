//! Default values shared by the command-line parser and deserialisation.

use camino::Utf8PathBuf;

use crate::logging::LogFormat;

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default extension manifest path.
pub const DEFAULT_MANIFEST: &str = "package.json";

/// Default directory for generated grammar files.
pub const DEFAULT_OUTPUT_DIR: &str = "syntaxes/generated";

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default manifest path.
#[must_use]
pub fn default_manifest() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_MANIFEST)
}

/// Default output directory.
#[must_use]
pub fn default_output_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_OUTPUT_DIR)
}
