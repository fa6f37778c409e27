//! Shared configuration for the Jig grammar tooling.
//!
//! [`Config`] is a `clap` argument group flattened into the command-line
//! front end. Each setting comes from a flag or its `JIG_*` environment
//! variable. The struct also derives `serde`, so embedders and tests can
//! build one from a JSON document; missing fields take their defaults. The
//! registry falls back to the built-in language catalogue when no path is
//! given.

mod defaults;
mod error;
mod logging;

use std::ffi::OsString;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use clap::{Args, Parser};
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_MANIFEST, DEFAULT_OUTPUT_DIR, default_log_filter_string,
    default_log_format, default_manifest, default_output_dir,
};
pub use error::ConfigError;
pub use logging::{LogFormat, LogFormatParseError};

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Args, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Language registry JSON; the built-in catalogue is used when absent.
    #[arg(long, global = true, env = "JIG_REGISTRY", value_name = "PATH")]
    #[serde(default)]
    registry: Option<Utf8PathBuf>,

    /// Extension manifest to reconcile.
    #[arg(
        long,
        global = true,
        env = "JIG_MANIFEST",
        value_name = "PATH",
        default_value = DEFAULT_MANIFEST
    )]
    #[serde(default = "default_manifest")]
    manifest: Utf8PathBuf,

    /// Directory receiving generated grammars; must be inside the manifest's
    /// directory.
    #[arg(
        long,
        global = true,
        env = "JIG_OUTPUT_DIR",
        value_name = "DIR",
        default_value = DEFAULT_OUTPUT_DIR
    )]
    #[serde(default = "default_output_dir")]
    output_dir: Utf8PathBuf,

    /// Tracing filter expression, for example `jig_grammar=debug`.
    #[arg(
        long,
        global = true,
        env = "JIG_LOG",
        value_name = "FILTER",
        default_value = DEFAULT_LOG_FILTER
    )]
    #[serde(default = "default_log_filter_string")]
    log_filter: String,

    /// Log output format: `compact` or `json`.
    #[arg(
        long,
        global = true,
        env = "JIG_LOG_FORMAT",
        value_name = "FORMAT",
        default_value_t = LogFormat::Compact
    )]
    #[serde(default = "default_log_format")]
    log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: None,
            manifest: default_manifest(),
            output_dir: default_output_dir(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "jig")]
struct Standalone {
    #[command(flatten)]
    config: Config,
}

impl Config {
    /// Parses and validates configuration from command-line arguments.
    ///
    /// The first item is the program name, as with `std::env::args_os`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Arguments`] when parsing fails and any error
    /// from [`Config::validate`].
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let config = Standalone::try_parse_from(args)?.config;
        config.validate()?;
        Ok(config)
    }

    /// Checks the relationships between paths.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ManifestPath`] when the manifest path has no
    /// file name and [`ConfigError::OutputOutsideManifest`] when the output
    /// directory is not strictly inside the manifest's directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.manifest.file_name().is_none() {
            return Err(ConfigError::ManifestPath {
                path: self.manifest.clone(),
            });
        }
        let manifest_dir = self.manifest_dir();
        let inside = self.output_dir.is_absolute() == manifest_dir.is_absolute()
            && without_current_dir(&self.output_dir)
                .strip_prefix(without_current_dir(manifest_dir))
                .is_ok_and(|relative| {
                    !relative.as_str().is_empty()
                        && !relative
                            .components()
                            .any(|component| component == Utf8Component::ParentDir)
                });
        if inside {
            Ok(())
        } else {
            Err(ConfigError::output_outside_manifest(
                &self.output_dir,
                manifest_dir,
            ))
        }
    }

    /// Registry path, if one was configured.
    #[must_use]
    pub fn registry(&self) -> Option<&Utf8Path> {
        self.registry.as_deref()
    }

    /// Manifest path.
    #[must_use]
    pub fn manifest(&self) -> &Utf8Path {
        &self.manifest
    }

    /// Directory holding the manifest.
    #[must_use]
    pub fn manifest_dir(&self) -> &Utf8Path {
        self.manifest.parent().unwrap_or_else(|| Utf8Path::new(""))
    }

    /// Output directory for generated grammars.
    #[must_use]
    pub fn output_dir(&self) -> &Utf8Path {
        &self.output_dir
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Replaces the registry path.
    #[must_use]
    pub fn with_registry(mut self, registry: impl Into<Utf8PathBuf>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    /// Replaces the manifest path.
    #[must_use]
    pub fn with_manifest(mut self, manifest: impl Into<Utf8PathBuf>) -> Self {
        self.manifest = manifest.into();
        self
    }

    /// Replaces the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<Utf8PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }
}

fn without_current_dir(path: &Utf8Path) -> &Utf8Path {
    path.strip_prefix(".").unwrap_or(path)
}

#[cfg(test)]
mod tests;
