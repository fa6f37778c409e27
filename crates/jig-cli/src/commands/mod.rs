//! Subcommand implementations.
//!
//! `generate` and `check` share [`Plan`]: everything a run would write,
//! computed in memory before anything touches the disk.

mod check;
mod generate;
mod languages;
mod tokenize;

pub(crate) use check::check;
pub(crate) use generate::generate;
pub(crate) use languages::languages;
pub(crate) use tokenize::tokenize;
#[cfg(test)]
pub(crate) use languages::LanguageEntry;
#[cfg(test)]
pub(crate) use tokenize::infer_scope;

use jig_config::Config;
use jig_grammar::GrammarFamily;
use jig_grammar::family::{Artifact, ArtifactLayout};
use jig_manifest::{Manifest, ReconcileOptions, ReconcileReport, reconcile};
use jig_registry::Registry;
use tracing::debug;

use crate::errors::AppError;

/// Whether a command found the tree in the expected state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Clean,
    Drift,
}

/// Loads the configured registry, or the built-in catalogue.
pub(crate) fn load_registry(config: &Config) -> Result<Registry, AppError> {
    let registry = config
        .registry()
        .map_or_else(Registry::builtin, Registry::from_path)?;
    debug!(languages = registry.len(), "loaded language registry");
    Ok(registry)
}

/// The artefacts and manifest a generation run produces.
pub(crate) struct Plan {
    pub(crate) layout: ArtifactLayout,
    pub(crate) artifacts: Vec<Artifact>,
    pub(crate) current: Manifest,
    pub(crate) reconciled: Manifest,
    pub(crate) report: ReconcileReport,
}

impl Plan {
    /// Validates configuration, generates every grammar, and reconciles a
    /// copy of the manifest.
    pub(crate) fn prepare(config: &Config) -> Result<Self, AppError> {
        config.validate()?;
        let registry = load_registry(config)?;
        let family = GrammarFamily::generate(&registry)?;
        let layout = ArtifactLayout::new(config.output_dir(), config.manifest())?;
        let artifacts = family.artifacts()?;
        let current = Manifest::from_path(config.manifest())?;
        let mut reconciled = current.clone();
        let options =
            ReconcileOptions::default().with_generated_dir(layout.manifest_relative_dir());
        let report = reconcile(&mut reconciled, &family.contributions(&layout), &options)?;
        Ok(Self {
            layout,
            artifacts,
            current,
            reconciled,
            report,
        })
    }

    /// Whether reconciliation changed the manifest.
    pub(crate) fn manifest_changed(&self) -> bool {
        self.current != self.reconciled
    }
}
