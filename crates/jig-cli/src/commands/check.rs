//! `check`: compare a fresh generation with the files on disk.

use std::io::Write;

use jig_config::Config;
use jig_grammar::family::check_artifacts;
use tracing::info;

use super::{Outcome, Plan};
use crate::errors::AppError;

pub(crate) fn check<W: Write>(config: &Config, stdout: &mut W) -> Result<Outcome, AppError> {
    let plan = Plan::prepare(config)?;
    let drift = check_artifacts(plan.layout.output_dir(), &plan.artifacts)?;
    for entry in &drift {
        writeln!(stdout, "{entry}")?;
    }
    let manifest_changed = plan.manifest_changed();
    if manifest_changed {
        writeln!(stdout, "out of date {}", config.manifest())?;
    }
    info!(drift = drift.len(), manifest_changed, "check complete");

    if drift.is_empty() && !manifest_changed {
        writeln!(stdout, "grammars and manifest are up to date")?;
        Ok(Outcome::Clean)
    } else {
        Ok(Outcome::Drift)
    }
}
