//! `generate`: write the grammar family and reconcile the manifest.

use std::io::Write;

use jig_config::Config;
use jig_grammar::family::write_artifacts;
use tracing::info;

use super::{Outcome, Plan};
use crate::errors::AppError;

pub(crate) fn generate<W: Write>(config: &Config, stdout: &mut W) -> Result<Outcome, AppError> {
    let plan = Plan::prepare(config)?;
    let files = write_artifacts(plan.layout.output_dir(), &plan.artifacts)?;
    if plan.manifest_changed() {
        plan.reconciled.write(config.manifest())?;
    }
    info!(
        written = files.written.len(),
        unchanged = files.unchanged.len(),
        removed = files.removed.len(),
        manifest_changed = plan.manifest_changed(),
        conflicts = plan.report.conflicts().len(),
        "generation complete"
    );

    writeln!(
        stdout,
        "{} grammars in {}: {} written, {} unchanged, {} removed",
        plan.artifacts.len(),
        plan.layout.output_dir(),
        files.written.len(),
        files.unchanged.len(),
        files.removed.len()
    )?;
    if plan.manifest_changed() {
        writeln!(
            stdout,
            "updated {}: {} languages, {} grammars",
            config.manifest(),
            plan.report.added_languages().len(),
            plan.report.added_grammars().len()
        )?;
    } else {
        writeln!(stdout, "{} unchanged", config.manifest())?;
    }
    for conflict in plan.report.conflicts() {
        writeln!(stdout, "skipped {conflict}")?;
    }
    Ok(Outcome::Clean)
}
