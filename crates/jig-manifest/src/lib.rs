//! Editor manifest contributions for generated Jig grammars.
//!
//! The grammar generator describes what it produced as [`Contributions`]:
//! language registrations and grammar registrations in the shape the editor's
//! extension manifest expects. [`reconcile`] merges those into a
//! [`Manifest`], replacing previously generated entries while leaving
//! hand-authored ones untouched.
//!
//! ```no_run
//! use camino::Utf8Path;
//! use jig_manifest::{Contributions, Manifest, ReconcileOptions, reconcile};
//!
//! let mut manifest = Manifest::from_path(Utf8Path::new("package.json"))?;
//! let report = reconcile(
//!     &mut manifest,
//!     &Contributions::default(),
//!     &ReconcileOptions::default(),
//! )?;
//! assert!(report.conflicts().is_empty());
//! # Ok::<(), jig_manifest::ManifestError>(())
//! ```

mod contribution;
mod error;
mod manifest;
mod reconcile;

pub use contribution::{Contributions, GrammarContribution, LanguageContribution};
pub use error::ManifestError;
pub use manifest::Manifest;
pub use reconcile::{
    Conflict, ConflictKind, ConflictReason, ReconcileOptions, ReconcileReport, reconcile,
};

#[cfg(test)]
mod tests;
