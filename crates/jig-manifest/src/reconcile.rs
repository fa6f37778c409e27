//! Merging generated contributions into a manifest.
//!
//! A grammar entry counts as generated when its `path` lies under the
//! generated directory. A language entry counts as generated when a
//! generated grammar refers to it. Everything else is hand-authored and is
//! never modified: generated entries that would collide with it are skipped
//! and reported instead.

use std::collections::BTreeSet;
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use tracing::{info, warn};

use crate::contribution::Contributions;
use crate::error::ManifestError;
use crate::manifest::Manifest;

/// Which section a conflict was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// A `contributes.languages` entry.
    Language,
    /// A `contributes.grammars` entry.
    Grammar,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Language => f.write_str("language"),
            Self::Grammar => f.write_str("grammar"),
        }
    }
}

/// Why a generated entry was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// The key is on the protected list.
    Protected,
    /// A hand-authored entry already uses the key.
    HandAuthored,
    /// The grammar belongs to a language that was itself skipped.
    LanguageSkipped,
}

/// A generated entry that was not written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    kind: ConflictKind,
    key: String,
    reason: ConflictReason,
}

impl Conflict {
    /// Section of the skipped entry.
    #[must_use]
    pub const fn kind(&self) -> ConflictKind {
        self.kind
    }

    /// Language id or grammar scope of the skipped entry.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Why the entry was skipped.
    #[must_use]
    pub const fn reason(&self) -> ConflictReason {
        self.reason
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let why = match self.reason {
            ConflictReason::Protected => "is protected",
            ConflictReason::HandAuthored => "is already declared by a hand-authored entry",
            ConflictReason::LanguageSkipped => "belongs to a skipped language",
        };
        write!(f, "{} '{}' {why}", self.kind, self.key)
    }
}

/// Settings controlling which entries reconciliation may touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOptions {
    generated_dir: Utf8PathBuf,
    protected_languages: Vec<String>,
    protected_scopes: Vec<String>,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            generated_dir: Utf8PathBuf::from("syntaxes/generated"),
            protected_languages: vec![String::from("jig")],
            protected_scopes: Vec::new(),
        }
    }
}

impl ReconcileOptions {
    /// Sets the manifest-relative directory holding generated grammars.
    #[must_use]
    pub fn with_generated_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.generated_dir = dir.into();
        self
    }

    /// Adds a language id that generated entries may never claim.
    #[must_use]
    pub fn protect_language(mut self, id: impl Into<String>) -> Self {
        self.protected_languages.push(id.into());
        self
    }

    /// Adds a grammar scope that generated entries may never claim.
    #[must_use]
    pub fn protect_scope(mut self, scope: impl Into<String>) -> Self {
        self.protected_scopes.push(scope.into());
        self
    }

    /// The generated directory.
    #[must_use]
    pub fn generated_dir(&self) -> &Utf8Path {
        &self.generated_dir
    }

    /// Whether a grammar `path` from the manifest lies under the generated
    /// directory.
    #[must_use]
    pub fn is_generated_path(&self, path: &str) -> bool {
        let path = strip_current_dir(Utf8Path::new(path));
        let dir = strip_current_dir(&self.generated_dir);
        path != dir && path.starts_with(dir)
    }

    fn is_protected_language(&self, id: &str) -> bool {
        self.protected_languages.iter().any(|protected| protected == id)
    }

    fn is_protected_scope(&self, scope: &str) -> bool {
        self.protected_scopes.iter().any(|protected| protected == scope)
    }
}

fn strip_current_dir(path: &Utf8Path) -> &Utf8Path {
    path.strip_prefix(".").unwrap_or(path)
}

/// What a reconciliation pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    removed_languages: Vec<String>,
    removed_grammars: Vec<String>,
    added_languages: Vec<String>,
    added_grammars: Vec<String>,
    conflicts: Vec<Conflict>,
}

impl ReconcileReport {
    /// Ids of previously generated languages that were removed.
    #[must_use]
    pub fn removed_languages(&self) -> &[String] {
        &self.removed_languages
    }

    /// Scopes of previously generated grammars that were removed.
    #[must_use]
    pub fn removed_grammars(&self) -> &[String] {
        &self.removed_grammars
    }

    /// Ids of languages written by this pass.
    #[must_use]
    pub fn added_languages(&self) -> &[String] {
        &self.added_languages
    }

    /// Scopes of grammars written by this pass.
    #[must_use]
    pub fn added_grammars(&self) -> &[String] {
        &self.added_grammars
    }

    /// Generated entries that were skipped.
    #[must_use]
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    fn skip(&mut self, kind: ConflictKind, key: &str, reason: ConflictReason) {
        let conflict = Conflict {
            kind,
            key: key.to_owned(),
            reason,
        };
        warn!(%conflict, "skipping generated manifest entry");
        self.conflicts.push(conflict);
    }
}

/// Replaces the generated entries of `manifest` with `contributions`.
///
/// Old generated grammars and the languages they referenced are removed
/// first; the new entries are then appended in generation order. Applying
/// the same contributions twice leaves the manifest unchanged the second
/// time.
///
/// # Errors
///
/// Returns [`ManifestError::Shape`] when the manifest's contribution
/// sections are not arrays, or when a contribution cannot be serialised.
pub fn reconcile(
    manifest: &mut Manifest,
    contributions: &Contributions,
    options: &ReconcileOptions,
) -> Result<ReconcileReport, ManifestError> {
    let mut report = ReconcileReport::default();
    let mut grammars = std::mem::take(manifest.section_mut("grammars")?);
    let mut languages = std::mem::take(manifest.section_mut("languages")?);

    let (stale, kept): (Vec<Value>, Vec<Value>) = grammars.drain(..).partition(|entry| {
        field(entry, "path").is_some_and(|path| options.is_generated_path(path))
    });
    grammars = kept;

    let stale_languages: BTreeSet<&str> = stale
        .iter()
        .filter_map(|entry| field(entry, "language"))
        .filter(|id| !options.is_protected_language(id))
        .collect();
    report.removed_grammars = stale
        .iter()
        .filter_map(|entry| field(entry, "scopeName"))
        .map(str::to_owned)
        .collect();
    languages.retain(|entry| match field(entry, "id") {
        Some(id) if stale_languages.contains(id) => {
            report.removed_languages.push(id.to_owned());
            false
        }
        _ => true,
    });

    let mut skipped_languages = BTreeSet::new();
    for language in &contributions.languages {
        let reason = if options.is_protected_language(&language.id) {
            Some(ConflictReason::Protected)
        } else if languages.iter().any(|entry| field(entry, "id") == Some(language.id.as_str())) {
            Some(ConflictReason::HandAuthored)
        } else {
            None
        };
        if let Some(reason) = reason {
            report.skip(ConflictKind::Language, &language.id, reason);
            skipped_languages.insert(language.id.as_str());
            continue;
        }
        languages.push(to_value(language)?);
        report.added_languages.push(language.id.clone());
    }

    for grammar in &contributions.grammars {
        let scope = grammar.scope_name.as_str();
        let reason = if grammar
            .language
            .as_deref()
            .is_some_and(|id| skipped_languages.contains(id))
        {
            Some(ConflictReason::LanguageSkipped)
        } else if options.is_protected_scope(scope) {
            Some(ConflictReason::Protected)
        } else if grammars.iter().any(|entry| field(entry, "scopeName") == Some(scope)) {
            Some(ConflictReason::HandAuthored)
        } else {
            None
        };
        if let Some(reason) = reason {
            report.skip(ConflictKind::Grammar, scope, reason);
            continue;
        }
        grammars.push(to_value(grammar)?);
        report.added_grammars.push(grammar.scope_name.clone());
    }

    *manifest.section_mut("languages")? = languages;
    *manifest.section_mut("grammars")? = grammars;

    info!(
        added_languages = report.added_languages.len(),
        added_grammars = report.added_grammars.len(),
        removed_grammars = report.removed_grammars.len(),
        conflicts = report.conflicts.len(),
        "reconciled manifest"
    );
    Ok(report)
}

fn field<'a>(entry: &'a Value, key: &str) -> Option<&'a str> {
    entry.get(key).and_then(Value::as_str)
}

fn to_value(entry: &impl serde::Serialize) -> Result<Value, ManifestError> {
    serde_json::to_value(entry).map_err(ManifestError::parse)
}
