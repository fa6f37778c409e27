//! The complete generated grammar family and its artefacts.
//!
//! Generation is a pure function of the registry: everything is composed
//! and serialised in memory first, and only then written. Writing removes
//! grammar files in the output directory that the current run no longer
//! produces.

use std::collections::BTreeSet;
use std::fs;
use std::io;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use jig_manifest::{Contributions, GrammarContribution, LanguageContribution};
use jig_registry::{LanguageDescriptor, Registry};
use tracing::{debug, info};

use crate::assembler::{GeneratedGrammar, assemble, assemble_base};
use crate::error::GrammarError;
use crate::fenced::{FencedGrammar, fenced};
use crate::library::PatternLibrary;
use crate::scopes;
use crate::tm::Grammar;

/// File suffix shared by every grammar artefact.
pub const GRAMMAR_SUFFIX: &str = ".tmLanguage.json";

const BASE_FILE: &str = "jig.tmLanguage.json";
const FENCED_FILE: &str = "jig-markdown-codeblock.tmLanguage.json";

/// Where artefacts live on disk and how the manifest refers to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    output_dir: Utf8PathBuf,
    manifest_relative: Utf8PathBuf,
}

impl ArtifactLayout {
    /// Creates a layout for `output_dir`, which must lie inside the
    /// directory holding `manifest`.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::OutputOutsideManifest`] otherwise.
    pub fn new(output_dir: &Utf8Path, manifest: &Utf8Path) -> Result<Self, GrammarError> {
        let manifest_dir = manifest.parent().unwrap_or_else(|| Utf8Path::new(""));
        let relative = strip_current_dir(output_dir)
            .strip_prefix(strip_current_dir(manifest_dir))
            .map_err(|_| GrammarError::OutputOutsideManifest {
                output: output_dir.to_owned(),
                manifest_dir: manifest_dir.to_owned(),
            })?;
        let escapes = relative
            .components()
            .any(|component| component == Utf8Component::ParentDir);
        if relative.as_str().is_empty() || escapes {
            return Err(GrammarError::OutputOutsideManifest {
                output: output_dir.to_owned(),
                manifest_dir: manifest_dir.to_owned(),
            });
        }
        Ok(Self {
            output_dir: output_dir.to_owned(),
            manifest_relative: relative.to_owned(),
        })
    }

    /// Directory the artefacts are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Utf8Path {
        &self.output_dir
    }

    /// The output directory relative to the manifest.
    #[must_use]
    pub fn manifest_relative_dir(&self) -> &Utf8Path {
        &self.manifest_relative
    }

    /// Manifest `path` value for an artefact file.
    #[must_use]
    pub fn manifest_path(&self, file_name: &str) -> String {
        format!("./{}/{file_name}", self.manifest_relative)
    }
}

fn strip_current_dir(path: &Utf8Path) -> &Utf8Path {
    path.strip_prefix(".").unwrap_or(path)
}

/// One serialised grammar file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    file_name: String,
    scope_name: String,
    contents: String,
}

impl Artifact {
    /// File name inside the output directory.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Root scope of the grammar.
    #[must_use]
    pub fn scope_name(&self) -> &str {
        &self.scope_name
    }

    /// Pretty-printed JSON with a trailing newline.
    #[must_use]
    pub fn contents(&self) -> &str {
        &self.contents
    }
}

/// File name of the generated grammar for `language`.
#[must_use]
pub fn grammar_file_name(language: &LanguageDescriptor) -> String {
    format!("{}{GRAMMAR_SUFFIX}", scopes::editor_language(language))
}

/// Every grammar generated from one registry snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarFamily {
    registry: Registry,
    languages: Vec<GeneratedGrammar>,
    base: GeneratedGrammar,
    fenced: FencedGrammar,
}

impl GrammarFamily {
    /// Generates the whole family.
    ///
    /// # Errors
    ///
    /// Propagates the first composition or validation failure; nothing is
    /// returned for a partially valid family.
    pub fn generate(registry: &Registry) -> Result<Self, GrammarError> {
        let library = PatternLibrary::build(registry);
        let languages = registry
            .languages()
            .iter()
            .map(|host| assemble(registry, &library, host))
            .collect::<Result<Vec<_>, _>>()?;
        let base = assemble_base(registry, &library)?;
        let fenced = fenced(registry);
        info!(languages = languages.len(), "generated grammar family");
        Ok(Self {
            registry: registry.clone(),
            languages,
            base,
            fenced,
        })
    }

    /// Per-language grammars in registry order.
    #[must_use]
    pub fn languages(&self) -> &[GeneratedGrammar] {
        &self.languages
    }

    /// The shared `text.jig` grammar.
    #[must_use]
    pub const fn base(&self) -> &GeneratedGrammar {
        &self.base
    }

    /// The fenced-block injection grammar.
    #[must_use]
    pub const fn fenced(&self) -> &FencedGrammar {
        &self.fenced
    }

    /// Looks up a generated grammar by root scope.
    #[must_use]
    pub fn grammar(&self, scope: &str) -> Option<&Grammar> {
        self.languages
            .iter()
            .chain([&self.base])
            .map(GeneratedGrammar::grammar)
            .chain([self.fenced.grammar()])
            .find(|grammar| grammar.scope_name == scope)
    }

    /// Serialises every grammar, per-language grammars first.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::Serialise`] if a grammar cannot be rendered.
    pub fn artifacts(&self) -> Result<Vec<Artifact>, GrammarError> {
        let mut artifacts = Vec::with_capacity(self.languages.len() + 2);
        for (language, generated) in self.registry.languages().iter().zip(&self.languages) {
            artifacts.push(render(grammar_file_name(language), generated.grammar())?);
        }
        artifacts.push(render(BASE_FILE.to_owned(), self.base.grammar())?);
        artifacts.push(render(FENCED_FILE.to_owned(), self.fenced.grammar())?);
        Ok(artifacts)
    }

    /// Manifest entries describing the family under `layout`.
    #[must_use]
    pub fn contributions(&self, layout: &ArtifactLayout) -> Contributions {
        let mut contributions = Contributions::default();
        for (language, generated) in self.registry.languages().iter().zip(&self.languages) {
            let id = scopes::editor_language(language);
            let (extensions, filenames): (Vec<String>, Vec<String>) = language
                .file_extensions()
                .iter()
                .cloned()
                .partition(|association| association.starts_with('.'));
            contributions.languages.push(LanguageContribution {
                id: id.clone(),
                aliases: vec![format!("Jig ({})", language.display_name())],
                extensions,
                filenames,
                configuration: None,
            });
            contributions.grammars.push(GrammarContribution {
                language: Some(id),
                scope_name: generated.scope_name().to_owned(),
                path: layout.manifest_path(&grammar_file_name(language)),
                embedded_languages: generated.embedded_languages().clone(),
                inject_to: Vec::new(),
            });
        }
        contributions.grammars.push(GrammarContribution {
            language: Some(String::from("jig")),
            scope_name: self.base.scope_name().to_owned(),
            path: layout.manifest_path(BASE_FILE),
            embedded_languages: self.base.embedded_languages().clone(),
            inject_to: Vec::new(),
        });
        contributions.grammars.push(GrammarContribution {
            language: None,
            scope_name: self.fenced.grammar().scope_name.clone(),
            path: layout.manifest_path(FENCED_FILE),
            embedded_languages: self.fenced.embedded_languages().clone(),
            inject_to: self.fenced.inject_to().to_vec(),
        });
        contributions
    }
}

fn render(file_name: String, grammar: &Grammar) -> Result<Artifact, GrammarError> {
    let mut contents = serde_json::to_string_pretty(grammar)
        .map_err(|error| GrammarError::serialise(&grammar.scope_name, error))?;
    contents.push('\n');
    Ok(Artifact {
        file_name,
        scope_name: grammar.scope_name.clone(),
        contents,
    })
}

/// Outcome of writing artefacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Files whose contents changed.
    pub written: Vec<String>,
    /// Files already up to date.
    pub unchanged: Vec<String>,
    /// Stale grammar files that were deleted.
    pub removed: Vec<String>,
}

/// Writes `artifacts` into `dir` and deletes grammar files it no longer
/// contains.
///
/// Files whose contents are unchanged are not rewritten.
///
/// # Errors
///
/// Returns [`GrammarError::Io`] for the first file that cannot be created,
/// written, listed, or removed.
pub fn write_artifacts(
    dir: &Utf8Path,
    artifacts: &[Artifact],
) -> Result<WriteReport, GrammarError> {
    fs::create_dir_all(dir).map_err(|error| GrammarError::io(dir, error))?;
    let mut report = WriteReport::default();
    for artifact in artifacts {
        let path = dir.join(&artifact.file_name);
        if read_existing(&path)?.as_deref() == Some(artifact.contents.as_str()) {
            report.unchanged.push(artifact.file_name.clone());
            continue;
        }
        fs::write(&path, &artifact.contents).map_err(|error| GrammarError::io(&path, error))?;
        debug!(file = %path, scope = artifact.scope_name.as_str(), "wrote grammar");
        report.written.push(artifact.file_name.clone());
    }
    for stale in stale_files(dir, artifacts)? {
        let path = dir.join(&stale);
        fs::remove_file(&path).map_err(|error| GrammarError::io(&path, error))?;
        debug!(file = %path, "removed stale grammar");
        report.removed.push(stale);
    }
    Ok(report)
}

/// A difference between generated artefacts and the files on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drift {
    /// The artefact has never been written.
    Missing(String),
    /// The file on disk differs from the artefact.
    Changed(String),
    /// A grammar file on disk is no longer generated.
    Stale(String),
}

impl std::fmt::Display for Drift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(file) => write!(f, "missing {file}"),
            Self::Changed(file) => write!(f, "out of date {file}"),
            Self::Stale(file) => write!(f, "stale {file}"),
        }
    }
}

/// Compares `artifacts` with the contents of `dir` without writing.
///
/// # Errors
///
/// Returns [`GrammarError::Io`] when a file exists but cannot be read.
pub fn check_artifacts(dir: &Utf8Path, artifacts: &[Artifact]) -> Result<Vec<Drift>, GrammarError> {
    let mut drift = Vec::new();
    for artifact in artifacts {
        match read_existing(&dir.join(&artifact.file_name))? {
            None => drift.push(Drift::Missing(artifact.file_name.clone())),
            Some(existing) if existing != artifact.contents => {
                drift.push(Drift::Changed(artifact.file_name.clone()));
            }
            Some(_) => {}
        }
    }
    drift.extend(stale_files(dir, artifacts)?.into_iter().map(Drift::Stale));
    Ok(drift)
}

fn read_existing(path: &Utf8Path) -> Result<Option<String>, GrammarError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(GrammarError::io(path, error)),
    }
}

fn stale_files(dir: &Utf8Path, artifacts: &[Artifact]) -> Result<Vec<String>, GrammarError> {
    let produced: BTreeSet<&str> = artifacts.iter().map(Artifact::file_name).collect();
    let entries = match dir.read_dir_utf8() {
        Ok(entries) => entries,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(error) => return Err(GrammarError::io(dir, error)),
    };
    let mut stale = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|error| GrammarError::io(dir, error))?;
        let name = entry.file_name();
        if name.ends_with(GRAMMAR_SUFFIX) && !produced.contains(name) {
            stale.push(name.to_owned());
        }
    }
    stale.sort();
    Ok(stale)
}
