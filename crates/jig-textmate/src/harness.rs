//! Tokenization against the grammars an extension manifest declares.
//!
//! Grammars are loaded strictly from the manifest's `contributes.grammars`
//! entries; the generated directory is never scanned, so a grammar that was
//! written but not registered is as invisible here as it is to the editor.
//! Host grammars the manifest does not provide come from the supplied
//! fixtures, and any scope still referenced but unknown is registered as an
//! empty stub.

use std::fs;

use camino::Utf8Path;
use jig_grammar::tm::Grammar;
use jig_manifest::Manifest;
use tracing::{debug, info};

use crate::error::HarnessError;
use crate::registry::GrammarRegistry;
use crate::token::Token;

/// A grammar registry ready to tokenize documents.
#[derive(Debug, Clone)]
pub struct Harness {
    registry: GrammarRegistry,
}

impl Harness {
    /// Loads every grammar declared by the manifest at `manifest`.
    ///
    /// Grammar paths are resolved relative to the manifest's directory and
    /// `injectTo` entries register injection grammars against their roots.
    /// `fixtures` are added for scopes the manifest does not declare.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Manifest`] when the manifest cannot be read,
    /// and [`HarnessError::Read`] or [`HarnessError::Parse`] when a declared
    /// grammar cannot be loaded.
    pub fn from_manifest(
        manifest: &Utf8Path,
        fixtures: impl IntoIterator<Item = Grammar>,
    ) -> Result<Self, HarnessError> {
        let document = Manifest::from_path(manifest)?;
        let root = manifest.parent().unwrap_or_else(|| Utf8Path::new("."));
        let mut registry = GrammarRegistry::new();
        for contribution in document.declared_grammars()? {
            let path = root.join(&contribution.path);
            let grammar = load_grammar(&path)?;
            if grammar.scope_name != contribution.scope_name {
                debug!(
                    declared = %contribution.scope_name,
                    actual = %grammar.scope_name,
                    %path,
                    "grammar scope differs from its manifest entry"
                );
            }
            if contribution.inject_to.is_empty() {
                registry.add(grammar);
            } else {
                registry.add_injection(grammar, contribution.inject_to);
            }
        }
        Ok(Self::from_registry(registry, fixtures))
    }

    /// Wraps an assembled registry, filling gaps with `fixtures` and stubs.
    #[must_use]
    pub fn from_registry(
        mut registry: GrammarRegistry,
        fixtures: impl IntoIterator<Item = Grammar>,
    ) -> Self {
        for fixture in fixtures {
            if !registry.contains(&fixture.scope_name) {
                registry.add(fixture);
            }
        }
        let missing = registry.missing_references();
        for scope in missing {
            debug!(%scope, "registering stub grammar");
            registry.add(Grammar::new(scope));
        }
        info!(grammars = registry.scopes().count(), "harness ready");
        Self { registry }
    }

    /// The grammars available to the harness.
    #[must_use]
    pub const fn registry(&self) -> &GrammarRegistry {
        &self.registry
    }

    /// Tokenizes `text` with the grammar rooted at `scope`.
    ///
    /// Each document starts from a fresh rule stack.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Tokenize`] when `scope` is unknown or a rule's
    /// regex does not compile.
    pub fn tokenize(&self, scope: &str, text: &str) -> Result<Vec<Vec<Token>>, HarnessError> {
        let mut tokenizer = self.registry.tokenizer(scope)?;
        Ok(tokenizer.tokenize_document(text)?)
    }
}

/// Reads a TextMate grammar from a JSON file.
///
/// # Errors
///
/// Returns [`HarnessError::Read`] when the file cannot be read and
/// [`HarnessError::Parse`] when it is not a grammar.
pub fn load_grammar(path: &Utf8Path) -> Result<Grammar, HarnessError> {
    let source = fs::read_to_string(path).map_err(|error| HarnessError::read(path, error))?;
    serde_json::from_str(&source).map_err(|error| HarnessError::parse(path, error))
}
