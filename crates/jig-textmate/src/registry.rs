//! The set of grammars a tokenizer may draw on.

use std::collections::{BTreeMap, BTreeSet};

use jig_grammar::tm::Grammar;
use tracing::debug;

use crate::engine::Tokenizer;
use crate::error::TokenizeError;

/// Grammars keyed by root scope, plus the injection grammars registered
/// against each root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrammarRegistry {
    grammars: BTreeMap<String, Grammar>,
    inject_to: BTreeMap<String, Vec<String>>,
}

impl GrammarRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `grammar`, returning any grammar it replaced.
    pub fn add(&mut self, grammar: Grammar) -> Option<Grammar> {
        self.grammars.insert(grammar.scope_name.clone(), grammar)
    }

    /// Registers an injection grammar applied to each of `targets`.
    ///
    /// The grammar's own `injectionSelector` decides where inside those
    /// roots it applies.
    pub fn add_injection<I, S>(&mut self, grammar: Grammar, targets: I) -> Option<Grammar>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for target in targets {
            let injectors = self.inject_to.entry(target.into()).or_default();
            if !injectors.contains(&grammar.scope_name) {
                injectors.push(grammar.scope_name.clone());
            }
        }
        self.add(grammar)
    }

    /// Looks up a grammar by root scope.
    #[must_use]
    pub fn get(&self, scope: &str) -> Option<&Grammar> {
        self.grammars.get(scope)
    }

    /// Whether a grammar is registered for `scope`.
    #[must_use]
    pub fn contains(&self, scope: &str) -> bool {
        self.grammars.contains_key(scope)
    }

    /// Registered root scopes in sorted order.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.grammars.keys().map(String::as_str)
    }

    /// Injection grammars registered against `target`, in registration
    /// order.
    #[must_use]
    pub fn injectors(&self, target: &str) -> Vec<&Grammar> {
        self.inject_to
            .get(target)
            .into_iter()
            .flatten()
            .filter_map(|scope| self.grammars.get(scope))
            .collect()
    }

    /// Scopes referenced by `include` rules but not registered.
    #[must_use]
    pub fn missing_references(&self) -> BTreeSet<String> {
        let mut missing = BTreeSet::new();
        for grammar in self.grammars.values() {
            grammar.walk(&mut |rule| {
                let Some(reference) = rule.include.as_deref() else {
                    return;
                };
                if reference.starts_with('#') || reference.starts_with('$') {
                    return;
                }
                let scope = reference.split_once('#').map_or(reference, |(scope, _)| scope);
                if !self.grammars.contains_key(scope) {
                    missing.insert(scope.to_owned());
                }
            });
        }
        missing
    }

    /// Compiles a tokenizer rooted at `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenizeError::UnknownGrammar`] when `scope` is not
    /// registered.
    pub fn tokenizer(&self, scope: &str) -> Result<Tokenizer, TokenizeError> {
        let root = self
            .grammars
            .get(scope)
            .ok_or_else(|| TokenizeError::unknown_grammar(scope))?;
        let injectors = self.injectors(scope);
        debug!(scope, injectors = injectors.len(), "building tokenizer");
        Ok(Tokenizer::new(root, &self.grammars, &injectors))
    }
}
