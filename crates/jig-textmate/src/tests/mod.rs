//! Unit tests for the tokenizer engine, registry, and harness.

mod regex_tests;
mod registry_tests;
mod selector_tests;

use jig_grammar::tm::Grammar;
use serde_json::Value;

use crate::registry::GrammarRegistry;
use crate::token::Token;

/// Parses a grammar written as JSON.
pub(crate) fn grammar(value: Value) -> Grammar {
    serde_json::from_value(value).unwrap_or_else(|err| panic!("grammar json: {err}"))
}

/// Tokenizes `text` with the first grammar, the rest being available to
/// its includes.
pub(crate) fn tokenize(grammars: Vec<Value>, text: &str) -> Vec<Vec<Token>> {
    let mut registry = GrammarRegistry::new();
    let mut root = None;
    for value in grammars {
        let grammar = grammar(value);
        root.get_or_insert_with(|| grammar.scope_name.clone());
        registry.add(grammar);
    }
    let root = root.expect("at least one grammar");
    registry
        .tokenizer(&root)
        .and_then(|mut tokenizer| tokenizer.tokenize_document(text))
        .unwrap_or_else(|err| panic!("tokenize: {err}"))
}

/// Renders every token of a line as `text [scopes]`.
pub(crate) fn describe(lines: &[Vec<Token>], line: usize) -> Vec<String> {
    lines
        .get(line)
        .map(|tokens| {
            tokens
                .iter()
                .map(|token| format!("{:?} [{}]", token.text, token.scopes.join(" ")))
                .collect()
        })
        .unwrap_or_default()
}
