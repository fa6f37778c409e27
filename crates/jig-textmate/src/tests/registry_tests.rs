//! Tests for the grammar registry.

use std::collections::BTreeSet;

use jig_grammar::tm::Grammar;
use serde_json::json;

use super::grammar;
use crate::registry::GrammarRegistry;

fn host() -> Grammar {
    grammar(json!({
        "scopeName": "text.jig.html",
        "patterns": [
            { "include": "#base" },
            { "include": "text.html.basic" },
            { "include": "$self" }
        ],
        "repository": {
            "base": {
                "begin": "\\{\\{",
                "end": "\\}\\}",
                "patterns": [{ "include": "source.js#expression" }]
            }
        }
    }))
}

#[test]
fn missing_references_name_unregistered_scopes() {
    let mut registry = GrammarRegistry::new();
    registry.add(host());
    assert_eq!(
        registry.missing_references(),
        BTreeSet::from([String::from("source.js"), String::from("text.html.basic")])
    );

    registry.add(Grammar::new("source.js"));
    assert_eq!(
        registry.missing_references(),
        BTreeSet::from([String::from("text.html.basic")])
    );
}

#[test]
fn adding_a_grammar_replaces_the_previous_scope() {
    let mut registry = GrammarRegistry::new();
    assert!(registry.add(Grammar::new("source.css")).is_none());
    let replaced = registry.add(Grammar::new("source.css"));
    assert_eq!(replaced.map(|grammar| grammar.scope_name), Some(String::from("source.css")));
    assert_eq!(registry.scopes().collect::<Vec<_>>(), ["source.css"]);
}

#[test]
fn injectors_are_listed_once_per_target() {
    let mut registry = GrammarRegistry::new();
    registry.add(host());
    let mut fenced = Grammar::new("markdown.jig.codeblock");
    fenced.injection_selector = Some(String::from("L:text.html.markdown"));
    registry.add_injection(fenced.clone(), ["text.html.markdown", "text.jig.markdown"]);
    registry.add_injection(fenced, ["text.html.markdown"]);

    let scopes = |target: &str| -> Vec<String> {
        registry
            .injectors(target)
            .into_iter()
            .map(|grammar| grammar.scope_name.clone())
            .collect()
    };
    assert_eq!(scopes("text.html.markdown"), ["markdown.jig.codeblock"]);
    assert_eq!(scopes("text.jig.markdown"), ["markdown.jig.codeblock"]);
    assert!(scopes("text.jig.html").is_empty());
    assert!(registry.contains("markdown.jig.codeblock"));
    assert!(registry.get("markdown.jig.codeblock").is_some());
}
