//! Tests for language descriptors.

use std::path::Path;

use rstest::rstest;

use crate::LanguageDescriptor;

fn yaml() -> LanguageDescriptor {
    LanguageDescriptor::new("yaml", "YAML", "source.yaml")
        .with_aliases(["yml"])
        .with_file_extensions([".yaml.jig", ".yml.jig", "Jigfile"])
        .greedy()
}

#[test]
fn editor_language_id_defaults_to_id() {
    assert_eq!(yaml().editor_language_id(), "yaml");
    let overridden = yaml().with_editor_language_id("dockercompose");
    assert_eq!(overridden.editor_language_id(), "dockercompose");
}

#[test]
fn names_lists_id_before_aliases() {
    let descriptor = yaml();
    let names: Vec<&str> = descriptor.names().collect();
    assert_eq!(names, vec!["yaml", "yml"]);
}

#[rstest]
#[case("config/app.yaml.jig", true)]
#[case("app.yml.jig", true)]
#[case("Jigfile", true)]
#[case("app.yaml", false)]
#[case(".yaml.jig", false)]
#[case("NotJigfile", false)]
fn matches_path_handles_suffixes_and_literal_names(#[case] path: &str, #[case] expected: bool) {
    assert_eq!(yaml().matches_path(Path::new(path)), expected);
}

#[rstest]
#[case("text.html.basic", "text")]
#[case("source.ts", "source")]
#[case(".odd", "source")]
fn scope_category_uses_first_segment(#[case] scope: &str, #[case] expected: &str) {
    let descriptor = LanguageDescriptor::new("x", "X", scope);
    assert_eq!(descriptor.scope_category(), expected);
}

#[test]
fn markup_flag_follows_markup_scopes() {
    let html = LanguageDescriptor::new("html", "HTML", "text.html.basic");
    assert!(!html.is_markup());
    assert!(html.with_markup_scopes(["meta.tag"]).is_markup());
}

#[test]
fn descriptor_deserialises_camel_case_fields() {
    let json = r#"{
        "id": "markdown",
        "displayName": "Markdown",
        "hostGrammarScope": "text.html.markdown",
        "aliasNames": ["md"],
        "hasGreedyContexts": true
    }"#;
    let descriptor: LanguageDescriptor = serde_json::from_str(json).expect("descriptor");
    assert_eq!(descriptor.id(), "markdown");
    assert!(descriptor.has_greedy_contexts());
    assert_eq!(descriptor.alias_names(), ["md"]);
    assert!(descriptor.injection_target().is_none());
}

#[test]
fn descriptor_rejects_unknown_fields() {
    let json = r#"{"id": "x", "displayName": "X", "hostGrammarScope": "source.x", "greedy": true}"#;
    let result: Result<LanguageDescriptor, _> = serde_json::from_str(json);
    assert!(result.is_err());
}
