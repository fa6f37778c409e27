//! Unit tests for the command-line runtime.

mod support;

use std::ffi::OsString;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use insta::assert_snapshot;
use rstest::{fixture, rstest};
use serde_json::Value;

use crate::cli::TokenizeArgs;
use crate::commands::{LanguageEntry, infer_scope};
use crate::errors::AppError;
use support::{Workspace, invoke};

const TEMPLATE: &str = "<p>\n@if(x)\n  {{ y }}\n@end\n</p>\n";

#[fixture]
fn workspace() -> Workspace {
    Workspace::new().expect("workspace")
}

#[fixture]
fn generated(workspace: Workspace) -> Workspace {
    let invocation = workspace.run(&["generate"]);
    assert_eq!(invocation.exit, ExitCode::SUCCESS, "{}", invocation.stderr);
    workspace
}

fn artifact_names(workspace: &Workspace) -> Vec<String> {
    let mut names: Vec<String> = workspace
        .output_dir()
        .read_dir_utf8()
        .expect("list output")
        .map(|entry| entry.expect("entry").file_name().to_owned())
        .collect();
    names.sort();
    names
}

#[rstest]
fn generate_writes_every_grammar_and_registers_it(generated: Workspace) {
    assert_eq!(
        artifact_names(&generated),
        [
            "jig-css.tmLanguage.json",
            "jig-html.tmLanguage.json",
            "jig-javascript.tmLanguage.json",
            "jig-json.tmLanguage.json",
            "jig-markdown-codeblock.tmLanguage.json",
            "jig-markdown.tmLanguage.json",
            "jig-typescript.tmLanguage.json",
            "jig-typescriptreact.tmLanguage.json",
            "jig-yaml.tmLanguage.json",
            "jig.tmLanguage.json",
        ]
    );
    let manifest: Value =
        serde_json::from_str(&generated.read("package.json").expect("manifest")).expect("json");
    let grammars = manifest["contributes"]["grammars"]
        .as_array()
        .expect("grammars");
    assert_eq!(grammars.len(), 10);
    assert_eq!(
        grammars[0]["path"],
        "./syntaxes/generated/jig-html.tmLanguage.json"
    );
    let languages = manifest["contributes"]["languages"]
        .as_array()
        .expect("languages");
    assert_eq!(languages[0]["id"], "jig", "hand-authored entry stays first");
    assert_eq!(manifest["name"], "jig-extension");
}

#[rstest]
fn generating_twice_changes_nothing(generated: Workspace) {
    let manifest = generated.read("package.json").expect("manifest");
    let html = generated
        .read("syntaxes/generated/jig-html.tmLanguage.json")
        .expect("html grammar");

    let again = generated.run(&["generate"]);

    assert_eq!(again.exit, ExitCode::SUCCESS);
    assert!(again.stdout.contains("0 written, 10 unchanged, 0 removed"), "{}", again.stdout);
    assert!(again.stdout.contains("package.json unchanged"), "{}", again.stdout);
    assert_eq!(generated.read("package.json").expect("manifest"), manifest);
    assert_eq!(
        generated
            .read("syntaxes/generated/jig-html.tmLanguage.json")
            .expect("html grammar"),
        html
    );
}

#[rstest]
fn check_passes_after_generate(generated: Workspace) {
    let invocation = generated.run(&["check"]);
    assert_eq!(invocation.exit, ExitCode::SUCCESS, "{}", invocation.stdout);
    assert!(invocation.stdout.contains("up to date"));
}

#[rstest]
fn check_reports_each_kind_of_drift(generated: Workspace) {
    generated
        .write("syntaxes/generated/jig-css.tmLanguage.json", "{}")
        .expect("corrupt css");
    std::fs::remove_file(generated.output_dir().join("jig-json.tmLanguage.json"))
        .expect("remove json");
    generated
        .write("syntaxes/generated/jig-old.tmLanguage.json", "{}")
        .expect("stale grammar");

    let invocation = generated.run(&["check"]);

    assert_eq!(invocation.exit, ExitCode::FAILURE);
    assert!(invocation.stdout.contains("out of date jig-css.tmLanguage.json"));
    assert!(invocation.stdout.contains("missing jig-json.tmLanguage.json"));
    assert!(invocation.stdout.contains("stale jig-old.tmLanguage.json"));
    assert!(invocation.stderr.is_empty(), "drift is not an error");
}

#[rstest]
fn check_reports_an_unreconciled_manifest(workspace: Workspace) {
    let invocation = workspace.run(&["check"]);
    assert_eq!(invocation.exit, ExitCode::FAILURE);
    assert!(invocation.stdout.contains("out of date"));
    assert!(invocation.stdout.contains("package.json"));
}

#[rstest]
fn generate_removes_stale_grammars(generated: Workspace) {
    generated
        .write("syntaxes/generated/jig-old.tmLanguage.json", "{}")
        .expect("stale grammar");
    let invocation = generated.run(&["generate"]);
    assert_eq!(invocation.exit, ExitCode::SUCCESS);
    assert!(invocation.stdout.contains("1 removed"));
    assert!(!generated.output_dir().join("jig-old.tmLanguage.json").exists());
}

#[rstest]
fn hand_authored_grammars_are_reported_not_replaced() {
    let workspace = Workspace::with_manifest(
        r#"{
  "contributes": {
    "grammars": [
      { "scopeName": "text.jig.html", "path": "./syntaxes/custom-html.json" }
    ]
  }
}
"#,
    )
    .expect("workspace");

    let invocation = workspace.run(&["generate"]);

    assert_eq!(invocation.exit, ExitCode::SUCCESS, "{}", invocation.stderr);
    assert!(
        invocation.stdout.contains(
            "skipped grammar 'text.jig.html' is already declared by a hand-authored entry"
        ),
        "{}",
        invocation.stdout
    );
    let manifest: Value =
        serde_json::from_str(&workspace.read("package.json").expect("manifest")).expect("json");
    let html: Vec<&Value> = manifest["contributes"]["grammars"]
        .as_array()
        .expect("grammars")
        .iter()
        .filter(|entry| entry["scopeName"] == "text.jig.html")
        .collect();
    assert_eq!(html.len(), 1);
    assert_eq!(html[0]["path"], "./syntaxes/custom-html.json");
}

#[rstest]
fn output_outside_the_manifest_directory_fails_before_writing(workspace: Workspace) {
    let outside = tempfile::tempdir().expect("second temp dir");
    let outside = Utf8PathBuf::from_path_buf(outside.path().join("generated")).expect("utf8");
    let manifest = workspace.manifest();

    let invocation = invoke(vec![
        OsString::from("jig-grammars"),
        OsString::from("generate"),
        OsString::from("--manifest"),
        OsString::from(manifest.as_str()),
        OsString::from("--output-dir"),
        OsString::from(outside.as_str()),
    ]);

    assert_eq!(invocation.exit, ExitCode::FAILURE);
    assert!(
        invocation.stderr.starts_with("error: output directory"),
        "{}",
        invocation.stderr
    );
    assert!(!outside.exists());
    assert_eq!(
        workspace.read("package.json").expect("manifest"),
        support::MANIFEST
    );
}

#[rstest]
fn missing_manifest_fails_before_writing(workspace: Workspace) {
    std::fs::remove_file(workspace.manifest()).expect("remove manifest");
    let invocation = workspace.run(&["generate"]);
    assert_eq!(invocation.exit, ExitCode::FAILURE);
    assert!(invocation.stderr.starts_with("error: "));
    assert!(!workspace.output_dir().exists());
}

#[rstest]
fn malformed_registry_is_reported(workspace: Workspace) {
    let registry = workspace
        .write("languages.json", r#"{"languages": [{"id": "html"}]}"#)
        .expect("registry");
    let invocation = workspace.run(&["--registry", registry.as_str(), "generate"]);
    assert_eq!(invocation.exit, ExitCode::FAILURE);
    assert!(invocation.stderr.starts_with("error: "));
    assert!(!workspace.output_dir().exists());
}

#[rstest]
fn languages_lists_scopes_and_reserved_tags() {
    let invocation = invoke(vec![
        OsString::from("jig-grammars"),
        OsString::from("languages"),
    ]);
    assert_eq!(invocation.exit, ExitCode::SUCCESS, "{}", invocation.stderr);

    let listing: Value = serde_json::from_str(&invocation.stdout).expect("json listing");
    let ids: Vec<&str> = listing["languages"]
        .as_array()
        .expect("languages")
        .iter()
        .filter_map(|language| language["id"].as_str())
        .collect();
    assert_eq!(
        ids,
        [
            "html",
            "markdown",
            "typescript",
            "typescriptreact",
            "javascript",
            "css",
            "json",
            "yaml"
        ]
    );
    let tsx = &listing["languages"][3];
    assert_eq!(tsx["grammarScope"], "source.jig.typescriptreact");
    assert_eq!(tsx["contentScope"], "meta.embedded.block.jig.typescriptreact");
    assert_eq!(tsx["editorLanguage"], "jig-typescriptreact");
    assert_eq!(listing["languages"][1]["greedy"], true);
    assert_eq!(listing["reservedTags"]["closing"], "end");
    assert_eq!(listing["reservedTags"]["alternates"][0], "else");
}

#[test]
fn listing_entry_exposes_derived_scopes() {
    let registry = jig_registry::Registry::builtin().expect("builtin registry");
    let yaml = registry.get("yaml").expect("yaml");
    let entry = serde_json::to_string_pretty(&LanguageEntry::from(yaml)).expect("json entry");
    assert_snapshot!(entry, @r#"
    {
      "id": "yaml",
      "displayName": "YAML",
      "aliases": [
        "yml"
      ],
      "fileExtensions": [
        ".yaml.jig",
        ".yml.jig"
      ],
      "hostGrammarScope": "source.yaml",
      "grammarScope": "source.jig.yaml",
      "contentScope": "meta.embedded.block.jig.yaml",
      "editorLanguage": "jig-yaml",
      "greedy": true
    }
    "#);
}

#[rstest]
fn tokenize_prints_scopes_from_the_registered_grammars(generated: Workspace) {
    let template = generated.write("page.html.jig", TEMPLATE).expect("template");

    let invocation = generated.run(&["tokenize", template.as_str(), "--fixtures"]);

    assert_eq!(invocation.exit, ExitCode::SUCCESS, "{}", invocation.stderr);
    let lines: Vec<&str> = invocation.stdout.lines().collect();
    assert!(lines.contains(
        &r#"1:0..3 "@if" [text.jig.html meta.tag.jig support.function.tag.jig]"#
    ));
    assert!(lines.contains(
        &r#"2:2..4 "{{" [text.jig.html meta.embedded.expression.jig punctuation.section.interpolation.begin.jig]"#
    ));
    assert!(lines.contains(
        &r#"3:0..4 "@end" [text.jig.html meta.tag.end.jig support.function.tag.jig]"#
    ));
    assert!(!invocation.stdout.contains("comment.block.jig"));
}

#[rstest]
fn tokenize_rejects_an_unregistered_scope(generated: Workspace) {
    let template = generated.write("page.txt", "hello").expect("template");
    let invocation = generated.run(&["tokenize", template.as_str(), "--scope", "source.nope"]);
    assert_eq!(invocation.exit, ExitCode::FAILURE);
    assert!(invocation.stderr.contains("source.nope"), "{}", invocation.stderr);
}

#[rstest]
#[case::html("views/home.html.jig", "text.jig.html")]
#[case::yaml_alternate_extension("config.yml.jig", "source.jig.yaml")]
#[case::module_script("app.mjs.jig", "source.jig.javascript")]
#[case::bare("layout.jig", "text.jig")]
fn scope_is_inferred_from_the_file_name(#[case] file: &str, #[case] expected: &str) {
    let registry = jig_registry::Registry::builtin().expect("builtin registry");
    let args = TokenizeArgs {
        file: Utf8PathBuf::from(file),
        scope: None,
        fixtures: false,
        grammars: Vec::new(),
    };
    assert_eq!(infer_scope(&registry, &args).expect("scope"), expected);
}

#[rstest]
fn unknown_file_names_need_an_explicit_scope() {
    let registry = jig_registry::Registry::builtin().expect("builtin registry");
    let args = TokenizeArgs {
        file: Utf8PathBuf::from("notes.txt"),
        scope: None,
        fixtures: false,
        grammars: Vec::new(),
    };
    let error = infer_scope(&registry, &args).expect_err("no language for .txt");
    assert!(matches!(error, AppError::UnknownDocument { .. }));
    assert_eq!(
        error.to_string(),
        "cannot infer a grammar for notes.txt; pass --scope"
    );
}

#[rstest]
fn invalid_log_filter_is_an_error() {
    let invocation = invoke(vec![
        OsString::from("jig-grammars"),
        OsString::from("--log-filter"),
        OsString::from("jig=notalevel"),
        OsString::from("languages"),
    ]);
    assert_eq!(invocation.exit, ExitCode::FAILURE);
    assert!(invocation.stderr.starts_with("error: invalid log filter"));
}

#[rstest]
fn help_goes_to_stdout() {
    let invocation = invoke(vec![OsString::from("jig-grammars"), OsString::from("--help")]);
    assert_eq!(invocation.exit, ExitCode::SUCCESS);
    assert!(invocation.stdout.contains("generate"));
    assert!(invocation.stderr.is_empty());
}

#[rstest]
fn unknown_subcommands_are_usage_errors() {
    let invocation = invoke(vec![OsString::from("jig-grammars"), OsString::from("publish")]);
    assert_ne!(invocation.exit, ExitCode::SUCCESS);
    assert!(invocation.stderr.contains("publish"));
    assert!(invocation.stdout.is_empty());
}
