//! Tests for family generation, artefact writing, and drift checks.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use jig_registry::Registry;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::registry;
use crate::error::GrammarError;
use crate::family::{ArtifactLayout, Drift, GrammarFamily, check_artifacts, write_artifacts};

#[fixture]
fn family(registry: Registry) -> GrammarFamily {
    GrammarFamily::generate(&registry).expect("grammar family")
}

fn temp_dir() -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    (dir, path)
}

#[rstest]
fn artifacts_cover_every_language_then_shared_grammars(family: GrammarFamily) {
    let artifacts = family.artifacts().expect("artifacts");
    let names: Vec<&str> = artifacts.iter().map(|artifact| artifact.file_name()).collect();
    assert_eq!(names.first(), Some(&"jig-html.tmLanguage.json"));
    assert_eq!(
        names.iter().rev().take(2).copied().collect::<Vec<_>>(),
        vec!["jig-markdown-codeblock.tmLanguage.json", "jig.tmLanguage.json"]
    );
    assert_eq!(names.len(), family.languages().len() + 2);
    assert!(artifacts.iter().all(|artifact| artifact.contents().ends_with("}\n")));
}

#[rstest]
fn generation_is_byte_for_byte_repeatable(registry: Registry) {
    let first = GrammarFamily::generate(&registry).expect("first run");
    let second = GrammarFamily::generate(&registry).expect("second run");
    assert_eq!(first.artifacts().ok(), second.artifacts().ok());
}

#[rstest]
fn lookup_by_scope_covers_the_whole_family(family: GrammarFamily) {
    for scope in ["text.jig.html", "source.jig.yaml", "text.jig", "markdown.jig.codeblock"] {
        assert!(family.grammar(scope).is_some(), "{scope}");
    }
    assert!(family.grammar("source.ts").is_none());
}

#[rstest]
#[case("syntaxes/generated", "package.json", "syntaxes/generated")]
#[case("./syntaxes/generated", "./package.json", "syntaxes/generated")]
#[case("ext/syntaxes", "ext/package.json", "syntaxes")]
fn layout_paths_are_manifest_relative(
    #[case] output: &str,
    #[case] manifest: &str,
    #[case] relative: &str,
) {
    let layout = ArtifactLayout::new(Utf8Path::new(output), Utf8Path::new(manifest))
        .expect("layout");
    assert_eq!(layout.manifest_relative_dir(), Utf8Path::new(relative));
    assert_eq!(
        layout.manifest_path("jig.tmLanguage.json"),
        format!("./{relative}/jig.tmLanguage.json")
    );
}

#[rstest]
#[case("elsewhere/syntaxes", "ext/package.json")]
#[case("ext", "ext/package.json")]
#[case("../syntaxes", "package.json")]
fn layout_rejects_output_outside_manifest_dir(#[case] output: &str, #[case] manifest: &str) {
    let error = ArtifactLayout::new(Utf8Path::new(output), Utf8Path::new(manifest))
        .expect_err("outside manifest");
    assert!(matches!(error, GrammarError::OutputOutsideManifest { .. }), "{error}");
}

#[rstest]
fn contributions_describe_languages_and_grammars(family: GrammarFamily) {
    let layout = ArtifactLayout::new(
        Utf8Path::new("syntaxes/generated"),
        Utf8Path::new("package.json"),
    )
    .expect("layout");
    let contributions = family.contributions(&layout);
    assert_eq!(contributions.languages.len(), family.languages().len());
    assert_eq!(contributions.grammars.len(), family.languages().len() + 2);

    let html = contributions.languages.first().expect("html language");
    assert_eq!(html.id, "jig-html");
    assert_eq!(html.aliases, vec![String::from("Jig (HTML)")]);
    assert_eq!(html.extensions, vec![String::from(".html.jig")]);

    let grammar = contributions.grammars.first().expect("html grammar");
    assert_eq!(grammar.language.as_deref(), Some("jig-html"));
    assert_eq!(grammar.scope_name, "text.jig.html");
    assert_eq!(grammar.path, "./syntaxes/generated/jig-html.tmLanguage.json");

    let fenced = contributions.grammars.last().expect("fenced grammar");
    assert!(fenced.language.is_none());
    assert_eq!(fenced.scope_name, "markdown.jig.codeblock");
    assert_eq!(fenced.inject_to.len(), 2);
}

#[rstest]
fn writing_twice_leaves_files_untouched(family: GrammarFamily) {
    let (_guard, dir) = temp_dir();
    let artifacts = family.artifacts().expect("artifacts");

    let first = write_artifacts(&dir, &artifacts).expect("first write");
    assert_eq!(first.written.len(), artifacts.len());
    assert!(first.unchanged.is_empty());

    let second = write_artifacts(&dir, &artifacts).expect("second write");
    assert!(second.written.is_empty());
    assert_eq!(second.unchanged.len(), artifacts.len());
    assert!(check_artifacts(&dir, &artifacts).expect("check").is_empty());
}

#[rstest]
fn stale_grammars_are_removed_and_other_files_kept(family: GrammarFamily) {
    let (_guard, dir) = temp_dir();
    fs::write(dir.join("jig-cobol.tmLanguage.json"), "{}\n").expect("seed stale grammar");
    fs::write(dir.join("README.md"), "notes\n").expect("seed unrelated file");
    let artifacts = family.artifacts().expect("artifacts");

    let report = write_artifacts(&dir, &artifacts).expect("write");
    assert_eq!(report.removed, vec![String::from("jig-cobol.tmLanguage.json")]);
    assert!(!dir.join("jig-cobol.tmLanguage.json").exists());
    assert!(dir.join("README.md").exists());
}

#[rstest]
fn drift_reports_missing_changed_and_stale_files(family: GrammarFamily) {
    let (_guard, dir) = temp_dir();
    let artifacts = family.artifacts().expect("artifacts");
    write_artifacts(&dir, &artifacts).expect("write");

    fs::write(dir.join("jig-css.tmLanguage.json"), "{}\n").expect("edit artefact");
    fs::remove_file(dir.join("jig.tmLanguage.json")).expect("remove artefact");
    fs::write(dir.join("jig-old.tmLanguage.json"), "{}\n").expect("seed stale grammar");

    let drift = check_artifacts(&dir, &artifacts).expect("check");
    assert_eq!(
        drift,
        vec![
            Drift::Changed(String::from("jig-css.tmLanguage.json")),
            Drift::Missing(String::from("jig.tmLanguage.json")),
            Drift::Stale(String::from("jig-old.tmLanguage.json")),
        ]
    );
    assert_eq!(
        drift.iter().map(ToString::to_string).collect::<Vec<_>>(),
        vec![
            "out of date jig-css.tmLanguage.json",
            "missing jig.tmLanguage.json",
            "stale jig-old.tmLanguage.json",
        ]
    );
}

#[rstest]
fn missing_output_directory_means_everything_is_missing(family: GrammarFamily) {
    let (_guard, dir) = temp_dir();
    let artifacts = family.artifacts().expect("artifacts");
    let drift = check_artifacts(&dir.join("absent"), &artifacts).expect("check");
    assert_eq!(drift.len(), artifacts.len());
    assert!(drift.iter().all(|entry| matches!(entry, Drift::Missing(_))));
}
