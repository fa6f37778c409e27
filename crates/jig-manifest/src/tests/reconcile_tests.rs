//! Tests for merging generated contributions into a manifest.

use std::collections::BTreeMap;

use rstest::{fixture, rstest};
use serde_json::json;

use crate::{
    ConflictKind, ConflictReason, Contributions, GrammarContribution, LanguageContribution,
    Manifest, ReconcileOptions, reconcile,
};

fn language(id: &str) -> LanguageContribution {
    LanguageContribution {
        id: id.to_owned(),
        aliases: vec![format!("Jig ({id})")],
        extensions: vec![format!(".{id}.jig")],
        filenames: Vec::new(),
        configuration: None,
    }
}

fn grammar(language: Option<&str>, scope: &str, file: &str) -> GrammarContribution {
    GrammarContribution {
        language: language.map(str::to_owned),
        scope_name: scope.to_owned(),
        path: format!("./syntaxes/generated/{file}"),
        embedded_languages: BTreeMap::new(),
        inject_to: Vec::new(),
    }
}

#[fixture]
fn contributions() -> Contributions {
    Contributions {
        languages: vec![language("jig-html"), language("jig-yaml")],
        grammars: vec![
            grammar(Some("jig-html"), "text.jig.html", "jig-html.tmLanguage.json"),
            grammar(Some("jig-yaml"), "source.jig.yaml", "jig-yaml.tmLanguage.json"),
            grammar(Some("jig"), "text.jig", "jig.tmLanguage.json"),
        ],
    }
}

#[fixture]
fn manifest() -> Manifest {
    Manifest::from_json(
        &json!({
            "name": "jig",
            "contributes": {
                "languages": [
                    {"id": "jig", "aliases": ["Jig"], "extensions": [".jig"]},
                    {"id": "jig-old", "extensions": [".old.jig"]}
                ],
                "grammars": [
                    {
                        "language": "jig-old",
                        "scopeName": "text.jig.old",
                        "path": "./syntaxes/generated/jig-old.tmLanguage.json"
                    },
                    {
                        "language": "jig",
                        "scopeName": "text.jig.legacy",
                        "path": "./syntaxes/generated/jig-legacy.tmLanguage.json"
                    },
                    {
                        "scopeName": "source.jig.snippets",
                        "path": "./syntaxes/snippets.tmLanguage.json"
                    }
                ]
            }
        })
        .to_string(),
    )
    .expect("manifest")
}

fn ids(entries: &[serde_json::Value], key: &str) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| entry.get(key).and_then(serde_json::Value::as_str))
        .map(str::to_owned)
        .collect()
}

#[rstest]
fn stale_generated_entries_are_replaced(mut manifest: Manifest, contributions: Contributions) {
    let report =
        reconcile(&mut manifest, &contributions, &ReconcileOptions::default()).expect("reconcile");

    assert_eq!(report.removed_grammars(), ["text.jig.old", "text.jig.legacy"]);
    assert_eq!(report.removed_languages(), ["jig-old"]);
    assert_eq!(
        ids(manifest.languages().expect("languages"), "id"),
        vec!["jig", "jig-html", "jig-yaml"]
    );
    assert_eq!(
        ids(manifest.grammars().expect("grammars"), "scopeName"),
        vec!["source.jig.snippets", "text.jig.html", "source.jig.yaml", "text.jig"]
    );
    assert!(report.conflicts().is_empty());
}

#[rstest]
fn reconciling_twice_equals_reconciling_once(mut manifest: Manifest, contributions: Contributions) {
    let options = ReconcileOptions::default();
    reconcile(&mut manifest, &contributions, &options).expect("first pass");
    let once = manifest.clone();
    reconcile(&mut manifest, &contributions, &options).expect("second pass");
    assert_eq!(manifest, once);
}

#[rstest]
fn protected_language_is_never_generated(mut manifest: Manifest) {
    let contributions = Contributions {
        languages: vec![language("jig")],
        grammars: vec![grammar(Some("jig"), "text.jig.other", "other.tmLanguage.json")],
    };
    let report =
        reconcile(&mut manifest, &contributions, &ReconcileOptions::default()).expect("reconcile");

    let reasons: Vec<(ConflictKind, &str, ConflictReason)> = report
        .conflicts()
        .iter()
        .map(|conflict| (conflict.kind(), conflict.key(), conflict.reason()))
        .collect();
    assert_eq!(
        reasons,
        vec![
            (ConflictKind::Language, "jig", ConflictReason::Protected),
            (ConflictKind::Grammar, "text.jig.other", ConflictReason::LanguageSkipped),
        ]
    );
    let languages = manifest.languages().expect("languages");
    assert_eq!(languages[0], json!({"id": "jig", "aliases": ["Jig"], "extensions": [".jig"]}));
}

#[rstest]
fn hand_authored_scope_is_not_overwritten(mut manifest: Manifest) {
    let contributions = Contributions {
        languages: Vec::new(),
        grammars: vec![grammar(None, "source.jig.snippets", "snippets.tmLanguage.json")],
    };
    let report =
        reconcile(&mut manifest, &contributions, &ReconcileOptions::default()).expect("reconcile");

    assert_eq!(report.conflicts().len(), 1);
    assert_eq!(
        report.conflicts()[0].to_string(),
        "grammar 'source.jig.snippets' is already declared by a hand-authored entry"
    );
    let grammars = manifest.grammars().expect("grammars");
    assert_eq!(
        grammars[0]["path"],
        json!("./syntaxes/snippets.tmLanguage.json")
    );
}

#[rstest]
fn protected_scope_is_skipped(mut manifest: Manifest, contributions: Contributions) {
    let options = ReconcileOptions::default().protect_scope("text.jig");
    let report = reconcile(&mut manifest, &contributions, &options).expect("reconcile");
    assert_eq!(report.added_grammars(), ["text.jig.html", "source.jig.yaml"]);
    assert_eq!(report.conflicts()[0].reason(), ConflictReason::Protected);
}

#[test]
fn sections_are_created_when_absent() {
    let mut manifest = Manifest::from_json(r#"{"name": "jig"}"#).expect("manifest");
    let contributions = Contributions {
        languages: vec![language("jig-css")],
        grammars: vec![grammar(Some("jig-css"), "source.jig.css", "jig-css.tmLanguage.json")],
    };
    reconcile(&mut manifest, &contributions, &ReconcileOptions::default()).expect("reconcile");
    assert_eq!(
        manifest.document()["contributes"]["grammars"][0]["path"],
        json!("./syntaxes/generated/jig-css.tmLanguage.json")
    );
}

#[rstest]
#[case("./syntaxes/generated/jig-html.tmLanguage.json", true)]
#[case("syntaxes/generated/jig-html.tmLanguage.json", true)]
#[case("./syntaxes/generated", false)]
#[case("./syntaxes/generated-old/x.json", false)]
#[case("./syntaxes/jig.tmLanguage.json", false)]
fn generated_paths_are_recognised(#[case] path: &str, #[case] expected: bool) {
    assert_eq!(ReconcileOptions::default().is_generated_path(path), expected);
}
