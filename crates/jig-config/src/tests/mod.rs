//! Unit tests for configuration parsing and validation.

use rstest::rstest;

use crate::{Config, ConfigError, LogFormat};

#[rstest]
fn defaults_match_the_documented_layout() {
    let config = Config::load_from_iter(["jig"]).expect("defaults are valid");
    assert_eq!(config, Config::default());
    assert_eq!(config.registry(), None);
    assert_eq!(config.manifest(), "package.json");
    assert_eq!(config.output_dir(), "syntaxes/generated");
    assert_eq!(config.log_filter(), "warn");
    assert_eq!(config.log_format(), LogFormat::Compact);
}

#[rstest]
fn flags_override_defaults() {
    let config = Config::load_from_iter([
        "jig",
        "--registry",
        "catalogue/languages.json",
        "--manifest",
        "ext/package.json",
        "--output-dir",
        "ext/syntaxes/out",
        "--log-filter",
        "jig_grammar=debug",
        "--log-format",
        "JSON",
    ])
    .expect("valid flags");
    assert_eq!(config.registry().map(|path| path.as_str()), Some("catalogue/languages.json"));
    assert_eq!(config.manifest_dir(), "ext");
    assert_eq!(config.output_dir(), "ext/syntaxes/out");
    assert_eq!(config.log_filter(), "jig_grammar=debug");
    assert_eq!(config.log_format(), LogFormat::Json);
}

#[rstest]
fn unknown_log_format_is_an_argument_error() {
    let error = Config::load_from_iter(["jig", "--log-format", "pretty"])
        .expect_err("pretty is not a format");
    assert!(matches!(error, ConfigError::Arguments(_)));
}

#[rstest]
#[case::sibling("ext/package.json", "syntaxes/generated")]
#[case::manifest_dir_itself("ext/package.json", "ext")]
#[case::parent("ext/package.json", ".")]
#[case::escapes_upwards("package.json", "../elsewhere")]
#[case::escapes_after_descending("ext/package.json", "ext/../syntaxes")]
#[case::absolute_against_relative("package.json", "/srv/syntaxes")]
fn output_outside_manifest_is_rejected(#[case] manifest: &str, #[case] output: &str) {
    let config = Config::default()
        .with_manifest(manifest)
        .with_output_dir(output);
    let error = config.validate().expect_err("output must be inside");
    assert!(
        matches!(error, ConfigError::OutputOutsideManifest { .. }),
        "unexpected error: {error}"
    );
    assert!(error.to_string().contains(output));
}

#[rstest]
#[case::defaults("package.json", "syntaxes/generated")]
#[case::dotted("./package.json", "./syntaxes/generated")]
#[case::mixed_dots("package.json", "./syntaxes")]
#[case::nested("ext/package.json", "ext/syntaxes/generated")]
#[case::absolute("/srv/ext/package.json", "/srv/ext/grammars")]
fn output_inside_manifest_is_accepted(#[case] manifest: &str, #[case] output: &str) {
    let config = Config::default()
        .with_manifest(manifest)
        .with_output_dir(output);
    assert!(config.validate().is_ok());
}

#[rstest]
fn manifest_without_file_name_is_rejected() {
    let config = Config::default().with_manifest("..");
    let error = config.validate().expect_err("no file name");
    assert!(matches!(error, ConfigError::ManifestPath { .. }));
}

#[rstest]
fn documents_fill_missing_fields_with_defaults() {
    let document = r#"{"registry": "langs.json", "log_format": "json"}"#;
    let config: Config = serde_json::from_str(document).expect("partial document");
    assert_eq!(config.registry().map(|path| path.as_str()), Some("langs.json"));
    assert_eq!(config.manifest(), "package.json");
    assert_eq!(config.log_filter(), "warn");
    assert_eq!(config.log_format(), LogFormat::Json);
}

#[rstest]
fn documents_reject_unknown_fields() {
    let result = serde_json::from_str::<Config>(r#"{"outputDir": "x"}"#);
    assert!(result.is_err());
}

#[rstest]
#[case("compact", LogFormat::Compact)]
#[case("Compact", LogFormat::Compact)]
#[case("json", LogFormat::Json)]
fn log_formats_parse_case_insensitively(#[case] text: &str, #[case] expected: LogFormat) {
    assert_eq!(text.parse::<LogFormat>(), Ok(expected));
    assert_eq!(expected.to_string(), text.to_lowercase());
}
