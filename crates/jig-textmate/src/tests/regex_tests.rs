//! Tests for regex source rewriting.

use rstest::rstest;

use crate::engine::regex::{
    compile, has_back_references, resolve_anchors, resolve_back_references,
};
use crate::engine::substitute_captures;

#[rstest]
#[case(r"\Gabc", true, true, r"\Gabc")]
#[case(r"\Gabc", true, false, "(?!)abc")]
#[case(r"\A\G", false, true, r"(?!)\G")]
#[case(r"(^|\G)\s*\\G", false, false, r"(^|(?!))\s*\\G")]
#[case("plain", false, false, "plain")]
fn disallowed_anchors_never_match(
    #[case] source: &str,
    #[case] allow_a: bool,
    #[case] allow_g: bool,
    #[case] expected: &str,
) {
    assert_eq!(resolve_anchors(source, allow_a, allow_g), expected);
}

#[rstest]
#[case(r"^\1$", true)]
#[case(r"(\2|\s{0,3})(\3)\s*$", true)]
#[case(r"\\1", false)]
#[case(r"\s+\w", false)]
fn back_references_are_detected(#[case] source: &str, #[case] expected: bool) {
    assert_eq!(has_back_references(source), expected);
}

#[test]
fn back_references_resolve_to_escaped_captures() {
    let text = "<<a.b";
    let captures = [Some((0, 5)), Some((2, 5))];
    assert_eq!(resolve_back_references(r"^\1$", text, &captures), r"^a\.b$");
}

#[test]
fn unmatched_back_references_resolve_to_nothing() {
    let captures = [Some((0, 3)), None];
    assert_eq!(resolve_back_references(r"(\1)\d", "```", &captures), r"()\d");
}

#[test]
fn fence_back_references_keep_the_fence_run() {
    let text = "  ~~~~jig-html";
    let captures = [Some((0, 14)), Some((0, 0)), Some((0, 2)), Some((2, 6))];
    assert_eq!(
        resolve_back_references(r"(^|\G)(\2|\s{0,3})(\3)\s*$", text, &captures),
        r"(^|\G)(\ \ |\s{0,3})(~~~~)\s*$"
    );
}

#[rstest]
#[case("keyword.$1.test", "keyword.Foo.test")]
#[case("entity.${1:/downcase}", "entity.foo")]
#[case("entity.${1:/upcase}", "entity.FOO")]
#[case("missing.$4", "missing.")]
#[case("plain.scope", "plain.scope")]
fn scope_names_substitute_captures(#[case] name: &str, #[case] expected: &str) {
    let captures = [Some((0, 4)), Some((1, 4))];
    assert_eq!(substitute_captures(name, "@Foo", &captures), expected);
}

#[test]
fn substituted_captures_drop_leading_dots() {
    let captures = [Some((0, 4)), Some((0, 4))];
    assert_eq!(substitute_captures("ext.$1", "..md", &captures), "ext.md");
}

#[test]
fn invalid_patterns_report_the_source() {
    let Some(err) = compile("(unclosed").err() else {
        panic!("pattern must not compile");
    };
    assert!(err.to_string().contains("/(unclosed/"), "{err}");
}
