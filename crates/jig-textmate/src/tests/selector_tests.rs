//! Tests for injection selector parsing and matching.

use rstest::rstest;

use crate::engine::{InjectionPriority, parse_selector};

fn scopes(stack: &str) -> Vec<String> {
    stack.split_whitespace().map(str::to_owned).collect()
}

fn matches(selector: &str, stack: &str) -> bool {
    parse_selector(selector)
        .iter()
        .any(|(matcher, _)| matcher.matches(&scopes(stack)))
}

#[test]
fn priorities_follow_each_alternative() {
    let priorities: Vec<InjectionPriority> = parse_selector("L:text.html, R:source.css, source.js")
        .into_iter()
        .map(|(_, priority)| priority)
        .collect();
    assert_eq!(
        priorities,
        [
            InjectionPriority::Left,
            InjectionPriority::Right,
            InjectionPriority::Normal,
        ]
    );
}

#[test]
fn left_priority_sorts_first() {
    let mut priorities = vec![
        InjectionPriority::Right,
        InjectionPriority::Normal,
        InjectionPriority::Left,
    ];
    priorities.sort();
    assert_eq!(priorities.first(), Some(&InjectionPriority::Left));
}

#[rstest]
#[case("text.html.markdown", "text.html.markdown", true)]
#[case("text.html", "text.html.markdown", true)]
#[case("text.htm", "text.html.markdown", false)]
#[case("text.html.markdown", "text.html", false)]
#[case("source.js string", "source.js meta.group.js string.quoted.js", true)]
#[case("string source.js", "source.js string.quoted.js", false)]
#[case("source.ts", "source.tsx", false)]
fn descendant_paths_match_by_prefix(
    #[case] selector: &str,
    #[case] stack: &str,
    #[case] expected: bool,
) {
    assert_eq!(matches(selector, stack), expected);
}

#[rstest]
#[case("text.html.markdown", true)]
#[case("text.html.markdown markup.fenced_code.block.markdown", false)]
#[case("text.jig.markdown meta.embedded.block.greedy.jig", false)]
fn exclusions_reject_the_named_scope(#[case] stack: &str, #[case] expected: bool) {
    let selector = "L:text.html.markdown -markup.fenced_code.block.markdown";
    assert_eq!(matches(selector, stack), expected);
}

#[rstest]
#[case("text.html.basic", true)]
#[case("source.css", true)]
#[case("source.css comment.block.css", false)]
#[case("source.json", false)]
fn groups_accept_any_member(#[case] stack: &str, #[case] expected: bool) {
    assert_eq!(matches("(text.html | source.css) - comment", stack), expected);
}

#[test]
fn comma_separated_alternatives_are_independent() {
    let selector = "L:text.jig.html, L:meta.embedded.block.greedy.jig";
    assert!(matches(selector, "text.jig.html"));
    assert!(matches(
        selector,
        "text.jig.css meta.embedded.block.jig.markdown meta.embedded.block.greedy.jig"
    ));
    assert!(!matches(selector, "source.jig.css"));
}

#[test]
fn empty_selector_has_no_alternatives() {
    assert!(parse_selector("").is_empty());
}
