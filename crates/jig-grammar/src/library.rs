//! Jig's own token rules.
//!
//! The library yields the same eight rules in two anchor forms. Rules that
//! are not line-oriented (comments and interpolations) are identical in both
//! forms; tag rules differ in their anchor prefix and therefore in their
//! capture numbering.

use jig_registry::Registry;

use crate::anchor::Anchor;
use crate::regex::{alternation, escape};
use crate::scopes;
use crate::tm::{Rule, captures};

/// Repository name of the rule that includes every library rule in order.
pub const BASE_RULE: &str = "base";

/// Library rule names in priority order.
pub const RULE_NAMES: [&str; 8] = [
    "comment",
    "escaped-interpolation",
    "unescaped-interpolation",
    "interpolation",
    "tag-end",
    "tag-else",
    "tag-with-args",
    "tag",
];

const NEVER: &str = "(?!)";

/// A library rule together with its repository name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRule {
    /// Repository name.
    pub name: &'static str,
    /// Rule body.
    pub rule: Rule,
}

/// The canonical Jig rule set, parameterised by the registry's reserved
/// tag vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternLibrary {
    closing: String,
    alternates: String,
    dedicated: String,
    reserved: String,
}

impl PatternLibrary {
    /// Derives the library from the registry's reserved tags.
    #[must_use]
    pub fn build(registry: &Registry) -> Self {
        let reserved = registry.reserved_tags();
        Self {
            closing: escape(reserved.closing()),
            alternates: non_empty(alternation(
                reserved.alternates().iter().map(String::as_str),
            )),
            dedicated: non_empty(alternation(reserved.dedicated())),
            reserved: non_empty(alternation(reserved.all())),
        }
    }

    /// Every library rule in priority order, anchored with `anchor`.
    #[must_use]
    pub fn rules(&self, anchor: Anchor) -> Vec<NamedRule> {
        RULE_NAMES
            .into_iter()
            .zip(self.inline_rules(anchor))
            .map(|(name, rule)| NamedRule { name, rule })
            .collect()
    }

    /// The rule bodies of [`Self::rules`], for inlining where `#name`
    /// references cannot be relied on.
    #[must_use]
    pub fn inline_rules(&self, anchor: Anchor) -> Vec<Rule> {
        vec![
            comment(),
            escaped_interpolation(),
            unescaped_interpolation(),
            interpolation(),
            self.tag_end(anchor),
            self.tag_else(anchor),
            tag_with_args(anchor),
            self.tag(anchor),
        ]
    }

    /// `#name` includes of every library rule, in priority order.
    #[must_use]
    pub fn base_includes(&self) -> Vec<Rule> {
        RULE_NAMES.into_iter().map(Rule::local).collect()
    }

    /// The `base` repository entry.
    #[must_use]
    pub fn base_rule(&self) -> Rule {
        Rule::group(self.base_includes())
    }

    /// The three interpolation forms, inlined.
    #[must_use]
    pub fn interpolation_rules(&self) -> Vec<Rule> {
        vec![
            escaped_interpolation(),
            unescaped_interpolation(),
            interpolation(),
        ]
    }

    /// Alternation of every reserved tag name; such tags never open a
    /// nested block.
    #[must_use]
    pub fn block_exclusions(&self) -> &str {
        &self.reserved
    }

    /// A whole-line closing marker, capturing the tag name.
    #[must_use]
    pub fn closing_pattern(&self, anchor: Anchor) -> String {
        format!(r"{}\s*(@{})\s*$", anchor.prefix(), self.closing)
    }

    /// Captures of [`Self::closing_pattern`].
    #[must_use]
    pub fn closing_captures(&self, anchor: Anchor) -> crate::tm::Captures {
        captures([(0, scopes::TAG_END), (anchor.shift(1), scopes::TAG_NAME)])
    }

    /// A continuation condition that holds on every line except a closing
    /// marker.
    #[must_use]
    pub fn continuation_pattern(&self, anchor: Anchor) -> String {
        format!(r"{}(?!\s*@{}\s*$)", anchor.prefix(), self.closing)
    }

    fn tag_end(&self, anchor: Anchor) -> Rule {
        Rule::matching(self.closing_pattern(anchor))
            .named(scopes::TAG_END)
            .with_captures(captures([(anchor.shift(1), scopes::TAG_NAME)]))
    }

    fn tag_else(&self, anchor: Anchor) -> Rule {
        Rule::matching(format!(
            r"{}\s*(@(?:{}))(~)?\s*$",
            anchor.prefix(),
            self.alternates
        ))
        .named(scopes::TAG_ELSE)
        .with_captures(captures([
            (anchor.shift(1), scopes::TAG_NAME),
            (anchor.shift(2), WHITESPACE_CONTROL),
        ]))
    }

    fn tag(&self, anchor: Anchor) -> Rule {
        Rule::matching(format!(
            r"{}(\s*)(@{{1,2}}!?(?!(?:{})\b)[a-zA-Z_][\w.]*)(~)?\s*$",
            anchor.prefix(),
            self.dedicated
        ))
        .named(scopes::TAG)
        .with_captures(captures([
            (anchor.shift(2), scopes::TAG_NAME),
            (anchor.shift(3), WHITESPACE_CONTROL),
        ]))
    }
}

const WHITESPACE_CONTROL: &str = "keyword.operator.whitespace-control.jig";

fn non_empty(alternation: String) -> String {
    if alternation.is_empty() {
        String::from(NEVER)
    } else {
        alternation
    }
}

fn comment() -> Rule {
    Rule::begin_end(r"\{\{--", r"--\}\}")
        .named(scopes::COMMENT)
        .with_begin_captures(captures([(0, "punctuation.definition.comment.begin.jig")]))
        .with_end_captures(captures([(0, "punctuation.definition.comment.end.jig")]))
}

fn escaped_interpolation() -> Rule {
    Rule::begin_end(r"@\{\{", r"\}\}")
        .named(scopes::ESCAPED_INTERPOLATION)
        .with_content_name(scopes::ESCAPED_CONTENT)
        .with_begin_captures(captures([(
            0,
            "punctuation.section.interpolation.escaped.begin.jig",
        )]))
        .with_end_captures(captures([(
            0,
            "punctuation.section.interpolation.escaped.end.jig",
        )]))
}

fn unescaped_interpolation() -> Rule {
    Rule::begin_end(r"\{\{\{", r"\}\}\}")
        .named(scopes::EXPRESSION)
        .with_begin_captures(captures([(
            0,
            "punctuation.section.interpolation.unescaped.begin.jig",
        )]))
        .with_end_captures(captures([(
            0,
            "punctuation.section.interpolation.unescaped.end.jig",
        )]))
        .with_patterns(vec![Rule::include(scopes::EXPRESSION_GRAMMAR)])
}

fn interpolation() -> Rule {
    Rule::begin_end(r"\{\{", r"\}\}")
        .named(scopes::EXPRESSION)
        .with_begin_captures(captures([(0, "punctuation.section.interpolation.begin.jig")]))
        .with_end_captures(captures([(0, "punctuation.section.interpolation.end.jig")]))
        .with_patterns(vec![Rule::include(scopes::EXPRESSION_GRAMMAR)])
}

fn tag_with_args(anchor: Anchor) -> Rule {
    Rule::begin_end(
        format!(r"{}(\s*)(@{{1,2}}!?[a-zA-Z_][\w.]*)(\s{{0,2}})(\()", anchor.prefix()),
        r"\)",
    )
    .named(scopes::TAG)
    .with_content_name(scopes::ARGUMENTS)
    .with_begin_captures(captures([
        (anchor.shift(2), scopes::TAG_NAME),
        (anchor.shift(4), "punctuation.definition.arguments.begin.jig"),
    ]))
    .with_end_captures(captures([(0, "punctuation.definition.arguments.end.jig")]))
    .with_patterns(vec![Rule::include(scopes::EXPRESSION_GRAMMAR)])
}
