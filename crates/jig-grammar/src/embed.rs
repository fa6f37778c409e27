//! Embed rules: one region rule per (host, target, variant).
//!
//! An embed opens on a marker line `@tag(args) ::language` and delegates
//! everything up to the matching closing marker to the target's host
//! grammar. Non-greedy targets embedded at top level use begin/end together
//! with a recursive block consumer, so nested `@tag(...)`/`@end` pairs
//! inside the embed close themselves rather than the embed. Greedy targets,
//! and every embed injected into a foreign region, use begin/while instead:
//! the region continues on every line that is not a closing marker.

use jig_registry::{LanguageDescriptor, Registry};

use crate::anchor::Anchor;
use crate::error::GrammarError;
use crate::library::{BASE_RULE, PatternLibrary};
use crate::regex::{alternation, case_insensitive};
use crate::scopes;
use crate::tm::{Captures, Rule, captures};

/// Where an embed rule is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbedVariant {
    /// In the grammar's own top-level pattern list.
    TopLevel,
    /// Inside an injection that pierces a foreign multi-line region.
    Injected,
}

impl EmbedVariant {
    /// Anchor used by rules of this variant.
    #[must_use]
    pub const fn anchor(self) -> Anchor {
        match self {
            Self::TopLevel => Anchor::LineStart,
            Self::Injected => Anchor::Continuation,
        }
    }
}

/// How an embed region ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The region closes on the first unconsumed match of this pattern.
    End(String),
    /// The region continues while each new line matches this pattern.
    While(String),
}

/// A synthesized embed rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedRule {
    host: String,
    target: String,
    variant: EmbedVariant,
    priority: usize,
    begin: String,
    termination: Termination,
    content_scope: String,
    content_name: String,
    begin_captures: Captures,
    end_captures: Captures,
    inner_patterns: Vec<Rule>,
    block_consumer: Option<(String, Rule)>,
}

impl EmbedRule {
    /// Root scope of the grammar the rule belongs to.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Target language id.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Placement of the rule.
    #[must_use]
    pub const fn variant(&self) -> EmbedVariant {
        self.variant
    }

    /// Tie-break priority: the target's registry declaration index.
    #[must_use]
    pub const fn priority(&self) -> usize {
        self.priority
    }

    /// The open-marker regex.
    #[must_use]
    pub fn begin(&self) -> &str {
        &self.begin
    }

    /// How the region ends.
    #[must_use]
    pub const fn termination(&self) -> &Termination {
        &self.termination
    }

    /// Scope carried by everything strictly between the markers.
    #[must_use]
    pub fn content_scope(&self) -> &str {
        &self.content_scope
    }

    /// Patterns applied inside the region, in priority order.
    #[must_use]
    pub fn inner_patterns(&self) -> &[Rule] {
        &self.inner_patterns
    }

    /// Repository entry of the nested-block consumer, when the rule has
    /// one.
    #[must_use]
    pub fn block_consumer(&self) -> Option<(&str, &Rule)> {
        self.block_consumer
            .as_ref()
            .map(|(name, rule)| (name.as_str(), rule))
    }

    /// Renders the rule in TextMate form.
    #[must_use]
    pub fn to_rule(&self) -> Rule {
        let rule = match &self.termination {
            Termination::End(end) => {
                Rule::begin_end(&self.begin, end).with_end_captures(self.end_captures.clone())
            }
            Termination::While(condition) => Rule::begin_while(&self.begin, condition),
        };
        rule.with_content_name(&self.content_name)
            .with_begin_captures(self.begin_captures.clone())
            .with_patterns(self.inner_patterns.clone())
    }
}

/// Builds the embed rule for `target` inside the grammar `host_scope`.
///
/// # Errors
///
/// Returns [`GrammarError::UnregisteredLanguage`] when `target` is not part
/// of `registry`, and [`GrammarError::AmbiguousTarget`] when one of the
/// target's names, case-folded, is also claimed by another language.
pub fn synthesize(
    registry: &Registry,
    library: &PatternLibrary,
    host_scope: &str,
    target: &LanguageDescriptor,
    variant: EmbedVariant,
) -> Result<EmbedRule, GrammarError> {
    let priority = registry
        .priority(target.id())
        .ok_or_else(|| GrammarError::unregistered(target.id()))?;
    ensure_unambiguous(registry, target)?;

    let anchor = variant.anchor();
    let begin = format!(
        r"{}(\s*)(@!?[a-zA-Z_][\w.]*)(\s{{0,2}})(\()(.*)(\))\s*(::)\s*{}\s*$",
        anchor.prefix(),
        case_insensitive(&format!("({})", alternation(target.names())))
    );

    let host_grammar = Rule::include(target.host_grammar_scope());
    let uses_end = variant == EmbedVariant::TopLevel && !target.has_greedy_contexts();
    let (termination, end_captures, inner_patterns, block_consumer) = if uses_end {
        let block_name = scopes::block_rule_name(target);
        let block = block_consumer(library, &block_name, target);
        (
            Termination::End(library.closing_pattern(Anchor::LineStart)),
            library.closing_captures(Anchor::LineStart),
            vec![
                Rule::local(&block_name),
                Rule::local(BASE_RULE),
                host_grammar,
            ],
            Some((block_name, block)),
        )
    } else {
        let base = match variant {
            EmbedVariant::TopLevel => vec![Rule::local(BASE_RULE)],
            EmbedVariant::Injected => library.inline_rules(Anchor::Continuation),
        };
        (
            Termination::While(library.continuation_pattern(anchor)),
            Captures::new(),
            base.into_iter().chain([host_grammar]).collect(),
            None,
        )
    };

    Ok(EmbedRule {
        host: host_scope.to_owned(),
        target: target.id().to_owned(),
        variant,
        priority,
        begin,
        termination,
        content_scope: scopes::content_scope(target),
        content_name: scopes::content_name(target),
        begin_captures: marker_captures(anchor),
        end_captures,
        inner_patterns,
        block_consumer,
    })
}

/// Rejects a target whose names collide with another registered language.
///
/// Registry construction already enforces this across the catalogue; the
/// check here covers descriptors supplied by callers alongside a registry.
fn ensure_unambiguous(
    registry: &Registry,
    target: &LanguageDescriptor,
) -> Result<(), GrammarError> {
    for name in target.names() {
        let folded = name.to_lowercase();
        let claimant = registry.languages().iter().find(|other| {
            other.id() != target.id()
                && other
                    .names()
                    .any(|candidate| candidate.to_lowercase() == folded)
        });
        if let Some(other) = claimant {
            return Err(GrammarError::ambiguous_target(target.id(), folded, other.id()));
        }
    }
    Ok(())
}

/// Captures of a marker line: the open-marker regex and the block consumer
/// share this numbering.
fn marker_captures(anchor: Anchor) -> Captures {
    let mut map = captures([
        (0, scopes::TAG),
        (anchor.shift(2), scopes::TAG_NAME),
        (anchor.shift(4), "punctuation.definition.arguments.begin.jig"),
        (anchor.shift(6), "punctuation.definition.arguments.end.jig"),
        (anchor.shift(7), scopes::LANGUAGE_SEPARATOR),
        (anchor.shift(8), scopes::LANGUAGE_NAME),
    ]);
    map.insert(
        anchor.shift(5),
        Rule::scope(scopes::ARGUMENTS)
            .with_patterns(vec![Rule::include(scopes::EXPRESSION_GRAMMAR)]),
    );
    map
}

/// A nested `@tag(...)` ... `@end` pair inside an embed of `target`.
///
/// Self-closing tags (`@!tag`) and reserved tags never open a block. The
/// consumer includes itself, so arbitrarily deep nesting balances.
fn block_consumer(library: &PatternLibrary, name: &str, target: &LanguageDescriptor) -> Rule {
    let begin = format!(
        r"^(\s*)(@(?!!)(?!(?:{})\b)[a-zA-Z_][\w.]*)(\s{{0,2}})(\()(.*)(\))(?:\s*(::)\s*([\w.+-]+))?\s*$",
        library.block_exclusions()
    );
    Rule::begin_end(begin, library.closing_pattern(Anchor::LineStart))
        .named(scopes::BLOCK)
        .with_begin_captures(marker_captures(Anchor::LineStart))
        .with_end_captures(library.closing_captures(Anchor::LineStart))
        .with_patterns(vec![
            Rule::local(name),
            Rule::local(BASE_RULE),
            Rule::include(target.host_grammar_scope()),
        ])
}
