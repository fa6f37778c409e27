//! Per-language grammar assembly.
//!
//! A generated grammar tries, in order: an embed rule for every other
//! registered language (by declaration priority), Jig's base rules, and
//! finally the host language's own grammar. Injections carry the same rules
//! into regions the host grammar opens on its own, with explicit exclusions
//! so that regions Jig already delegated are never re-entered.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use jig_registry::{LanguageDescriptor, Registry};
use tracing::debug;

use crate::anchor::Anchor;
use crate::embed::{EmbedRule, EmbedVariant, synthesize};
use crate::error::GrammarError;
use crate::library::{BASE_RULE, PatternLibrary};
use crate::scopes;
use crate::selector::{InjectionSelector, Priority, SelectorPath};
use crate::tm::{Grammar, Rule};

/// A composed grammar plus the metadata the manifest needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedGrammar {
    grammar: Grammar,
    language: Option<String>,
    content_scopes: Vec<String>,
    embedded_languages: BTreeMap<String, String>,
    primary: Option<InjectionSelector>,
    markup_scopes: Vec<String>,
}

impl GeneratedGrammar {
    /// The grammar itself.
    #[must_use]
    pub const fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Root scope.
    #[must_use]
    pub fn scope_name(&self) -> &str {
        &self.grammar.scope_name
    }

    /// Host language id; `None` for the shared base grammar.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Content scopes of the grammar's embeds, in priority order.
    #[must_use]
    pub fn content_scopes(&self) -> &[String] {
        &self.content_scopes
    }

    /// Content scope to editor language id.
    #[must_use]
    pub const fn embedded_languages(&self) -> &BTreeMap<String, String> {
        &self.embedded_languages
    }

    /// Selector of the primary injection, if the grammar has one.
    #[must_use]
    pub const fn primary_selector(&self) -> Option<&InjectionSelector> {
        self.primary.as_ref()
    }

    #[cfg(test)]
    pub(crate) const fn grammar_mut(&mut self) -> &mut Grammar {
        &mut self.grammar
    }

    #[cfg(test)]
    pub(crate) fn set_primary(&mut self, selector: InjectionSelector) {
        self.primary = Some(selector);
    }

    /// Checks the grammar's internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::UnresolvedInclude`] when a `#name` include
    /// anywhere in the grammar has no repository entry, and
    /// [`GrammarError::ExclusionMismatch`] when the primary injection does
    /// not exclude exactly the content scopes the grammar produces.
    pub fn validate(&self) -> Result<(), GrammarError> {
        let mut dangling = None;
        self.grammar.walk(&mut |rule| {
            let Some(name) = rule.include.as_deref().and_then(|r| r.strip_prefix('#')) else {
                return;
            };
            if dangling.is_none() && !self.grammar.repository.contains_key(name) {
                dangling = Some(format!("#{name}"));
            }
        });
        if let Some(reference) = dangling {
            return Err(GrammarError::unresolved_include(self.scope_name(), reference));
        }

        let Some(primary) = &self.primary else {
            return Ok(());
        };
        let excluded: Vec<String> = primary
            .alternatives()
            .first()
            .map(SelectorPath::exclusions)
            .unwrap_or_default()
            .iter()
            .filter(|scope| {
                !scopes::SELF_REGIONS.contains(&scope.as_str())
                    && !self.markup_scopes.contains(scope)
            })
            .cloned()
            .collect();
        if excluded != self.content_scopes {
            return Err(GrammarError::ExclusionMismatch {
                scope: self.scope_name().to_owned(),
                excluded,
                produced: self.content_scopes.clone(),
            });
        }
        Ok(())
    }
}

/// Builds the generated grammar for `host`.
///
/// # Errors
///
/// Propagates embed synthesis failures and validation failures.
pub fn assemble(
    registry: &Registry,
    library: &PatternLibrary,
    host: &LanguageDescriptor,
) -> Result<GeneratedGrammar, GrammarError> {
    compose(registry, library, Some(host))
}

/// Builds the shared grammar for plain `.jig` files: embeds for every
/// language and the base rules, without a host grammar.
///
/// # Errors
///
/// Propagates embed synthesis failures and validation failures.
pub fn assemble_base(
    registry: &Registry,
    library: &PatternLibrary,
) -> Result<GeneratedGrammar, GrammarError> {
    compose(registry, library, None)
}

fn compose(
    registry: &Registry,
    library: &PatternLibrary,
    host: Option<&LanguageDescriptor>,
) -> Result<GeneratedGrammar, GrammarError> {
    let scope = host.map_or_else(|| scopes::BASE_SCOPE.to_owned(), scopes::grammar_scope);
    let targets: Vec<&LanguageDescriptor> = registry
        .languages()
        .iter()
        .filter(|language| host.is_none_or(|host| host.id() != language.id()))
        .collect();

    let mut embeds = targets
        .iter()
        .map(|target| synthesize(registry, library, &scope, target, EmbedVariant::TopLevel))
        .collect::<Result<Vec<EmbedRule>, _>>()?;
    embeds.sort_by_key(EmbedRule::priority);

    let mut grammar = Grammar::new(&scope);
    grammar.name = Some(host.map_or_else(
        || String::from("Jig"),
        |host| format!("Jig ({})", host.display_name()),
    ));

    for named in library.rules(Anchor::LineStart) {
        grammar.repository.insert(named.name.to_owned(), named.rule);
    }
    grammar
        .repository
        .insert(BASE_RULE.to_owned(), library.base_rule());

    let mut embed_includes = Vec::with_capacity(embeds.len());
    for embed in &embeds {
        let name = format!("embed-{}", embed.target());
        grammar.repository.insert(name.clone(), embed.to_rule());
        if let Some((block_name, block)) = embed.block_consumer() {
            grammar
                .repository
                .insert(block_name.to_owned(), block.clone());
        }
        embed_includes.push(Rule::local(&name));
    }

    grammar.patterns = embed_includes.clone();
    grammar.patterns.push(Rule::local(BASE_RULE));
    if let Some(host) = host {
        grammar
            .patterns
            .push(Rule::include(host.host_grammar_scope()));
    }

    let content_scopes: Vec<String> = embeds
        .iter()
        .map(|embed| embed.content_scope().to_owned())
        .collect();
    let markup_scopes: Vec<String> = host
        .map(|host| host.markup_scopes().to_vec())
        .unwrap_or_default();
    let mut injections = IndexMap::new();

    let primary = host.map(|host| {
        let anchor = host.injection_target().unwrap_or(&scope);
        InjectionSelector::from(
            SelectorPath::new(Priority::Left, anchor)
                .excluding(content_scopes.iter().cloned())
                .excluding(scopes::SELF_REGIONS)
                .excluding(markup_scopes.iter().cloned()),
        )
    });
    if let Some(primary) = &primary {
        let mut patterns = embed_includes;
        patterns.push(Rule::local(BASE_RULE));
        injections.insert(primary.to_string(), Rule::group(patterns));
    }

    if let Some(host) = host {
        let anchor = host.injection_target().unwrap_or(&scope);
        for markup in host.markup_scopes() {
            let selector = SelectorPath::new(Priority::Left, anchor)
                .within(markup.as_str())
                .within("string")
                .excluding(scopes::SELF_REGIONS);
            injections.insert(
                selector.to_string(),
                Rule::group(library.interpolation_rules()),
            );
        }
    }

    if targets.iter().any(|target| target.has_greedy_contexts()) {
        let (selector, rule) =
            piercing_injection(registry, library, &scope, host, &targets, &content_scopes)?;
        injections.insert(selector.to_string(), rule);
    }
    grammar.injections = injections;

    let embedded_languages = targets
        .iter()
        .map(|target| {
            (
                scopes::content_scope(target),
                target.editor_language_id().to_owned(),
            )
        })
        .collect();

    let generated = GeneratedGrammar {
        grammar,
        language: host.map(|host| host.id().to_owned()),
        content_scopes,
        embedded_languages,
        primary,
        markup_scopes,
    };
    generated.validate()?;
    debug!(
        scope = generated.scope_name(),
        embeds = generated.content_scopes.len(),
        injections = generated.grammar.injections.len(),
        "assembled grammar"
    );
    Ok(generated)
}

/// The injection that re-asserts Jig rules inside greedy regions.
///
/// Its rules are inlined and continuation-anchored: inside a foreign
/// multi-line region the line prefix may already be consumed, and `#name`
/// references may be resolved against a different grammar.
fn piercing_injection(
    registry: &Registry,
    library: &PatternLibrary,
    scope: &str,
    host: Option<&LanguageDescriptor>,
    targets: &[&LanguageDescriptor],
    content_scopes: &[String],
) -> Result<(InjectionSelector, Rule), GrammarError> {
    let mut selector = InjectionSelector::from(
        SelectorPath::new(Priority::Left, scopes::GREEDY_CONTENT_SCOPE)
            .excluding(scopes::SELF_REGIONS),
    );
    if let Some(host) = host.filter(|host| host.has_greedy_contexts()) {
        selector = selector.or(SelectorPath::new(
            Priority::Left,
            host.injection_target().unwrap_or(scope),
        )
        .excluding(content_scopes.iter().cloned())
        .excluding(scopes::SELF_REGIONS)
        .excluding(host.markup_scopes().iter().cloned()));
    }

    let mut injected = targets
        .iter()
        .map(|target| synthesize(registry, library, scope, target, EmbedVariant::Injected))
        .collect::<Result<Vec<EmbedRule>, _>>()?;
    injected.sort_by_key(EmbedRule::priority);

    let patterns = injected
        .iter()
        .map(EmbedRule::to_rule)
        .chain(library.inline_rules(Anchor::Continuation))
        .collect();
    Ok((selector, Rule::group(patterns)))
}
