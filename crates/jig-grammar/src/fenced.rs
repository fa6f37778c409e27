//! The fenced-block injection grammar.
//!
//! Inside markdown documents, a fenced block whose info string is `jig` or
//! `jig-<language>` is handed to the matching generated grammar, so nested
//! embeds keep working inside documentation examples.

use std::collections::BTreeMap;

use jig_registry::Registry;

use crate::regex::{alternation, case_insensitive};
use crate::scopes;
use crate::selector::{InjectionSelector, Priority, SelectorPath};
use crate::tm::{Grammar, Rule, captures};

/// Content scope of a bare `jig` fenced block.
pub const BARE_CONTENT_SCOPE: &str = "meta.embedded.block.jig";

/// The injection grammar plus its manifest metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedGrammar {
    grammar: Grammar,
    inject_to: Vec<String>,
    embedded_languages: BTreeMap<String, String>,
}

impl FencedGrammar {
    /// The grammar itself.
    #[must_use]
    pub const fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Root scopes the grammar is injected into.
    #[must_use]
    pub fn inject_to(&self) -> &[String] {
        &self.inject_to
    }

    /// Content scope to editor language id.
    #[must_use]
    pub const fn embedded_languages(&self) -> &BTreeMap<String, String> {
        &self.embedded_languages
    }
}

/// Builds the fenced-block grammar for every registered language.
#[must_use]
pub fn fenced(registry: &Registry) -> FencedGrammar {
    let mut inject_to = vec![scopes::MARKDOWN_SCOPE.to_owned()];
    inject_to.extend(
        registry
            .languages()
            .iter()
            .filter(|language| scopes::is_markdown_hosted(language))
            .map(scopes::grammar_scope),
    );

    let mut selector: Option<InjectionSelector> = None;
    for root in &inject_to {
        let alternative = SelectorPath::new(Priority::Left, root.as_str())
            .excluding([scopes::FENCED_BLOCK_SCOPE]);
        selector = Some(match selector {
            Some(selector) => selector.or(alternative),
            None => InjectionSelector::from(alternative),
        });
    }

    let mut grammar = Grammar::new(scopes::FENCED_SCOPE);
    grammar.injection_selector = selector.map(|selector| selector.to_string());

    let mut embedded_languages = BTreeMap::new();
    for language in registry.languages() {
        let name = format!("fenced-{}", language.id());
        let info = format!("jig-(?:{})", alternation(language.names()));
        grammar.repository.insert(
            name.clone(),
            fence(
                &info,
                &scopes::content_scope(language),
                &scopes::grammar_scope(language),
            ),
        );
        grammar.patterns.push(Rule::local(&name));
        embedded_languages.insert(
            scopes::content_scope(language),
            language.editor_language_id().to_owned(),
        );
    }
    grammar.repository.insert(
        String::from("fenced-jig"),
        fence("jig", BARE_CONTENT_SCOPE, scopes::BASE_SCOPE),
    );
    grammar.patterns.push(Rule::local("fenced-jig"));
    embedded_languages.insert(BARE_CONTENT_SCOPE.to_owned(), String::from("jig"));

    FencedGrammar {
        grammar,
        inject_to,
        embedded_languages,
    }
}

/// One fenced block: the outer rule owns the fences, the inner begin/while
/// rule owns the lines between them.
fn fence(info: &str, content_scope: &str, grammar_scope: &str) -> Rule {
    let begin = format!(
        r"(^|\G)(\s*)(`{{3,}}|~{{3,}})\s*{}(\s+[^`~]*)?$",
        case_insensitive(&format!("({info})"))
    );
    let content = Rule::begin_while(r"(^|\G)(\s*)(.*)", r"(^|\G)(?!\s*([`~]{3,})\s*$)")
        .with_content_name(content_scope)
        .with_patterns(vec![Rule::include(grammar_scope)]);
    Rule::begin_end(begin, r"(^|\G)(\2|\s{0,3})(\3)\s*$")
        .named(scopes::FENCED_BLOCK_SCOPE)
        .with_begin_captures(captures([
            (3, "punctuation.definition.markdown"),
            (4, "fenced_code.block.language.markdown"),
            (5, "fenced_code.block.language.attributes.markdown"),
        ]))
        .with_end_captures(captures([(3, "punctuation.definition.markdown")]))
        .with_patterns(vec![content])
}

