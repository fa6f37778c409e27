//! Rule compilation.
//!
//! Grammar rules are compiled once, when a tokenizer is built, into a flat
//! table addressed by [`RuleId`]. Includes are resolved against the
//! repository chain of the including rule, the current grammar (`$self`),
//! the tokenized root grammar (`$base`), and other registered grammars
//! (`scope` and `scope#name`). References that cannot be resolved are
//! dropped, and a region whose patterns all failed to resolve is dropped
//! with them.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use jig_grammar::tm::{Captures, Grammar, Repository, Rule};
use onig::Regex;

use super::regex::{captured_text, has_back_references};

/// Index of a compiled rule.
pub(crate) type RuleId = usize;

const MISSING_END: &str = "\u{FFFF}";

/// How a capture group is scoped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CaptureRule {
    pub(crate) name: Option<String>,
    pub(crate) content_name: Option<String>,
    /// Rule used to tokenize the captured text again.
    pub(crate) retokenize: Option<RuleId>,
}

/// Per-group capture rules; groups without a rule are `None`.
pub(crate) type CaptureRules = Vec<Option<CaptureRule>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RuleKind {
    Match {
        pattern: String,
        captures: CaptureRules,
    },
    IncludeOnly {
        patterns: Vec<RuleId>,
    },
    BeginEnd {
        begin: String,
        begin_captures: CaptureRules,
        end: String,
        end_captures: CaptureRules,
        end_has_back_references: bool,
        apply_end_pattern_last: bool,
        patterns: Vec<RuleId>,
    },
    BeginWhile {
        begin: String,
        begin_captures: CaptureRules,
        while_pattern: String,
        while_captures: CaptureRules,
        while_has_back_references: bool,
        patterns: Vec<RuleId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompiledRule {
    pub(crate) id: RuleId,
    pub(crate) name: Option<String>,
    pub(crate) content_name: Option<String>,
    pub(crate) kind: RuleKind,
    has_missing_patterns: bool,
}

impl CompiledRule {
    pub(crate) fn patterns(&self) -> &[RuleId] {
        match &self.kind {
            RuleKind::Match { .. } => &[],
            RuleKind::IncludeOnly { patterns }
            | RuleKind::BeginEnd { patterns, .. }
            | RuleKind::BeginWhile { patterns, .. } => patterns,
        }
    }

    /// Regions and include lists that lost every pattern are never scanned.
    fn is_dropped(&self) -> bool {
        !matches!(self.kind, RuleKind::Match { .. })
            && self.has_missing_patterns
            && self.patterns().is_empty()
    }
}

/// The compiled rule table of one tokenizer.
#[derive(Debug, Default)]
pub(crate) struct RuleSet {
    rules: Vec<Option<CompiledRule>>,
}

impl RuleSet {
    pub(crate) fn get(&self, id: RuleId) -> Option<&CompiledRule> {
        self.rules.get(id)?.as_ref()
    }

    pub(crate) fn len(&self) -> usize {
        self.rules.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum RuleKey {
    Root(String),
    Rule(usize),
}

#[derive(Clone)]
struct Context<'g> {
    grammar: &'g Grammar,
    repositories: Vec<&'g Repository>,
}

impl<'g> Context<'g> {
    fn root(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            repositories: vec![&grammar.repository],
        }
    }

    fn lookup(&self, name: &str) -> Option<&'g Rule> {
        self.repositories
            .iter()
            .rev()
            .find_map(|repository| repository.get(name))
    }
}

/// Compiles grammar rules into a [`RuleSet`].
pub(crate) struct Compiler<'g> {
    grammars: &'g BTreeMap<String, Grammar>,
    base: &'g Grammar,
    rules: Vec<Option<CompiledRule>>,
    ids: HashMap<RuleKey, RuleId>,
}

impl<'g> Compiler<'g> {
    pub(crate) fn new(grammars: &'g BTreeMap<String, Grammar>, base: &'g Grammar) -> Self {
        Self {
            grammars,
            base,
            rules: Vec::new(),
            ids: HashMap::new(),
        }
    }

    pub(crate) fn finish(self) -> RuleSet {
        RuleSet { rules: self.rules }
    }

    /// Compiles the top-level patterns of `grammar` as one include list.
    pub(crate) fn compile_root(&mut self, grammar: &'g Grammar) -> RuleId {
        let key = RuleKey::Root(grammar.scope_name.clone());
        if let Some(id) = self.ids.get(&key) {
            return *id;
        }
        let id = self.reserve(key);
        let context = Context::root(grammar);
        let (patterns, has_missing_patterns) = self.compile_patterns(&grammar.patterns, &context);
        self.store(CompiledRule {
            id,
            name: Some(grammar.scope_name.clone()),
            content_name: None,
            kind: RuleKind::IncludeOnly { patterns },
            has_missing_patterns,
        });
        id
    }

    /// Compiles an injection rule declared in `grammar`.
    pub(crate) fn compile_injection(&mut self, rule: &'g Rule, grammar: &'g Grammar) -> RuleId {
        self.compile_rule(rule, &Context::root(grammar))
    }

    fn reserve(&mut self, key: RuleKey) -> RuleId {
        let id = self.rules.len();
        self.rules.push(None);
        self.ids.insert(key, id);
        id
    }

    fn store(&mut self, rule: CompiledRule) {
        let id = rule.id;
        if let Some(slot) = self.rules.get_mut(id) {
            *slot = Some(rule);
        }
    }

    fn compile_rule(&mut self, desc: &'g Rule, context: &Context<'g>) -> RuleId {
        let key = RuleKey::Rule(std::ptr::from_ref(desc).addr());
        if let Some(id) = self.ids.get(&key) {
            return *id;
        }
        let id = self.reserve(key);
        let mut inner = context.clone();
        if !desc.repository.is_empty() {
            inner.repositories.push(&desc.repository);
        }
        let context = &inner;

        let mut has_missing_patterns = false;
        let kind = if let Some(pattern) = desc.match_pattern.as_ref().filter(|p| !p.is_empty()) {
            RuleKind::Match {
                pattern: pattern.clone(),
                captures: self.compile_captures(&desc.captures, context),
            }
        } else if let Some(begin) = &desc.begin {
            let (patterns, missing) = self.compile_patterns(&desc.patterns, context);
            has_missing_patterns = missing;
            let begin_captures = self.compile_captures(
                fallback(&desc.begin_captures, &desc.captures),
                context,
            );
            if let Some(while_pattern) = &desc.while_pattern {
                RuleKind::BeginWhile {
                    begin: begin.clone(),
                    begin_captures,
                    while_pattern: while_pattern.clone(),
                    while_captures: self.compile_captures(
                        fallback(&desc.while_captures, &desc.captures),
                        context,
                    ),
                    while_has_back_references: has_back_references(while_pattern),
                    patterns,
                }
            } else {
                let end = desc.end.clone().unwrap_or_else(|| MISSING_END.to_owned());
                RuleKind::BeginEnd {
                    begin: begin.clone(),
                    begin_captures,
                    end_has_back_references: has_back_references(&end),
                    end,
                    end_captures: self.compile_captures(
                        fallback(&desc.end_captures, &desc.captures),
                        context,
                    ),
                    apply_end_pattern_last: desc.apply_end_pattern_last,
                    patterns,
                }
            }
        } else {
            let (patterns, missing) = match (&desc.include, desc.patterns.is_empty()) {
                (Some(reference), true) => {
                    let resolved: Vec<RuleId> = self
                        .resolve_include(reference, context)
                        .into_iter()
                        .filter(|id| !self.is_dropped(*id))
                        .collect();
                    let missing = resolved.is_empty();
                    (resolved, missing)
                }
                _ => self.compile_patterns(&desc.patterns, context),
            };
            has_missing_patterns = missing;
            RuleKind::IncludeOnly { patterns }
        };

        self.store(CompiledRule {
            id,
            name: desc.name.clone(),
            content_name: desc.content_name.clone(),
            kind,
            has_missing_patterns,
        });
        id
    }

    fn compile_patterns(
        &mut self,
        patterns: &'g [Rule],
        context: &Context<'g>,
    ) -> (Vec<RuleId>, bool) {
        let mut ids = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let id = match &pattern.include {
                Some(reference) => self.resolve_include(reference, context),
                None => Some(self.compile_rule(pattern, context)),
            };
            if let Some(id) = id.filter(|id| !self.is_dropped(*id)) {
                ids.push(id);
            }
        }
        let has_missing = ids.len() != patterns.len();
        (ids, has_missing)
    }

    fn is_dropped(&self, id: RuleId) -> bool {
        self.rules
            .get(id)
            .and_then(Option::as_ref)
            .is_some_and(CompiledRule::is_dropped)
    }

    fn resolve_include(&mut self, reference: &str, context: &Context<'g>) -> Option<RuleId> {
        match reference {
            "$self" => Some(self.compile_root(context.grammar)),
            "$base" => Some(self.compile_root(self.base)),
            _ => {
                if let Some(name) = reference.strip_prefix('#') {
                    let rule = context.lookup(name)?;
                    return Some(self.compile_rule(rule, context));
                }
                let (scope, fragment) = reference
                    .split_once('#')
                    .map_or((reference, None), |(scope, fragment)| (scope, Some(fragment)));
                let grammar = self.grammars.get(scope)?;
                if let Some(name) = fragment {
                    let rule = grammar.repository.get(name)?;
                    return Some(self.compile_rule(rule, &Context::root(grammar)));
                }
                Some(self.compile_root(grammar))
            }
        }
    }

    fn compile_captures(&mut self, captures: &'g Captures, context: &Context<'g>) -> CaptureRules {
        let Some(max) = captures
            .keys()
            .next_back()
            .and_then(|max| usize::try_from(*max).ok())
        else {
            return Vec::new();
        };
        let mut rules: CaptureRules = vec![None; max + 1];
        for (index, desc) in captures {
            let retokenize =
                (!desc.patterns.is_empty()).then(|| self.compile_rule(desc, context));
            let slot = usize::try_from(*index)
                .ok()
                .and_then(|index| rules.get_mut(index));
            if let Some(slot) = slot {
                *slot = Some(CaptureRule {
                    name: desc.name.clone(),
                    content_name: desc.content_name.clone(),
                    retokenize,
                });
            }
        }
        rules
    }
}

fn fallback<'a>(primary: &'a Captures, shared: &'a Captures) -> &'a Captures {
    if primary.is_empty() { shared } else { primary }
}

#[expect(
    clippy::expect_used,
    reason = "the reference pattern is a literal known to compile"
)]
static CAPTURE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(\d+)|\$\{(\d+):/(downcase|upcase)\}").expect("capture reference regex")
});

/// Expands `$n` and `${n:/downcase}` references in a scope name.
pub(crate) fn substitute_captures(
    name: &str,
    text: &str,
    captures: &[Option<(usize, usize)>],
) -> String {
    if !name.contains('$') {
        return name.to_owned();
    }
    CAPTURE_REFERENCE.replace_all(name, |reference: &onig::Captures<'_>| {
        let index = reference
            .at(1)
            .or_else(|| reference.at(2))
            .and_then(|digits| digits.parse::<usize>().ok());
        let captured = index
            .and_then(|index| captured_text(text, captures, index))
            .unwrap_or_default()
            .trim_start_matches('.');
        match reference.at(3) {
            Some("downcase") => captured.to_lowercase(),
            Some("upcase") => captured.to_uppercase(),
            _ => captured.to_owned(),
        }
    })
}
