//! Line-by-line tokenization.
//!
//! Each line is scanned as `line + "\n"`. At every position the scanner of
//! the innermost open region is searched together with every injection
//! whose selector matches the region's content scopes; the earliest match
//! wins, an injection winning ties only when it carries `L:` priority.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};

use jig_grammar::tm::Grammar;
use tracing::debug;

use super::regex::{CaptureIndices, RegexCache, resolve_back_references};
use super::rule::{CaptureRule, Compiler, RuleId, RuleKind, RuleSet, substitute_captures};
use super::selector::{self, InjectionPriority, Matcher};
use super::state::{Frame, StateStack};
use crate::error::TokenizeError;
use crate::token::Token;

#[derive(Debug)]
struct Injection {
    matcher: Matcher,
    priority: InjectionPriority,
    rule: RuleId,
}

/// A compiled grammar, ready to tokenize documents.
#[derive(Debug)]
pub struct Tokenizer {
    scope: String,
    root: RuleId,
    rules: RuleSet,
    injections: Vec<Injection>,
    regexes: RegexCache,
}

impl Tokenizer {
    /// Compiles `root` together with the grammars it may include and the
    /// injection grammars targeting it.
    pub(crate) fn new(
        root: &Grammar,
        grammars: &BTreeMap<String, Grammar>,
        injectors: &[&Grammar],
    ) -> Self {
        let mut compiler = Compiler::new(grammars, root);
        let root_id = compiler.compile_root(root);

        let mut injections = Vec::new();
        for (selector, rule) in &root.injections {
            let id = compiler.compile_injection(rule, root);
            push_injections(&mut injections, selector, id);
        }
        for injector in injectors {
            let Some(selector) = &injector.injection_selector else {
                continue;
            };
            let id = compiler.compile_root(injector);
            push_injections(&mut injections, selector, id);
        }
        injections.sort_by_key(|injection| injection.priority);

        let rules = compiler.finish();
        debug!(
            scope = %root.scope_name,
            rules = rules.len(),
            injections = injections.len(),
            "compiled tokenizer"
        );
        Self {
            scope: root.scope_name.clone(),
            root: root_id,
            rules,
            injections,
            regexes: RegexCache::default(),
        }
    }

    /// Root scope of the tokenized grammar.
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Tokenizes one line, continuing from `state`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenizeError::Regex`] when a rule's pattern does not
    /// compile.
    pub fn tokenize_line(
        &mut self,
        line_number: usize,
        line: &str,
        state: &StateStack,
    ) -> Result<(Vec<Token>, StateStack), TokenizeError> {
        let is_first_line = state.is_initial();
        let mut stack = if is_first_line {
            vec![Frame::root(self.root, &self.scope)]
        } else {
            state.resume()
        };
        let text = format!("{line}\n");
        let mut tokens = LineTokens::default();

        let mut session = Session {
            rules: &self.rules,
            injections: &self.injections,
            regexes: &mut self.regexes,
        };
        session.tokenize_string(&text, is_first_line, 0, &mut stack, &mut tokens, true)?;

        let content_length = line.len();
        let mut spans = tokens.spans;
        if spans
            .last()
            .is_some_and(|(start, _, _)| *start + 1 == text.len())
        {
            spans.pop();
        }
        let tokens = spans
            .into_iter()
            .filter_map(|(start, end, scopes)| {
                let end = end.min(content_length);
                (start < end).then(|| Token {
                    line: line_number,
                    start,
                    end,
                    text: line.get(start..end).unwrap_or_default().to_owned(),
                    scopes,
                })
            })
            .collect();
        Ok((tokens, StateStack::from_frames(stack)))
    }

    /// Tokenizes a whole document, one token list per line.
    ///
    /// Lines are split on `\n`; a trailing `\r` is not part of the line.
    ///
    /// # Errors
    ///
    /// Returns [`TokenizeError::Regex`] when a rule's pattern does not
    /// compile.
    pub fn tokenize_document(&mut self, text: &str) -> Result<Vec<Vec<Token>>, TokenizeError> {
        let mut state = StateStack::initial();
        let mut lines = Vec::new();
        for (number, line) in text.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let (tokens, next) = self.tokenize_line(number, line, &state)?;
            lines.push(tokens);
            state = next;
        }
        Ok(lines)
    }
}

fn push_injections(injections: &mut Vec<Injection>, selector: &str, rule: RuleId) {
    for (matcher, priority) in selector::parse(selector) {
        injections.push(Injection {
            matcher,
            priority,
            rule,
        });
    }
}

#[derive(Debug, Default)]
struct LineTokens {
    spans: Vec<(usize, usize, Vec<String>)>,
    last_end: usize,
}

impl LineTokens {
    fn produce(&mut self, scopes: &[String], end: usize) {
        if self.last_end >= end {
            return;
        }
        self.spans.push((self.last_end, end, scopes.to_vec()));
        self.last_end = end;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanTarget {
    End,
    Rule(RuleId),
}

struct Match {
    captures: CaptureIndices,
    target: ScanTarget,
    start: usize,
    end: usize,
}

/// Scan position flags shared by every search at one position.
#[derive(Clone, Copy)]
struct Position {
    line_pos: usize,
    is_first_line: bool,
    anchor: Option<usize>,
}

impl Position {
    fn allow_g(self) -> bool {
        self.anchor == Some(self.line_pos)
    }
}

struct Session<'t> {
    rules: &'t RuleSet,
    injections: &'t [Injection],
    regexes: &'t mut RegexCache,
}

impl<'t> Session<'t> {
    fn tokenize_string(
        &mut self,
        text: &str,
        is_first_line: bool,
        line_pos: usize,
        stack: &mut Vec<Frame>,
        tokens: &mut LineTokens,
        check_while: bool,
    ) -> Result<(), TokenizeError> {
        let rules = self.rules;
        let line_length = text.len();
        let mut position = Position {
            line_pos,
            is_first_line,
            anchor: None,
        };
        if check_while {
            position = self.check_while_conditions(text, position, stack, tokens)?;
        }

        loop {
            let Some(top) = stack.last() else {
                return Ok(());
            };
            let Some(found) = self.match_rule_or_injections(top, text, position)? else {
                tokens.produce(&top.content_scopes, line_length);
                return Ok(());
            };
            let has_advanced = found.end > position.line_pos;

            match found.target {
                ScanTarget::End => {
                    let Some(top) = stack.last_mut() else {
                        return Ok(());
                    };
                    tokens.produce(&top.content_scopes, found.start);
                    top.content_scopes = top.name_scopes.clone();
                    let end_captures = match rules.get(top.rule).map(|rule| &rule.kind) {
                        Some(RuleKind::BeginEnd { end_captures, .. }) => end_captures.as_slice(),
                        _ => &[],
                    };
                    self.handle_captures(
                        text,
                        position.is_first_line,
                        stack,
                        tokens,
                        end_captures,
                        &found.captures,
                    )?;
                    if let Some(top) = stack.last() {
                        tokens.produce(&top.content_scopes, found.end);
                    }
                    let Some(popped) = stack.pop() else {
                        return Ok(());
                    };
                    position.anchor = popped.anchor_pos;
                    if !has_advanced && popped.enter_pos == Some(position.line_pos) {
                        tokens.produce(&popped.content_scopes, line_length);
                        stack.push(popped);
                        return Ok(());
                    }
                }
                ScanTarget::Rule(id) => {
                    let Some(rule) = rules.get(id) else {
                        return Ok(());
                    };
                    tokens.produce(&top.content_scopes, found.start);
                    let name = rule
                        .name
                        .as_deref()
                        .map(|name| substitute_captures(name, text, &found.captures));
                    let name_scopes = push_scopes(&top.content_scopes, name.as_deref());
                    stack.push(Frame {
                        rule: id,
                        enter_pos: Some(position.line_pos),
                        anchor_pos: position.anchor,
                        captured_eol: found.end == line_length,
                        end_rule: None,
                        name_scopes: name_scopes.clone(),
                        content_scopes: name_scopes,
                    });

                    match &rule.kind {
                        RuleKind::BeginEnd {
                            begin_captures,
                            end,
                            end_has_back_references,
                            ..
                        } => {
                            let end_rule = end_has_back_references
                                .then(|| resolve_back_references(end, text, &found.captures));
                            if let Some(top) = stack.last_mut() {
                                top.end_rule = end_rule;
                            }
                            if self.enter_region(
                                text,
                                position,
                                stack,
                                tokens,
                                begin_captures,
                                &found,
                            )? {
                                return Ok(());
                            }
                            position.anchor = Some(found.end);
                        }
                        RuleKind::BeginWhile {
                            begin_captures,
                            while_pattern,
                            while_has_back_references,
                            ..
                        } => {
                            let end_rule = while_has_back_references.then(|| {
                                resolve_back_references(while_pattern, text, &found.captures)
                            });
                            if let Some(top) = stack.last_mut() {
                                top.end_rule = end_rule;
                            }
                            if self.enter_region(
                                text,
                                position,
                                stack,
                                tokens,
                                begin_captures,
                                &found,
                            )? {
                                return Ok(());
                            }
                            position.anchor = Some(found.end);
                        }
                        RuleKind::Match { captures, .. } => {
                            self.handle_captures(
                                text,
                                position.is_first_line,
                                stack,
                                tokens,
                                captures,
                                &found.captures,
                            )?;
                            if let Some(top) = stack.last() {
                                tokens.produce(&top.content_scopes, found.end);
                            }
                            stack.pop();
                            if !has_advanced {
                                if stack.len() > 1 {
                                    stack.pop();
                                }
                                if let Some(top) = stack.last() {
                                    tokens.produce(&top.content_scopes, line_length);
                                }
                                return Ok(());
                            }
                        }
                        RuleKind::IncludeOnly { .. } => {
                            stack.pop();
                            return Ok(());
                        }
                    }
                }
            }

            if found.end > position.line_pos {
                position.line_pos = found.end;
                position.is_first_line = false;
            }
        }
    }

    /// Finishes pushing a region whose begin just matched.
    ///
    /// Returns `true` when the region re-entered itself without consuming
    /// input, which ends the line.
    fn enter_region(
        &mut self,
        text: &str,
        position: Position,
        stack: &mut Vec<Frame>,
        tokens: &mut LineTokens,
        begin_captures: &[Option<CaptureRule>],
        found: &Match,
    ) -> Result<bool, TokenizeError> {
        self.handle_captures(
            text,
            position.is_first_line,
            stack,
            tokens,
            begin_captures,
            &found.captures,
        )?;
        let Some(top) = stack.last_mut() else {
            return Ok(true);
        };
        tokens.produce(&top.content_scopes, found.end);
        let content_name = self
            .rules
            .get(top.rule)
            .and_then(|rule| rule.content_name.as_deref())
            .map(|name| substitute_captures(name, text, &found.captures));
        top.content_scopes = push_scopes(&top.name_scopes, content_name.as_deref());

        let has_advanced = found.end > position.line_pos;
        if !has_advanced && re_enters_same_rule(stack) {
            stack.pop();
            if let Some(top) = stack.last() {
                tokens.produce(&top.content_scopes, text.len());
            }
            return Ok(true);
        }
        Ok(false)
    }

    /// Checks the `while` condition of every open begin/while region,
    /// outermost first, closing the first region whose condition fails
    /// along with everything nested in it.
    fn check_while_conditions(
        &mut self,
        text: &str,
        mut position: Position,
        stack: &mut Vec<Frame>,
        tokens: &mut LineTokens,
    ) -> Result<Position, TokenizeError> {
        let rules = self.rules;
        position.anchor = stack
            .last()
            .is_some_and(|frame| frame.captured_eol)
            .then_some(0);

        let while_frames: Vec<usize> = stack
            .iter()
            .enumerate()
            .filter(|(_, frame)| {
                matches!(
                    rules.get(frame.rule).map(|rule| &rule.kind),
                    Some(RuleKind::BeginWhile { .. })
                )
            })
            .map(|(index, _)| index)
            .collect();

        for index in while_frames {
            let Some(frame) = stack.get(index) else {
                break;
            };
            let Some(RuleKind::BeginWhile {
                while_pattern,
                while_captures,
                ..
            }) = rules.get(frame.rule).map(|rule| &rule.kind)
            else {
                break;
            };
            let source = frame.end_rule.as_deref().unwrap_or(while_pattern);
            let found = self.regexes.search(
                source,
                text,
                position.line_pos,
                position.is_first_line,
                position.allow_g(),
            )?;
            let Some((start, end)) = found
                .as_ref()
                .and_then(|captures| captures.first().copied().flatten())
            else {
                stack.truncate(index);
                break;
            };
            let captures = found.unwrap_or_default();
            tokens.produce(&frame.content_scopes, start);
            let content_scopes = frame.content_scopes.clone();
            let enclosing = stack.get(..=index).unwrap_or_default();
            self.handle_captures(
                text,
                position.is_first_line,
                enclosing,
                tokens,
                while_captures,
                &captures,
            )?;
            tokens.produce(&content_scopes, end);
            position.anchor = Some(end);
            if end > position.line_pos {
                position.line_pos = end;
                position.is_first_line = false;
            }
        }
        Ok(position)
    }

    fn match_rule_or_injections(
        &mut self,
        frame: &Frame,
        text: &str,
        position: Position,
    ) -> Result<Option<Match>, TokenizeError> {
        let matched = self.match_rule(frame, text, position)?;
        if self.injections.is_empty() {
            return Ok(matched);
        }
        let Some((injected, priority)) =
            self.match_injections(&frame.content_scopes, text, position)?
        else {
            return Ok(matched);
        };
        let Some(matched) = matched else {
            return Ok(Some(injected));
        };
        let injection_wins = injected.start < matched.start
            || (injected.start == matched.start && priority == InjectionPriority::Left);
        Ok(Some(if injection_wins { injected } else { matched }))
    }

    fn match_rule(
        &mut self,
        frame: &Frame,
        text: &str,
        position: Position,
    ) -> Result<Option<Match>, TokenizeError> {
        let rules = self.rules;
        let Some(rule) = rules.get(frame.rule) else {
            return Ok(None);
        };
        let mut candidates = Vec::new();
        let mut visited = HashSet::new();
        match &rule.kind {
            RuleKind::Match { pattern, .. } => {
                candidates.push((Cow::Borrowed(pattern.as_str()), ScanTarget::Rule(rule.id)));
            }
            RuleKind::IncludeOnly { patterns } | RuleKind::BeginWhile { patterns, .. } => {
                self.collect(patterns, &mut candidates, &mut visited);
            }
            RuleKind::BeginEnd {
                end,
                apply_end_pattern_last,
                patterns,
                ..
            } => {
                self.collect(patterns, &mut candidates, &mut visited);
                let end = frame
                    .end_rule
                    .clone()
                    .map_or(Cow::Borrowed(end.as_str()), Cow::Owned);
                if *apply_end_pattern_last {
                    candidates.push((end, ScanTarget::End));
                } else {
                    candidates.insert(0, (end, ScanTarget::End));
                }
            }
        }
        self.search_first(&candidates, text, position)
    }

    fn match_injections(
        &mut self,
        scopes: &[String],
        text: &str,
        position: Position,
    ) -> Result<Option<(Match, InjectionPriority)>, TokenizeError> {
        let injections = self.injections;
        let mut best: Option<(Match, InjectionPriority)> = None;
        for injection in injections {
            if !injection.matcher.matches(scopes) {
                continue;
            }
            let mut candidates = Vec::new();
            self.collect(&[injection.rule], &mut candidates, &mut HashSet::new());
            let Some(found) = self.search_first(&candidates, text, position)? else {
                continue;
            };
            if best
                .as_ref()
                .is_some_and(|(current, _)| found.start >= current.start)
            {
                continue;
            }
            let at_line_pos = found.start == position.line_pos;
            best = Some((found, injection.priority));
            if at_line_pos {
                break;
            }
        }
        Ok(best)
    }

    /// Earliest match among `candidates`; ties go to the earlier candidate.
    fn search_first(
        &mut self,
        candidates: &[(Cow<'t, str>, ScanTarget)],
        text: &str,
        position: Position,
    ) -> Result<Option<Match>, TokenizeError> {
        let mut best: Option<Match> = None;
        for (source, target) in candidates {
            let Some(captures) = self.regexes.search(
                source,
                text,
                position.line_pos,
                position.is_first_line,
                position.allow_g(),
            )?
            else {
                continue;
            };
            let Some((start, end)) = captures.first().copied().flatten() else {
                continue;
            };
            if best.as_ref().is_some_and(|current| start >= current.start) {
                continue;
            }
            best = Some(Match {
                captures,
                target: *target,
                start,
                end,
            });
            if start == position.line_pos {
                break;
            }
        }
        Ok(best)
    }

    /// Flattens include lists into the begin and match patterns they reach.
    fn collect(
        &self,
        patterns: &[RuleId],
        candidates: &mut Vec<(Cow<'t, str>, ScanTarget)>,
        visited: &mut HashSet<RuleId>,
    ) {
        let rules = self.rules;
        for id in patterns {
            let Some(rule) = rules.get(*id) else {
                continue;
            };
            match &rule.kind {
                RuleKind::Match { pattern, .. } => {
                    candidates.push((Cow::Borrowed(pattern.as_str()), ScanTarget::Rule(*id)));
                }
                RuleKind::BeginEnd { begin, .. } | RuleKind::BeginWhile { begin, .. } => {
                    candidates.push((Cow::Borrowed(begin.as_str()), ScanTarget::Rule(*id)));
                }
                RuleKind::IncludeOnly { patterns } => {
                    if visited.insert(*id) {
                        self.collect(patterns, candidates, visited);
                    }
                }
            }
        }
    }

    /// Scopes the capture groups of a match, retokenizing captures that
    /// carry their own patterns.
    fn handle_captures(
        &mut self,
        text: &str,
        is_first_line: bool,
        stack: &[Frame],
        tokens: &mut LineTokens,
        rules: &[Option<CaptureRule>],
        captures: &CaptureIndices,
    ) -> Result<(), TokenizeError> {
        let Some(top) = stack.last() else {
            return Ok(());
        };
        if rules.is_empty() {
            return Ok(());
        }
        let Some((_, max_end)) = captures.first().copied().flatten() else {
            return Ok(());
        };

        let mut local: Vec<(Vec<String>, usize)> = Vec::new();
        for (rule, span) in rules.iter().zip(captures) {
            let (Some(rule), Some((start, end))) = (rule, *span) else {
                continue;
            };
            if start == end {
                continue;
            }
            if start > max_end {
                break;
            }
            while let Some((scopes, local_end)) = local.last() {
                if *local_end > start {
                    break;
                }
                tokens.produce(scopes, *local_end);
                local.pop();
            }
            let enclosing = local
                .last()
                .map_or(top.content_scopes.as_slice(), |(scopes, _)| scopes.as_slice());
            tokens.produce(enclosing, start);

            let name = rule
                .name
                .as_deref()
                .map(|name| substitute_captures(name, text, captures));
            if let Some(retokenize) = rule.retokenize {
                let name_scopes = push_scopes(&top.content_scopes, name.as_deref());
                let content_name = rule
                    .content_name
                    .as_deref()
                    .map(|name| substitute_captures(name, text, captures));
                let content_scopes = push_scopes(&name_scopes, content_name.as_deref());
                let mut nested = stack.to_vec();
                nested.push(Frame {
                    rule: retokenize,
                    enter_pos: Some(start),
                    anchor_pos: None,
                    captured_eol: false,
                    end_rule: None,
                    name_scopes,
                    content_scopes,
                });
                let captured = text.get(..end).unwrap_or(text);
                self.tokenize_string(
                    captured,
                    is_first_line && start == 0,
                    start,
                    &mut nested,
                    tokens,
                    false,
                )?;
                continue;
            }
            if let Some(name) = name {
                let base = local
                    .last()
                    .map_or(top.content_scopes.as_slice(), |(scopes, _)| scopes.as_slice());
                local.push((push_scopes(base, Some(&name)), end));
            }
        }
        while let Some((scopes, end)) = local.pop() {
            tokens.produce(&scopes, end);
        }
        Ok(())
    }
}

/// Whether the region just pushed repeats a region entered at the same
/// position, which would otherwise loop forever.
fn re_enters_same_rule(stack: &[Frame]) -> bool {
    let Some((top, below)) = stack.split_last() else {
        return false;
    };
    below
        .iter()
        .rev()
        .take_while(|frame| frame.enter_pos == top.enter_pos)
        .any(|frame| frame.rule == top.rule)
}

/// Appends the space-separated scopes of `name` to `base`.
fn push_scopes(base: &[String], name: Option<&str>) -> Vec<String> {
    let mut scopes = base.to_vec();
    if let Some(name) = name {
        scopes.extend(name.split_whitespace().map(str::to_owned));
    }
    scopes
}
