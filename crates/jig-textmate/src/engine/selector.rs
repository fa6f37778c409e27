//! Injection selector matching.
//!
//! Grammar: a selector is a `,`-separated list of alternatives, each with
//! an optional `L:`/`R:` priority prefix. An alternative is a conjunction
//! of operands; an operand is a descendant path of scope names, a negated
//! operand (`-x`), or a parenthesised group whose members are joined by
//! `|` or `,`.

use std::sync::LazyLock;

use onig::Regex;

/// Tie-breaking priority of an injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum InjectionPriority {
    /// `L:`: wins ties against the grammar's own patterns.
    Left,
    /// No prefix.
    Normal,
    /// `R:`: loses ties.
    Right,
}

/// A parsed selector expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Matcher {
    /// Scope names that must appear in order, each matching by prefix.
    Path(Vec<String>),
    /// Holds when the operand is present and does not match.
    Not(Option<Box<Matcher>>),
    /// Every member must match.
    All(Vec<Matcher>),
    /// Some member must match.
    Any(Vec<Matcher>),
}

impl Matcher {
    /// Evaluates the matcher against a scope stack, outermost first.
    pub(crate) fn matches(&self, scopes: &[String]) -> bool {
        match self {
            Self::Path(names) => path_matches(names, scopes),
            Self::Not(operand) => operand
                .as_ref()
                .is_some_and(|operand| !operand.matches(scopes)),
            Self::All(members) => members.iter().all(|member| member.matches(scopes)),
            Self::Any(members) => members.iter().any(|member| member.matches(scopes)),
        }
    }
}

#[expect(
    clippy::expect_used,
    reason = "the token pattern is a literal known to compile"
)]
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([LR]:|[\w\.:][\w\.:\-]*|[\,\|\-\(\)])").expect("selector token regex")
});

/// Parses `selector` into its prioritised alternatives.
pub(crate) fn parse(selector: &str) -> Vec<(Matcher, InjectionPriority)> {
    let tokens: Vec<&str> = TOKEN
        .find_iter(selector)
        .filter_map(|(start, end)| selector.get(start..end))
        .collect();
    let mut parser = Parser { tokens, next: 0 };
    let mut alternatives = Vec::new();
    while parser.peek().is_some() {
        let mut priority = InjectionPriority::Normal;
        match parser.peek() {
            Some("L:") => {
                priority = InjectionPriority::Left;
                parser.advance();
            }
            Some("R:") => {
                priority = InjectionPriority::Right;
                parser.advance();
            }
            _ => {}
        }
        alternatives.push((parser.conjunction(), priority));
        if parser.peek() != Some(",") {
            break;
        }
        parser.advance();
    }
    alternatives
}

struct Parser<'a> {
    tokens: Vec<&'a str>,
    next: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.next).copied()
    }

    fn advance(&mut self) {
        self.next += 1;
    }

    fn operand(&mut self) -> Option<Matcher> {
        match self.peek()? {
            "-" => {
                self.advance();
                Some(Matcher::Not(self.operand().map(Box::new)))
            }
            "(" => {
                self.advance();
                let inner = self.disjunction();
                if self.peek() == Some(")") {
                    self.advance();
                }
                Some(inner)
            }
            token if is_identifier(token) => {
                let mut names = Vec::new();
                while let Some(name) = self.peek().filter(|token| is_identifier(token)) {
                    names.push(name.to_owned());
                    self.advance();
                }
                Some(Matcher::Path(names))
            }
            _ => None,
        }
    }

    fn conjunction(&mut self) -> Matcher {
        let mut members = Vec::new();
        while let Some(member) = self.operand() {
            members.push(member);
        }
        Matcher::All(members)
    }

    fn disjunction(&mut self) -> Matcher {
        let mut members = Vec::new();
        loop {
            members.push(self.conjunction());
            if !matches!(self.peek(), Some("|" | ",")) {
                break;
            }
            while matches!(self.peek(), Some("|" | ",")) {
                self.advance();
            }
        }
        Matcher::Any(members)
    }
}

fn is_identifier(token: &str) -> bool {
    token
        .chars()
        .any(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | ':'))
}

/// Each name must match a scope after the previous name's match.
fn path_matches(names: &[String], scopes: &[String]) -> bool {
    if scopes.len() < names.len() {
        return false;
    }
    let mut remaining = scopes.iter();
    names
        .iter()
        .all(|name| remaining.any(|scope| scope_matches(scope, name)))
}

/// `scope` is `name` or a descendant of it (`name.` prefix).
pub(crate) fn scope_matches(scope: &str, name: &str) -> bool {
    scope
        .strip_prefix(name)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}
