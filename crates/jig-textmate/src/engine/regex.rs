//! Regex sources and the compiled-regex cache.
//!
//! Rule sources are rewritten before compilation: `\A` and `\G` are
//! disabled when the scan position does not allow them, and back-references
//! in `end`/`while` patterns are replaced with the escaped text captured by
//! the matching `begin`.

use std::borrow::Cow;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use onig::{Regex, RegexOptions, Region, SearchOptions, Syntax};

use crate::error::TokenizeError;

/// Capture spans of one match; index 0 is the whole match.
pub(crate) type CaptureIndices = Vec<Option<(usize, usize)>>;

const NEVER: &str = "(?!)";

/// Compiled regexes keyed by their final source text.
#[derive(Default)]
pub(crate) struct RegexCache {
    compiled: HashMap<String, Regex>,
}

impl std::fmt::Debug for RegexCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegexCache")
            .field("compiled", &self.compiled.len())
            .finish()
    }
}

impl RegexCache {
    /// Searches `text` from byte offset `from` with `source`.
    ///
    /// `allow_a` and `allow_g` say whether `\A` and `\G` may match at this
    /// scan position.
    pub(crate) fn search(
        &mut self,
        source: &str,
        text: &str,
        from: usize,
        allow_a: bool,
        allow_g: bool,
    ) -> Result<Option<CaptureIndices>, TokenizeError> {
        let source = resolve_anchors(source, allow_a, allow_g);
        let regex = self.compile(&source)?;
        let mut region = Region::new();
        let found = regex.search_with_options(
            text,
            from,
            text.len(),
            SearchOptions::SEARCH_OPTION_NONE,
            Some(&mut region),
        );
        Ok(found.map(|_| (0..region.len()).map(|index| region.pos(index)).collect()))
    }

    fn compile(&mut self, source: &str) -> Result<&Regex, TokenizeError> {
        match self.compiled.entry(source.to_owned()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(compile(source)?)),
        }
    }
}

/// Compiles `source` with the options TextMate engines use.
///
/// # Errors
///
/// Returns [`TokenizeError::Regex`] when Oniguruma rejects the pattern.
pub fn compile(source: &str) -> Result<Regex, TokenizeError> {
    Regex::with_options(
        source,
        RegexOptions::REGEX_OPTION_CAPTURE_GROUP,
        Syntax::default(),
    )
    .map_err(|error| TokenizeError::regex(source, &error))
}

/// Replaces disallowed `\A` and `\G` anchors with a never-matching group.
pub(crate) fn resolve_anchors(source: &str, allow_a: bool, allow_g: bool) -> Cow<'_, str> {
    if (allow_a && allow_g) || !source.contains('\\') {
        return Cow::Borrowed(source);
    }
    let mut resolved = String::with_capacity(source.len());
    let mut chars = source.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            resolved.push(c);
            continue;
        }
        match chars.next() {
            Some('A') if !allow_a => resolved.push_str(NEVER),
            Some('G') if !allow_g => resolved.push_str(NEVER),
            Some(next) => {
                resolved.push('\\');
                resolved.push(next);
            }
            None => resolved.push('\\'),
        }
    }
    Cow::Owned(resolved)
}

/// Whether `source` contains a numbered back-reference.
pub(crate) fn has_back_references(source: &str) -> bool {
    let mut chars = source.chars();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.next().is_some_and(|next| next.is_ascii_digit()) {
            return true;
        }
    }
    false
}

/// Replaces `\N` back-references with the escaped text of capture `N`.
///
/// Captures that did not participate in the match resolve to the empty
/// string.
pub(crate) fn resolve_back_references(
    source: &str,
    text: &str,
    captures: &[Option<(usize, usize)>],
) -> String {
    let mut resolved = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            resolved.push(c);
            continue;
        }
        let mut digits = String::new();
        while let Some(digit) = chars.next_if(char::is_ascii_digit) {
            digits.push(digit);
        }
        if digits.is_empty() {
            resolved.push('\\');
            if let Some(next) = chars.next() {
                resolved.push(next);
            }
            continue;
        }
        let captured = digits
            .parse::<usize>()
            .ok()
            .and_then(|index| captured_text(text, captures, index))
            .unwrap_or_default();
        resolved.push_str(&escape(captured));
    }
    resolved
}

/// Text covered by capture `index`, if it participated in the match.
pub(crate) fn captured_text<'a>(
    text: &'a str,
    captures: &[Option<(usize, usize)>],
    index: usize,
) -> Option<&'a str> {
    let (start, end) = (*captures.get(index)?)?;
    text.get(start..end)
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_whitespace()
            || matches!(
                c,
                '-' | '\\'
                    | '{'
                    | '}'
                    | '*'
                    | '+'
                    | '?'
                    | '|'
                    | '^'
                    | '$'
                    | '.'
                    | ','
                    | '['
                    | ']'
                    | '('
                    | ')'
                    | '#'
            )
        {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
