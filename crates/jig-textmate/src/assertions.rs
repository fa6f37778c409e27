//! Exact-match scope assertions over tokenized documents.
//!
//! Scopes are compared whole: `meta.tag.jig` does not satisfy a check for
//! `meta.tag`, and `meta.tag` does not satisfy one for `meta.tag.jig`.

use crate::token::Token;

/// Finds the first token on `line` whose text is exactly `text`.
#[must_use]
pub fn find_token<'a>(lines: &'a [Vec<Token>], line: usize, text: &str) -> Option<&'a Token> {
    lines.get(line)?.iter().find(|token| token.text == text)
}

/// Asserts that the token `text` on `line` carries `scope`.
///
/// # Panics
///
/// Panics when the token does not exist or lacks the scope.
#[track_caller]
pub fn assert_has_scope(lines: &[Vec<Token>], line: usize, text: &str, scope: &str) {
    let token = require_token(lines, line, text);
    assert!(
        token.has_scope(scope),
        "expected {token} to carry scope {scope}"
    );
}

/// Asserts that the token `text` on `line` does not carry `scope`.
///
/// # Panics
///
/// Panics when the token does not exist or carries the scope.
#[track_caller]
pub fn assert_lacks_scope(lines: &[Vec<Token>], line: usize, text: &str, scope: &str) {
    let token = require_token(lines, line, text);
    assert!(
        !token.has_scope(scope),
        "expected {token} not to carry scope {scope}"
    );
}

/// Asserts that no token anywhere in the document carries `scope`.
///
/// # Panics
///
/// Panics on the first token carrying the scope.
#[track_caller]
pub fn assert_no_scope_anywhere(lines: &[Vec<Token>], scope: &str) {
    if let Some(token) = lines.iter().flatten().find(|token| token.has_scope(scope)) {
        panic!("expected no token to carry scope {scope}, found {token}");
    }
}

#[track_caller]
fn require_token<'a>(lines: &'a [Vec<Token>], line: usize, text: &str) -> &'a Token {
    let Some(token) = find_token(lines, line, text) else {
        let available = lines
            .get(line)
            .map(|tokens| {
                tokens
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        panic!("no token {text:?} on line {line}; line has: [{available}]");
    };
    token
}
