//! Tokens produced by the tokenizer.

use std::fmt;

/// A run of text on one line with a single scope stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Zero-based line number.
    pub line: usize,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    /// The covered text.
    pub text: String,
    /// Scope stack, outermost first.
    pub scopes: Vec<String>,
}

impl Token {
    /// Whether the stack contains exactly `scope`.
    #[must_use]
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|candidate| candidate == scope)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}..{} {:?} [{}]",
            self.line,
            self.start,
            self.end,
            self.text,
            self.scopes.join(" ")
        )
    }
}
