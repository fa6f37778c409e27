//! Injection selectors.
//!
//! A selector is a comma-separated list of alternatives. Each alternative
//! carries a priority prefix, a descendant path of scopes that must all be
//! present in order, and a list of scopes that must be absent.

use std::fmt;

/// Injection priority relative to the grammar's own patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// `L:`: wins ties against the grammar's own patterns.
    Left,
    /// `R:`: loses ties.
    Right,
    /// No prefix.
    Normal,
}

impl Priority {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Left => "L:",
            Self::Right => "R:",
            Self::Normal => "",
        }
    }
}

/// One alternative of an injection selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorPath {
    priority: Priority,
    path: Vec<String>,
    exclusions: Vec<String>,
}

impl SelectorPath {
    /// Starts an alternative anchored at `scope` with the given priority.
    #[must_use]
    pub fn new(priority: Priority, scope: impl Into<String>) -> Self {
        Self {
            priority,
            path: vec![scope.into()],
            exclusions: Vec::new(),
        }
    }

    /// Requires `scope` to appear below the scopes already on the path.
    #[must_use]
    pub fn within(mut self, scope: impl Into<String>) -> Self {
        self.path.push(scope.into());
        self
    }

    /// Requires every scope in `scopes` to be absent.
    #[must_use]
    pub fn excluding<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions.extend(scopes.into_iter().map(Into::into));
        self
    }

    /// Priority of the alternative.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Required scopes, outermost first.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Excluded scopes, in declaration order.
    #[must_use]
    pub fn exclusions(&self) -> &[String] {
        &self.exclusions
    }
}

impl fmt::Display for SelectorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.priority.prefix(), self.path.join(" "))?;
        for exclusion in &self.exclusions {
            write!(f, " -{exclusion}")?;
        }
        Ok(())
    }
}

/// A complete injection selector.
///
/// # Examples
///
/// ```
/// use jig_grammar::selector::{InjectionSelector, Priority, SelectorPath};
///
/// let selector = InjectionSelector::from(
///     SelectorPath::new(Priority::Left, "text.jig.html").excluding(["comment.block.jig"]),
/// );
/// assert_eq!(selector.to_string(), "L:text.jig.html -comment.block.jig");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionSelector {
    alternatives: Vec<SelectorPath>,
}

impl InjectionSelector {
    /// Adds another alternative.
    #[must_use]
    pub fn or(mut self, alternative: SelectorPath) -> Self {
        self.alternatives.push(alternative);
        self
    }

    /// Alternatives in declaration order.
    #[must_use]
    pub fn alternatives(&self) -> &[SelectorPath] {
        &self.alternatives
    }
}

impl From<SelectorPath> for InjectionSelector {
    fn from(alternative: SelectorPath) -> Self {
        Self {
            alternatives: vec![alternative],
        }
    }
}

impl fmt::Display for InjectionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, alternative) in self.alternatives.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{alternative}")?;
        }
        Ok(())
    }
}
