//! Line anchors for line-oriented rules.

/// Where a line-oriented rule may start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// True start of line (`^`). Used inside grammars that own the line.
    LineStart,
    /// Start of line or the point where the previous match ended
    /// (`(^|\G)`). Used when rules are injected into a foreign grammar's
    /// multi-line region, which may already have consumed a line prefix.
    Continuation,
}

impl Anchor {
    /// Regex prefix implementing the anchor.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::LineStart => "^",
            Self::Continuation => r"(^|\G)",
        }
    }

    /// Number of capture groups the prefix introduces.
    #[must_use]
    pub const fn capture_offset(self) -> u32 {
        match self {
            Self::LineStart => 0,
            Self::Continuation => 1,
        }
    }

    /// Renumbers a capture index written for [`Anchor::LineStart`].
    ///
    /// Index 0 (the whole match) never shifts.
    #[must_use]
    pub const fn shift(self, index: u32) -> u32 {
        if index == 0 {
            0
        } else {
            index + self.capture_offset()
        }
    }
}
