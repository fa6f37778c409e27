//! The rule stack carried from one line to the next.

use super::rule::RuleId;

/// One open region (or the root) on the rule stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Frame {
    pub(crate) rule: RuleId,
    /// Position the region was entered at on the current line.
    pub(crate) enter_pos: Option<usize>,
    /// Position `\G` matches at after the region's begin.
    pub(crate) anchor_pos: Option<usize>,
    /// Whether the begin match reached the end of its line.
    pub(crate) captured_eol: bool,
    /// End or while pattern with back-references resolved.
    pub(crate) end_rule: Option<String>,
    pub(crate) name_scopes: Vec<String>,
    pub(crate) content_scopes: Vec<String>,
}

impl Frame {
    pub(crate) fn root(rule: RuleId, scope: &str) -> Self {
        let scopes = vec![scope.to_owned()];
        Self {
            rule,
            enter_pos: None,
            anchor_pos: None,
            captured_eol: false,
            end_rule: None,
            name_scopes: scopes.clone(),
            content_scopes: scopes,
        }
    }
}

/// Rule stack state between lines.
///
/// The empty stack is the state before the first line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateStack {
    frames: Vec<Frame>,
}

impl StateStack {
    /// The state before the first line of a document.
    #[must_use]
    pub const fn initial() -> Self {
        Self { frames: Vec::new() }
    }

    /// Whether no line has been tokenized yet.
    #[must_use]
    pub fn is_initial(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of open regions, including the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Frames to resume from on the next line; line positions are reset.
    pub(crate) fn resume(&self) -> Vec<Frame> {
        self.frames
            .iter()
            .cloned()
            .map(|mut frame| {
                frame.enter_pos = None;
                frame.anchor_pos = None;
                frame
            })
            .collect()
    }

    pub(crate) const fn from_frames(frames: Vec<Frame>) -> Self {
        Self { frames }
    }
}
