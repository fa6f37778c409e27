//! Grammar composition for the Jig template language.
//!
//! From an ordered language registry this crate derives a family of TextMate
//! grammars: one per host language, a shared grammar for plain `.jig` files,
//! and an injection grammar for fenced blocks in markdown. Each per-language
//! grammar tries embeds of every other language first (in registry order),
//! then Jig's own rules, then the host language's grammar.
//!
//! ```
//! use jig_grammar::GrammarFamily;
//! use jig_registry::Registry;
//!
//! let registry = Registry::builtin()?;
//! let family = GrammarFamily::generate(&registry)?;
//! assert!(family.grammar("text.jig.html").is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod anchor;
pub mod assembler;
pub mod embed;
mod error;
pub mod family;
pub mod fenced;
pub mod library;
pub mod regex;
pub mod scopes;
pub mod selector;
pub mod tm;

pub use anchor::Anchor;
pub use assembler::{GeneratedGrammar, assemble, assemble_base};
pub use embed::{EmbedRule, EmbedVariant, Termination, synthesize};
pub use error::GrammarError;
pub use family::{
    Artifact, ArtifactLayout, Drift, GrammarFamily, WriteReport, check_artifacts, write_artifacts,
};
pub use fenced::{FencedGrammar, fenced};
pub use library::{NamedRule, PatternLibrary};
pub use selector::{InjectionSelector, Priority, SelectorPath};
pub use tm::{Grammar, Rule};

#[cfg(test)]
mod tests;
