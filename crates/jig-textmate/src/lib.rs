//! TextMate tokenization for verifying generated Jig grammars.
//!
//! [`Harness`] loads the grammars an extension manifest declares, adds
//! stand-ins for host grammars, and tokenizes documents line by line with a
//! TextMate-compatible engine. The [`assertions`] module checks the
//! resulting scope stacks by exact scope name.
//!
//! ```no_run
//! use camino::Utf8Path;
//! use jig_textmate::{Harness, assertions, fixtures};
//!
//! let harness = Harness::from_manifest(Utf8Path::new("package.json"), fixtures::host_grammars()?)?;
//! let lines = harness.tokenize("text.jig.html", "{{ name }}")?;
//! assertions::assert_has_scope(&lines, 0, "{{", "punctuation.section.interpolation.begin.jig");
//! # Ok::<(), jig_textmate::HarnessError>(())
//! ```

pub mod assertions;
mod engine;
mod error;
pub mod fixtures;
mod harness;
mod registry;
mod token;

pub use engine::regex::compile as compile_pattern;
pub use engine::{StateStack, Tokenizer};
pub use error::{HarnessError, TokenizeError};
pub use harness::{Harness, load_grammar};
pub use registry::GrammarRegistry;
pub use token::Token;

#[cfg(test)]
mod tests;
