//! A TextMate tokenizer backed by Oniguruma.
//!
//! The engine follows the scanning rules editors use for TextMate grammars:
//! first match wins by position and then by pattern order, `begin`/`end`
//! and `begin`/`while` regions nest on a rule stack carried across lines,
//! and injections are offered at every position whose scopes their
//! selector matches.

pub(crate) mod regex;
mod rule;
mod selector;
mod state;
mod tokenizer;

pub use state::StateStack;
pub use tokenizer::Tokenizer;

#[cfg(test)]
pub(crate) use rule::substitute_captures;
#[cfg(test)]
pub(crate) use selector::{InjectionPriority, parse as parse_selector};
