//! Declarative catalogue of the host languages Jig can embed.
//!
//! The registry is the leaf of the grammar toolkit: every other component
//! derives its output from a [`Registry`] snapshot. It provides:
//!
//! - [`LanguageDescriptor`] records, one per host language, in declaration
//!   order (the order is the tie-break priority for embed rules)
//! - [`ReservedTags`], the single list of tag names with dedicated meaning
//! - validation that rejects duplicate ids and ambiguous aliases before any
//!   grammar is generated
//!
//! # Example
//!
//! ```
//! use jig_registry::Registry;
//!
//! let registry = Registry::builtin()?;
//! assert_eq!(registry.ids().next(), Some("html"));
//! assert!(registry.reserved_tags().contains("end"));
//! # Ok::<(), jig_registry::RegistryError>(())
//! ```

mod descriptor;
mod error;
mod registry;
mod reserved;

pub use descriptor::LanguageDescriptor;
pub use error::RegistryError;
pub use registry::Registry;
pub use reserved::ReservedTags;

#[cfg(test)]
mod tests;
