//! Unit and behaviour tests for grammar composition.

mod family_tests;

use jig_registry::Registry;
use rstest::fixture;

/// The registry shipped with the toolkit.
#[fixture]
pub(crate) fn registry() -> Registry {
    Registry::builtin().unwrap_or_else(|err| panic!("builtin registry: {err}"))
}
