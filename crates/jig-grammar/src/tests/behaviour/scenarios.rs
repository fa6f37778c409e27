//! Scenario bindings for the grammar generation feature file.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::scenario;

use super::TestWorld;

#[fixture]
fn world() -> RefCell<TestWorld> {
    super::world()
}

#[scenario(
    path = "tests/features/grammar_generation.feature",
    name = "Host grammars try embeds in registry order"
)]
fn embeds_in_registry_order(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/grammar_generation.feature",
    name = "Greedy targets are pierced by an injection"
)]
fn greedy_targets_pierced(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/grammar_generation.feature",
    name = "Registries without greedy languages need no piercing injection"
)]
fn no_greedy_no_piercing(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/grammar_generation.feature",
    name = "Generation is deterministic"
)]
fn deterministic_generation(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/grammar_generation.feature",
    name = "Generation rejects an unusable registry"
)]
fn unusable_registry_rejected(world: RefCell<TestWorld>) {
    drop(world);
}
