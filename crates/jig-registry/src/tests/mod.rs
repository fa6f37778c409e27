//! Unit tests for `jig_registry` types.

mod descriptor_tests;
