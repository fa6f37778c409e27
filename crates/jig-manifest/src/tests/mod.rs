//! Unit tests for manifest handling.

mod reconcile_tests;
