//! Unit tests for the bridge context.

mod support;

mod cancel_tests;
mod trigger_tests;
