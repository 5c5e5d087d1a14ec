//! Unit tests for the mapping context.
