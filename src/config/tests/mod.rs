//! Unit tests for the config context.
