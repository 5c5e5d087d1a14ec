//! Unit tests for the remote client stack.
