//! Unit tests for access control.
