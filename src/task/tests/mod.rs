//! Unit tests for the task board.

mod support;
