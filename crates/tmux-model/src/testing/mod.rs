//! Testing utilities for code built on the object model.
//!
//! Provides an in-memory tmux server so sessions, windows and panes can be
//! exercised without a tmux binary.

pub mod fake;

pub use fake::FakeTmux;
