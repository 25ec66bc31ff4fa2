//! Test helpers shared across crates in the workspace.
//!
//! The [`env`] module provides RAII guards for mutating process environment
//! variables without leaking state between tests.

pub mod env;
