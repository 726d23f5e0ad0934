//! Common test utilities for Sitefront CLI and scenario tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated site directory plus helpers to run the CLI
//! - Assertion macros: `assert_output_contains!`
//! - Fixtures: Reusable site content and configuration

#![allow(dead_code)]

pub mod assertions;
pub mod env;
pub mod fixtures;

pub use assertions::*;
pub use env::*;
pub use fixtures::*;
