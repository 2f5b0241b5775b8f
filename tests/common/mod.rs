//! Common test utilities for jsonfold integration tests.
//!
//! - `TestEnv`: isolated temp directory with helpers for sources and config
//! - `wait_for`: polling helper for asynchronous rebuilds

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
