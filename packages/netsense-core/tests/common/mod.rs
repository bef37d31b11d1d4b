//! Common test utilities for netsense-core
//!
//! This module provides shared fixtures, assertions, and builders
//! for integration and end-to-end tests.

#![allow(dead_code)]

pub mod assertions;
pub mod builders;
pub mod fixtures;

// Re-export all utilities
pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
