//! Common test utilities for API integration tests
//!
//! This module provides shared test infrastructure for integration tests,
//! including a seeded in-memory store and helpers to run GraphQL requests.

#![allow(unused_imports, dead_code)]

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
