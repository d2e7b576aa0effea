//! Shared test utilities for jobportal integration tests.
//!
//! This module provides:
//! - `TestHarness` with an in-memory database, a fixed clock and seeded parties
//! - Builders for scheduling requests

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
