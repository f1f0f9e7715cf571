//! Common utilities for the kiln converter.
//!
//! This crate provides shared infrastructure used by every conversion stage:
//! - **Warning System** - deduplicated, colored diagnostics on stderr
//! - **Id Generation** - run-scoped element and class identifiers

pub mod ids;
pub mod warning;

pub use ids::IdGenerator;
