//! Shared utilities for the epidemiological data crates.
//!
//! This crate provides the logging setup used by every pipeline stage and
//! the small text/number helpers used when reading raw CSV cells.

pub mod logging;
pub mod parse;

// Re-export commonly used functions at crate root for convenience
pub use parse::{is_missing, join_non_empty, parse_f64, parse_i64};
