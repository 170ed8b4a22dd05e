//! Unified error handling for all conversion operations.
//!
//! Every fallible path in the crate reports through the [`Error`] enum so
//! callers can match on a single, stable taxonomy regardless of which
//! format layer produced the failure.

pub mod conversions;
pub mod types;

pub use types::{Error, Result};
