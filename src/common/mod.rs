//! Common utilities and types shared across the crate.

pub mod error;

pub use error::{Error, Result};
