//! Core error type definitions.

use thiserror::Error;

/// Main error type for document conversion operations.
///
/// The variants form a deliberate taxonomy: [`Error::MalformedInput`] means
/// the input itself is unusable, [`Error::ResourceLimitExceeded`] means the
/// input tripped a safety cap and processing was refused, and
/// [`Error::UnsupportedFormat`] means the input is well-formed but not
/// something this crate handles.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input that cannot be parsed: invalid XML, a forbidden DOCTYPE
    /// declaration, an undefined entity reference, or a broken archive.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A configured safety cap was exceeded (document size, entity
    /// expansion, nesting depth).
    #[error("Resource limit exceeded: {0}")]
    ResourceLimitExceeded(String),

    /// The package is not an OpenDocument Text document, or a required
    /// package part is absent.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;
