//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert errors raised
//! by third-party parsers into the unified [`Error`] type.

use super::types::Error;

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::MalformedInput(format!("XML error: {err}"))
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            other => Error::MalformedInput(format!("ZIP error: {other}")),
        }
    }
}
