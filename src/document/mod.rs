//! The formatted document model.
//!
//! This is the hinge of the crate: the RTF encoder consumes a [`Document`]
//! built from these types, and the ODT ingestor produces the same
//! vocabulary as a stream of [`FormattedTextSink`] instructions.

mod sink;
mod types;

pub use sink::{FormattedTextSink, ImageAnchor, ImageInsert};
pub use types::{Document, Indentation, Paragraph, Run, RunProperties};
