//! # Longan
//!
//! Document conversion engine for rich-text editing surfaces.
//!
//! Longan does two things:
//!
//! - **RTF encoding**: serializes an in-memory formatted document model
//!   (paragraphs of styled runs) into a Rich Text Format byte stream that
//!   round-trips through common RTF consumers.
//! - **OpenDocument Text ingestion**: opens untrusted `.odt` packages under
//!   hardened XML limits and replays their content as an ordered stream of
//!   editing instructions into a caller-provided [`FormattedTextSink`].
//!
//! # Examples
//!
//! Encoding a document to RTF:
//!
//! ```rust
//! use longan::{Document, Paragraph, Run, RunProperties};
//!
//! let mut document = Document::new();
//! let mut paragraph = Paragraph::new();
//! paragraph.runs.push(Run::with_properties(
//!     "Hello",
//!     RunProperties::new().with_bold(true).with_color("FF0000"),
//! ));
//! document.paragraphs.push(paragraph);
//!
//! let rtf = longan::rtf::encode(&document);
//! assert!(rtf.starts_with("{\\rtf1\\ansi\\deff0"));
//! ```
//!
//! Reading an OpenDocument Text file:
//!
//! ```rust,no_run
//! use longan::odf::Document;
//!
//! fn main() -> longan::Result<()> {
//!     let document = Document::open("letter.odt")?;
//!     println!("{}", document.plain_text()?);
//!     Ok(())
//! }
//! ```
//!
//! # Security
//!
//! The ODT path treats every package as hostile. XML parts are loaded with
//! DOCTYPE declarations forbidden, entity expansion and nesting depth capped,
//! and an overall document size limit. Image references are screened against
//! path traversal before any archive entry is touched, and oversized entries
//! are skipped rather than decompressed. See [`odf::core::XmlLimits`] and
//! [`odf::IngestOptions`] for the knobs.

/// Common utilities and error types shared across the crate.
pub mod common;

/// The formatted document model consumed by the RTF encoder and produced,
/// instruction by instruction, by the ODT ingestor.
pub mod document;

/// OpenDocument format support (`.odt` packages).
pub mod odf;

/// Rich Text Format serialization.
pub mod rtf;

pub use common::{Error, Result};
pub use document::{
    Document, FormattedTextSink, ImageAnchor, ImageInsert, Indentation, Paragraph, Run,
    RunProperties,
};
pub use rtf::encode;
