//! Rich Text Format (RTF) serialization.
//!
//! This module encodes the formatted document model into RTF 1.x byte
//! streams. Serialization is two-pass: color collection first, emission
//! second, so the header color table is complete before any run
//! references it.
//!
//! # Examples
//!
//! ```rust
//! use longan::{Document, Paragraph, Run, RunProperties};
//!
//! let mut document = Document::new();
//! let mut paragraph = Paragraph::new();
//! paragraph.runs.push(Run::with_properties(
//!     "Hello",
//!     RunProperties::new().with_italic(true),
//! ));
//! document.paragraphs.push(paragraph);
//!
//! let rtf = longan::rtf::encode(&document);
//! assert!(rtf.contains("\\i Hello"));
//! ```

mod types;
mod writer;

pub use types::{Color, ColorRef, ColorTable};
pub use writer::{RtfWriter, WriterOptions, encode};
