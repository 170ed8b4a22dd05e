//! OpenDocument Text (`.odt`) support.
//!
//! The layers, bottom to top:
//!
//! - [`style`]: style name sanitization and one-hop style resolution
//! - [`media`]: image reference screening
//! - [`content`]: typed, classified view over `content.xml`
//! - [`ingest`]: replay of classified content into a sink
//! - [`document`]: the whole package behind one type
//!
//! # References
//!
//! - OASIS ODF 1.2 Part 1 §3 (document structure), §5.1 (paragraphs),
//!   §10.4 (frames and images), §16.2 (styles)

pub mod content;
pub mod document;
pub mod ingest;
pub mod media;
pub mod style;

pub use document::Document;
pub use ingest::{IngestOptions, OdtIngestor};
pub use media::is_safe_image_path;
pub use style::{StyleResolver, sanitize_style_name};
