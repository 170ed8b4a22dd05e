//! OpenDocument format support.
//!
//! Only the text document flavor (`.odt`) is implemented. The split
//! follows the format itself: [`core`] knows about packages and XML,
//! [`odt`] knows what a text document means, [`namespace`] carries the
//! vocabulary both sides share.

pub mod core;
pub mod namespace;
pub mod odt;

pub use self::core::{ArchiveReader, OdtPackage, XmlDocument, XmlElement, XmlLimits};
pub use odt::{
    Document, IngestOptions, OdtIngestor, StyleResolver, is_safe_image_path, sanitize_style_name,
};
