//! Core OpenDocument infrastructure: package access and hardened XML
//! loading. Format-specific logic builds on top of these.

mod package;
mod xml;

pub use package::{ArchiveReader, OdtPackage};
pub use xml::{XmlAttribute, XmlDocument, XmlElement, XmlLimits, XmlNode};
