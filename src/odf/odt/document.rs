//! High-level OpenDocument Text document interface.

use super::content;
use super::ingest::{IngestOptions, OdtIngestor};
use crate::common::{Error, Result};
use crate::document::FormattedTextSink;
use crate::odf::core::{OdtPackage, XmlDocument};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Styles tree used when a package carries no `styles.xml`. Parses to an
/// empty tree, so every style lookup resolves to "no formatting change".
const EMPTY_STYLES: &str = "<office:document-styles/>";

/// An opened OpenDocument Text document.
///
/// Opening verifies the package up front: the container must be a valid
/// ZIP archive whose mimetype declares an OpenDocument Text document, and
/// `content.xml` must be present and valid UTF-8. `styles.xml` is optional;
/// some degenerate producers omit it, and it degrades to an empty styles
/// tree. XML is not parsed until an operation needs it.
///
/// # Examples
///
/// ```rust,no_run
/// use longan::odf::Document;
///
/// fn main() -> longan::Result<()> {
///     let document = Document::open("letter.odt")?;
///     println!("{}", document.plain_text()?);
///     Ok(())
/// }
/// ```
pub struct Document<R> {
    package: OdtPackage<R>,
    content_xml: String,
    styles_xml: Option<String>,
}

impl Document<Cursor<Vec<u8>>> {
    /// Opens a document from a file path.
    ///
    /// The file is read fully into memory; ODT files are ZIP containers
    /// and need random access.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(bytes)
    }

    /// Opens a document from bytes already in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }
}

impl<R: Read + Seek> Document<R> {
    /// Opens a document from any seekable reader.
    pub fn from_reader(reader: R) -> Result<Self> {
        let package = OdtPackage::from_reader(reader)?;
        if !package.mimetype().contains("opendocument.text") {
            return Err(Error::UnsupportedFormat(format!(
                "not an OpenDocument Text document: mimetype is \"{}\"",
                package.mimetype()
            )));
        }
        let content_xml = read_xml_part(&package, "content.xml")?;
        let styles_xml = if package.has_file("styles.xml") {
            Some(read_xml_part(&package, "styles.xml")?)
        } else {
            None
        };
        Ok(Self {
            package,
            content_xml,
            styles_xml,
        })
    }

    /// Returns the package MIME type.
    #[inline]
    pub fn mimetype(&self) -> &str {
        self.package.mimetype()
    }

    /// Returns the raw text of `content.xml`.
    #[inline]
    pub fn content_xml(&self) -> &str {
        &self.content_xml
    }

    /// Returns the raw text of `styles.xml`, if the package has one.
    #[inline]
    pub fn styles_xml(&self) -> Option<&str> {
        self.styles_xml.as_deref()
    }

    /// Replays the document into a sink under default options.
    pub fn ingest_into<S: FormattedTextSink>(&self, sink: &mut S) -> Result<()> {
        self.ingest_into_with(sink, IngestOptions::default())
    }

    /// Replays the document into a sink under the given options.
    pub fn ingest_into_with<S: FormattedTextSink>(
        &self,
        sink: &mut S,
        options: IngestOptions,
    ) -> Result<()> {
        let ingestor = OdtIngestor::with_options(options);
        let styles_xml = self.styles_xml.as_deref().unwrap_or(EMPTY_STYLES);
        ingestor.ingest(&self.content_xml, styles_xml, &self.package, sink)
    }

    /// Extracts the plain text: the recursive text of every paragraph in
    /// document order, joined with `\n`.
    ///
    /// Note: this parses `content.xml` on each call.
    pub fn plain_text(&self) -> Result<String> {
        let content = XmlDocument::parse(&self.content_xml)?;
        Ok(content::paragraphs(&content)
            .iter()
            .map(|paragraph| paragraph.text())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

fn read_xml_part<R: Read + Seek>(package: &OdtPackage<R>, path: &str) -> Result<String> {
    String::from_utf8(package.file(path)?)
        .map_err(|_| Error::MalformedInput(format!("{path} is not valid UTF-8")))
}
