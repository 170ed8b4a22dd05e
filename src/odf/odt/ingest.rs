//! ODT content ingestion.
//!
//! [`OdtIngestor`] turns the two XML parts of a package into an ordered
//! stream of [`FormattedTextSink`] instructions. The pipeline is strict
//! about inputs and lenient about content: both parts must load cleanly
//! under the hardened limits before the sink is touched, and after that
//! every paragraph child is best-effort. An element the ingestor cannot
//! honor (unknown kind, unsafe image path, oversized entry) is absorbed
//! with a log record and processing continues with the next element,
//! because a document with one bad image should still open.

use super::content::{self, ParagraphItem};
use super::media::{self, is_safe_image_path};
use super::style::{StyleResolver, sanitize_style_name};
use crate::common::Result;
use crate::document::{FormattedTextSink, ImageAnchor, ImageInsert, RunProperties};
use crate::odf::core::{ArchiveReader, XmlDocument, XmlLimits};

/// Ingestion tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    /// Limits applied to each XML part.
    pub xml: XmlLimits,
    /// Maximum decompressed size of a single image entry. Larger entries
    /// are skipped, not fatal.
    pub max_image_bytes: u64,
    /// Edge length in pixels of the placeholder box images are inserted
    /// at. Image data is not decoded, so the intrinsic size is unknown.
    pub image_placeholder_size: u32,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            xml: XmlLimits::default(),
            max_image_bytes: media::DEFAULT_MAX_IMAGE_BYTES,
            image_placeholder_size: 512,
        }
    }
}

/// Replays OpenDocument Text content into a [`FormattedTextSink`].
#[derive(Debug, Clone, Default)]
pub struct OdtIngestor {
    options: IngestOptions,
}

impl OdtIngestor {
    /// Creates an ingestor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an ingestor with the given options.
    pub fn with_options(options: IngestOptions) -> Self {
        Self { options }
    }

    /// Ingests a document given its two XML parts and its package.
    ///
    /// Both parts are parsed up front; a part that fails to load is a hard
    /// error reported before the sink sees any instruction. On success the
    /// sink receives `clear` first, then per-paragraph instructions, with
    /// a paragraph break closing every paragraph.
    pub fn ingest<A, S>(
        &self,
        content_xml: &str,
        styles_xml: &str,
        archive: &A,
        sink: &mut S,
    ) -> Result<()>
    where
        A: ArchiveReader,
        S: FormattedTextSink,
    {
        let content = XmlDocument::parse_with(content_xml, &self.options.xml)?;
        let styles = XmlDocument::parse_with(styles_xml, &self.options.xml)?;
        let resolver = StyleResolver::new(&styles);

        sink.clear();
        for paragraph in content::paragraphs(&content) {
            for item in paragraph.items() {
                match item {
                    ParagraphItem::Span { text, style_name } => {
                        self.ingest_span(text, *style_name, &resolver, sink);
                    },
                    ParagraphItem::Frame { href } => {
                        self.ingest_frame(*href, archive, sink);
                    },
                    ParagraphItem::Other { tag } => {
                        log::debug!("skipping unsupported paragraph child <{tag}>");
                    },
                }
            }
            sink.insert_paragraph_break();
        }
        Ok(())
    }

    fn ingest_span<S: FormattedTextSink>(
        &self,
        text: &str,
        style_name: Option<&str>,
        resolver: &StyleResolver<'_>,
        sink: &mut S,
    ) {
        let properties = match style_name {
            Some(raw) => {
                let name = sanitize_style_name(raw);
                if name.is_empty() {
                    log::debug!("style name {raw:?} sanitized to empty, inserting unstyled");
                    RunProperties::default()
                } else {
                    resolver.resolve(&name)
                }
            },
            None => RunProperties::default(),
        };
        sink.insert_text(text, &properties);
    }

    fn ingest_frame<A, S>(&self, href: Option<&str>, archive: &A, sink: &mut S)
    where
        A: ArchiveReader,
        S: FormattedTextSink,
    {
        let Some(raw) = href else {
            log::debug!("frame has no image reference, skipping");
            return;
        };
        let path = raw.trim_start_matches('/');
        if !is_safe_image_path(path) {
            log::warn!("rejecting unsafe image path {path:?}");
            return;
        }
        let Some(size) = archive.entry_size(path) else {
            log::debug!("image entry {path:?} not present in package, skipping");
            return;
        };
        if size > self.options.max_image_bytes {
            log::warn!(
                "image entry {path:?} is {size} bytes, over the {} byte cap, skipping",
                self.options.max_image_bytes
            );
            return;
        }
        let data = match archive.entry_bytes(path) {
            Ok(data) => data,
            Err(err) => {
                log::warn!("failed to read image entry {path:?}: {err}");
                return;
            },
        };
        let edge = self.options.image_placeholder_size;
        sink.insert_image(ImageInsert {
            width: edge,
            height: edge,
            anchor: ImageAnchor::Baseline,
            data: &data,
        });
    }
}
