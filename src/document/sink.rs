//! The sink interface between the ODT ingestor and an editing surface.

use super::types::RunProperties;

/// How an inserted image is anchored relative to the surrounding text line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageAnchor {
    /// The image bottom sits on the text baseline.
    #[default]
    Baseline,
}

/// An image insertion instruction.
///
/// The dimensions are display dimensions in pixels, not the intrinsic size
/// of the encoded image. The ingestor does not decode image data; it hands
/// the raw bytes through together with a fixed placeholder size.
#[derive(Debug, Clone, Copy)]
pub struct ImageInsert<'a> {
    /// Display width in pixels.
    pub width: u32,
    /// Display height in pixels.
    pub height: u32,
    /// Anchoring relative to the text line.
    pub anchor: ImageAnchor,
    /// Raw encoded image bytes as stored in the package.
    pub data: &'a [u8],
}

/// Receiver for the ordered instruction stream produced by ODT ingestion.
///
/// Implementations are typically adapters over a rich-text editing control,
/// but anything that can replay the stream works: test recorders, document
/// model builders, or plain-text collectors.
///
/// All methods are infallible. A sink that cannot honor an instruction
/// (an unsupported image format, say) absorbs it; ingestion never unwinds
/// through the sink.
pub trait FormattedTextSink {
    /// Discards any existing content. Always the first instruction of an
    /// ingestion run.
    fn clear(&mut self);

    /// Inserts text at the cursor with the given formatting.
    fn insert_text(&mut self, text: &str, properties: &RunProperties);

    /// Inserts an image at the cursor.
    fn insert_image(&mut self, image: ImageInsert<'_>);

    /// Ends the current paragraph and starts a new one.
    fn insert_paragraph_break(&mut self);
}
