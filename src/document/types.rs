//! Core types of the formatted document model.
//!
//! A [`Document`] is an ordered list of paragraphs; each [`Paragraph`] is an
//! ordered list of runs plus paragraph-level indentation; each [`Run`] is a
//! text fragment with uniform formatting. The model is deliberately small:
//! it carries exactly the attributes the RTF encoder can express and the
//! ODT ingestor can produce.

/// Character formatting attributes of a run.
///
/// Boolean attributes are tri-state: `Some(true)` means explicitly enabled,
/// `Some(false)` means explicitly disabled, and `None` means not specified
/// (the run inherits whatever the consumer's default is). Only `Some(true)`
/// causes the RTF encoder to emit a formatting directive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunProperties {
    /// Bold formatting.
    pub bold: Option<bool>,
    /// Italic formatting.
    pub italic: Option<bool>,
    /// Underline formatting.
    pub underline: Option<bool>,
    /// Foreground color as a six-digit RRGGBB hex string, without a leading
    /// `#`. Malformed values are tolerated here and dropped at encode time.
    pub color: Option<String>,
    /// Font size in half-points (so 24 means 12pt).
    pub font_size: Option<u32>,
}

impl RunProperties {
    /// Creates an empty property set (everything unspecified).
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets bold formatting.
    #[inline]
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    /// Sets italic formatting.
    #[inline]
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    /// Sets underline formatting.
    #[inline]
    pub fn with_underline(mut self, underline: bool) -> Self {
        self.underline = Some(underline);
        self
    }

    /// Sets the foreground color from an RRGGBB hex string.
    #[inline]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the font size in half-points.
    #[inline]
    pub fn with_font_size(mut self, half_points: u32) -> Self {
        self.font_size = Some(half_points);
        self
    }

    /// Returns `true` if no attribute is specified.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bold.is_none()
            && self.italic.is_none()
            && self.underline.is_none()
            && self.color.is_none()
            && self.font_size.is_none()
    }
}

/// Paragraph indentation in twips (twentieths of a point).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Indentation {
    /// Left indent in twips.
    pub left: i32,
    /// Right indent in twips.
    pub right: i32,
    /// First-line indent in twips, relative to the left indent. Negative
    /// values produce a hanging indent.
    pub first_line: i32,
}

impl Indentation {
    /// Creates a new indentation.
    #[inline]
    pub const fn new(left: i32, right: i32, first_line: i32) -> Self {
        Self {
            left,
            right,
            first_line,
        }
    }

    /// Returns `true` if every component is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.left == 0 && self.right == 0 && self.first_line == 0
    }
}

/// A contiguous fragment of text with uniform formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    /// The text content.
    pub text: String,
    /// Formatting applied to the whole fragment.
    pub properties: RunProperties,
}

impl Run {
    /// Creates an unformatted run.
    #[inline]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            properties: RunProperties::default(),
        }
    }

    /// Creates a run with the given formatting.
    #[inline]
    pub fn with_properties(text: impl Into<String>, properties: RunProperties) -> Self {
        Self {
            text: text.into(),
            properties,
        }
    }

    /// Returns the text content.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A paragraph: a sequence of runs sharing paragraph-level layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    /// Runs in document order.
    pub runs: Vec<Run>,
    /// Paragraph indentation.
    pub indentation: Indentation,
}

impl Paragraph {
    /// Creates an empty paragraph.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty paragraph with the given indentation.
    #[inline]
    pub fn with_indentation(indentation: Indentation) -> Self {
        Self {
            runs: Vec::new(),
            indentation,
        }
    }

    /// Returns the concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

/// A formatted document: paragraphs in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Paragraphs in document order.
    pub paragraphs: Vec<Paragraph>,
}

impl Document {
    /// Creates an empty document.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the plain text of the document, paragraphs joined with `\n`.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_properties_default_is_unspecified() {
        let properties = RunProperties::new();
        assert!(properties.is_empty());
        assert_eq!(properties.bold, None);
        assert_eq!(properties.underline, None);
    }

    #[test]
    fn run_properties_builders_set_explicit_values() {
        let properties = RunProperties::new()
            .with_bold(true)
            .with_italic(false)
            .with_color("FF0000")
            .with_font_size(24);
        assert_eq!(properties.bold, Some(true));
        assert_eq!(properties.italic, Some(false));
        assert_eq!(properties.color.as_deref(), Some("FF0000"));
        assert_eq!(properties.font_size, Some(24));
        assert!(!properties.is_empty());
    }

    #[test]
    fn indentation_zero_check() {
        assert!(Indentation::default().is_zero());
        assert!(!Indentation::new(720, 0, -360).is_zero());
    }

    #[test]
    fn document_text_joins_paragraphs() {
        let mut document = Document::new();
        let mut first = Paragraph::new();
        first.runs.push(Run::new("Hello, "));
        first.runs.push(Run::new("world"));
        let mut second = Paragraph::new();
        second.runs.push(Run::new("Second"));
        document.paragraphs.push(first);
        document.paragraphs.push(second);
        assert_eq!(document.text(), "Hello, world\nSecond");
    }
}
