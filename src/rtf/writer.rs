//! RTF document serialization.
//!
//! The encoder makes two passes over the document: the first collects the
//! color table (see [`ColorTable`]), the second emits the byte stream. The
//! output is plain ASCII; characters outside the ASCII range are written as
//! `\uN?` escapes.

use super::types::ColorTable;
use crate::document::{Document, Indentation, Paragraph, Run};
use std::io::{self, Write};

/// Serialization options.
#[derive(Debug, Clone, Copy)]
pub struct WriterOptions {
    /// Code page declared in the header (`\ansicpgN`). `None` omits the
    /// declaration and leaves interpretation to the consumer default.
    pub code_page: Option<u16>,
    /// Index of the default font (`\deffN`).
    pub default_font: u16,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            code_page: None,
            default_font: 0,
        }
    }
}

/// Streaming RTF writer over any [`Write`] destination.
///
/// # Examples
///
/// ```rust
/// use longan::rtf::RtfWriter;
/// use longan::{Document, Paragraph, Run};
///
/// let mut document = Document::new();
/// let mut paragraph = Paragraph::new();
/// paragraph.runs.push(Run::new("plain text"));
/// document.paragraphs.push(paragraph);
///
/// let mut output = Vec::new();
/// let mut writer = RtfWriter::new(&mut output);
/// writer.write_document(&document).unwrap();
/// assert!(output.starts_with(b"{\\rtf1"));
/// ```
pub struct RtfWriter<W: Write> {
    writer: W,
    options: WriterOptions,
}

impl<W: Write> RtfWriter<W> {
    /// Creates a writer with default options.
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, WriterOptions::default())
    }

    /// Creates a writer with the given options.
    pub fn with_options(writer: W, options: WriterOptions) -> Self {
        Self { writer, options }
    }

    /// Serializes a complete document.
    ///
    /// Every group opened here is closed here: the output always contains
    /// balanced braces regardless of document content, because text is
    /// escaped before it reaches the stream.
    pub fn write_document(&mut self, document: &Document) -> io::Result<()> {
        let colors = ColorTable::from_document(document);
        self.write_header()?;
        self.write_color_table(&colors)?;
        for paragraph in &document.paragraphs {
            self.write_paragraph(paragraph, &colors)?;
        }
        self.write_str("}\n")
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn write_header(&mut self) -> io::Result<()> {
        self.write_str("{")?;
        self.write_control_word("rtf", Some(1))?;
        self.write_control_word("ansi", None)?;
        if let Some(code_page) = self.options.code_page {
            self.write_control_word("ansicpg", Some(i32::from(code_page)))?;
        }
        self.write_control_word("deff", Some(i32::from(self.options.default_font)))?;
        self.write_str("\n")
    }

    fn write_color_table(&mut self, colors: &ColorTable) -> io::Result<()> {
        self.write_str("{")?;
        self.write_control_word("colortbl", None)?;
        // The bare semicolon is entry 0, the consumer's default color.
        self.write_str(" ;\n")?;
        for color in colors.colors() {
            self.write_control_word("red", Some(i32::from(color.red)))?;
            self.write_control_word("green", Some(i32::from(color.green)))?;
            self.write_control_word("blue", Some(i32::from(color.blue)))?;
            self.write_str(";\n")?;
        }
        self.write_str("}\n")
    }

    fn write_paragraph(&mut self, paragraph: &Paragraph, colors: &ColorTable) -> io::Result<()> {
        self.write_str("{")?;
        self.write_control_word("pard", None)?;
        self.write_indentation(&paragraph.indentation)?;
        self.write_str("\n")?;
        for run in &paragraph.runs {
            self.write_run(run, colors)?;
        }
        self.write_str("}\n")
    }

    fn write_indentation(&mut self, indentation: &Indentation) -> io::Result<()> {
        if indentation.left != 0 {
            self.write_control_word("li", Some(indentation.left))?;
        }
        if indentation.right != 0 {
            self.write_control_word("ri", Some(indentation.right))?;
        }
        if indentation.first_line != 0 {
            self.write_control_word("fi", Some(indentation.first_line))?;
        }
        Ok(())
    }

    fn write_run(&mut self, run: &Run, colors: &ColorTable) -> io::Result<()> {
        let bold = run.properties.bold == Some(true);
        let italic = run.properties.italic == Some(true);
        if bold {
            self.write_control_word("b", None)?;
            self.write_str(" ")?;
        }
        if italic {
            self.write_control_word("i", None)?;
            self.write_str(" ")?;
        }
        if let Some(color) = &run.properties.color
            && let Some(index) = colors.lookup(color)
        {
            self.write_control_word("cf", Some(i32::from(index)))?;
            self.write_str(" ")?;
        }
        if let Some(size) = run.properties.font_size {
            self.write_control_word("fs", Some(size as i32))?;
            self.write_str(" ")?;
        }
        self.write_text(&run.text)?;
        if bold || italic {
            self.write_str("\\b0\\i0 ")?;
        }
        Ok(())
    }

    /// Writes a control word with an optional numeric parameter.
    fn write_control_word(&mut self, word: &str, param: Option<i32>) -> io::Result<()> {
        self.write_str("\\")?;
        self.write_str(word)?;
        if let Some(p) = param {
            write!(self.writer, "{}", p)?;
        }
        Ok(())
    }

    /// Writes text content, escaping RTF special characters.
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        for c in text.chars() {
            match c {
                '\\' => self.write_str("\\\\")?,
                '{' => self.write_str("\\{")?,
                '}' => self.write_str("\\}")?,
                '\n' => self.write_str("\\par ")?,
                '\t' => self.write_str("\\tab ")?,
                c if c.is_ascii() => write!(self.writer, "{}", c)?,
                c => {
                    // Unicode escape; parameters are signed 16-bit, so code
                    // units above 0x7FFF wrap negative. Characters outside
                    // the BMP become a surrogate pair of escapes.
                    let mut units = [0u16; 2];
                    for &unit in c.encode_utf16(&mut units).iter() {
                        self.write_control_word("u", Some(i32::from(unit as i16)))?;
                        self.write_str("?")?;
                    }
                },
            }
        }
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.writer.write_all(s.as_bytes())
    }
}

/// Encodes a document to an RTF string.
///
/// This is the one-call form of [`RtfWriter`] for callers that want the
/// whole output in memory. Encoding is deterministic: the same document
/// always produces byte-identical output.
///
/// # Examples
///
/// ```rust
/// use longan::{Document, Paragraph, Run, RunProperties};
///
/// let mut document = Document::new();
/// let mut paragraph = Paragraph::new();
/// paragraph.runs.push(Run::with_properties(
///     "warning",
///     RunProperties::new().with_bold(true).with_color("FF0000"),
/// ));
/// document.paragraphs.push(paragraph);
///
/// let rtf = longan::rtf::encode(&document);
/// assert!(rtf.contains("\\red255\\green0\\blue0;"));
/// assert!(rtf.contains("\\cf1 "));
/// ```
pub fn encode(document: &Document) -> String {
    let mut output = Vec::new();
    let mut writer = RtfWriter::new(&mut output);
    writer
        .write_document(document)
        .expect("writing to an in-memory buffer cannot fail");
    String::from_utf8(output).expect("RTF output is always ASCII")
}
