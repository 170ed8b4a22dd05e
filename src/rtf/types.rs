//! RTF data types.

use crate::document::Document;
use std::collections::HashMap;

/// Index of a color in the color table.
///
/// Index 0 is reserved for the consumer's default ("auto") color, so table
/// entries are numbered from 1.
pub type ColorRef = u16;

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    /// Red component (0-255)
    pub red: u8,
    /// Green component (0-255)
    pub green: u8,
    /// Blue component (0-255)
    pub blue: u8,
}

impl Color {
    /// Creates a new color.
    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses a six-digit RRGGBB hex string, case-insensitively.
    ///
    /// Returns `None` for anything that is not exactly six hex digits.
    /// A leading `#` is not accepted.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let bytes = hex.as_bytes();
        if bytes.len() != 6 || !bytes.iter().all(u8::is_ascii_hexdigit) {
            return None;
        }
        let red = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let green = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let blue = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::new(red, green, blue))
    }
}

/// The document color table, built ahead of serialization.
///
/// RTF requires every color a document uses to be declared up front in a
/// header table and then referenced by index. [`ColorTable::from_document`]
/// is the first pass of the encoder: it scans every run once and assigns
/// dense indices in first-encounter order. Colors that fail to parse are
/// excluded entirely, so every table entry is a well-formed RGB triple and
/// every index the second pass emits is in range.
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    colors: Vec<Color>,
    index_by_hex: HashMap<String, ColorRef>,
}

impl ColorTable {
    /// Creates an empty color table.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the distinct, well-formed run colors of a document in
    /// first-encounter order.
    pub fn from_document(document: &Document) -> Self {
        let mut table = Self::new();
        for paragraph in &document.paragraphs {
            for run in &paragraph.runs {
                if let Some(color) = &run.properties.color {
                    table.add(color);
                }
            }
        }
        table
    }

    fn add(&mut self, hex: &str) {
        let key = hex.to_ascii_uppercase();
        if self.index_by_hex.contains_key(&key) {
            return;
        }
        // A full table stops accepting entries; later colors would wrap
        // the index otherwise. Runs referencing them emit no color.
        if self.colors.len() >= usize::from(ColorRef::MAX) {
            return;
        }
        let Some(color) = Color::from_hex(&key) else {
            return;
        };
        self.colors.push(color);
        // 1-based: index 0 stays reserved for the default color.
        self.index_by_hex.insert(key, self.colors.len() as ColorRef);
    }

    /// Looks up the table index of a hex color, case-insensitively.
    ///
    /// Returns `None` for colors that were malformed or never encountered
    /// during the collection pass.
    pub fn lookup(&self, hex: &str) -> Option<ColorRef> {
        self.index_by_hex.get(&hex.to_ascii_uppercase()).copied()
    }

    /// Returns the table entries in index order (entry 0 of the slice has
    /// table index 1).
    #[inline]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns `true` if the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
