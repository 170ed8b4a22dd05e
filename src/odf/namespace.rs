//! OpenDocument XML namespace URIs and prefix bindings.
//!
//! The constants follow the prefixes used throughout the ODF specification.
//! [`well_known_prefix_uri`] backs the loader's fallback resolution for
//! documents that use the conventional prefixes without declaring them.

use phf::{Map, phf_map};

/// Office namespace (document structure)
pub const OFFICENS: &str = "urn:oasis:names:tc:opendocument:xmlns:office:1.0";

/// Text namespace (text content)
pub const TEXTNS: &str = "urn:oasis:names:tc:opendocument:xmlns:text:1.0";

/// Style namespace (style definitions)
pub const STYLENS: &str = "urn:oasis:names:tc:opendocument:xmlns:style:1.0";

/// FO namespace (XSL-FO compatible formatting properties)
pub const FONS: &str = "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0";

/// Drawing namespace (frames, images, shapes)
pub const DRAWNS: &str = "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0";

/// Table namespace (tables)
pub const TABLENS: &str = "urn:oasis:names:tc:opendocument:xmlns:table:1.0";

/// SVG-compatible namespace (sizes and positions)
pub const SVGNS: &str = "urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0";

/// Meta namespace (document metadata)
pub const METANS: &str = "urn:oasis:names:tc:opendocument:xmlns:meta:1.0";

/// Dublin Core namespace
pub const DCNS: &str = "http://purl.org/dc/elements/1.1/";

/// XLink namespace (hyperlinks and resource references)
pub const XLINKNS: &str = "http://www.w3.org/1999/xlink";

/// The implicitly bound `xml:` namespace
pub const XMLNS: &str = "http://www.w3.org/XML/1998/namespace";

/// Conventional ODF prefix bindings, used when a document omits the
/// corresponding `xmlns` declarations.
static WELL_KNOWN_PREFIXES: Map<&'static str, &'static str> = phf_map! {
    "office" => "urn:oasis:names:tc:opendocument:xmlns:office:1.0",
    "text" => "urn:oasis:names:tc:opendocument:xmlns:text:1.0",
    "style" => "urn:oasis:names:tc:opendocument:xmlns:style:1.0",
    "fo" => "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0",
    "draw" => "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0",
    "table" => "urn:oasis:names:tc:opendocument:xmlns:table:1.0",
    "svg" => "urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0",
    "meta" => "urn:oasis:names:tc:opendocument:xmlns:meta:1.0",
    "dc" => "http://purl.org/dc/elements/1.1/",
    "xlink" => "http://www.w3.org/1999/xlink",
    "xml" => "http://www.w3.org/XML/1998/namespace",
};

/// Resolves a conventional ODF prefix to its namespace URI.
#[inline]
pub fn well_known_prefix_uri(prefix: &str) -> Option<&'static str> {
    WELL_KNOWN_PREFIXES.get(prefix).copied()
}
