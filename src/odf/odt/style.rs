//! Style name handling and one-hop style resolution.
//!
//! Style names come straight out of attacker-controlled XML and are used
//! as lookup keys, so they pass through [`sanitize_style_name`] before any
//! query. Resolution itself is deliberately shallow: a style contributes
//! only what its own `style:text-properties` says, with no parent-style
//! chain walking, so a malicious style graph cannot send the resolver on
//! a cyclic or deeply recursive traversal.

use crate::document::RunProperties;
use crate::odf::core::{XmlDocument, XmlElement};
use crate::odf::namespace::{FONS, STYLENS};

/// Strips every character outside `[A-Za-z0-9_.-]` from a style name.
///
/// The surviving alphabet is inert in every context the name is used in
/// downstream, so a hostile name degrades to a harmless (usually
/// unresolvable) key instead of becoming an injection vector. The function
/// is idempotent.
///
/// # Examples
///
/// ```rust
/// use longan::odf::sanitize_style_name;
///
/// assert_eq!(sanitize_style_name("Heading_20_1"), "Heading_20_1");
/// assert_eq!(sanitize_style_name("T1'][2"), "T12");
/// assert_eq!(sanitize_style_name("<>&\""), "");
/// ```
pub fn sanitize_style_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect()
}

/// Resolves sanitized style names against a loaded `styles.xml` tree.
pub struct StyleResolver<'a> {
    styles: &'a XmlDocument,
}

impl<'a> StyleResolver<'a> {
    /// Creates a resolver over a loaded styles tree.
    pub fn new(styles: &'a XmlDocument) -> Self {
        Self { styles }
    }

    /// Resolves a sanitized style name to character formatting.
    ///
    /// Returns the attributes the style explicitly sets; everything else
    /// stays `None` so unset attributes inherit downstream. Unknown names,
    /// names sanitized to empty, and styles without text properties all
    /// resolve to "no formatting change".
    pub fn resolve(&self, sanitized_name: &str) -> RunProperties {
        let mut properties = RunProperties::default();
        if sanitized_name.is_empty() {
            return properties;
        }
        let Some(style) = self.find_style(sanitized_name) else {
            log::debug!("style {sanitized_name:?} not defined in styles tree");
            return properties;
        };
        let Some(text_properties) = style.find_descendant(STYLENS, "text-properties") else {
            return properties;
        };
        if text_properties.attribute(FONS, "font-weight") == Some("bold") {
            properties.bold = Some(true);
        }
        if text_properties.attribute(FONS, "font-style") == Some("italic") {
            properties.italic = Some(true);
        }
        if text_properties.attribute(STYLENS, "text-underline-style") == Some("solid") {
            properties.underline = Some(true);
        }
        properties
    }

    fn find_style(&self, name: &str) -> Option<&'a XmlElement> {
        self.styles
            .root()
            .descendants(STYLENS, "style")
            .into_iter()
            .find(|style| style.attribute(STYLENS, "name") == Some(name))
    }
}
