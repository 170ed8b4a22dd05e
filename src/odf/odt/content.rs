//! Typed view over `content.xml`.
//!
//! Ingestion never walks raw XML: paragraphs are located once and each
//! paragraph child is classified once into the closed set of node kinds
//! the ingestor understands. Dispatch downstream is a match over
//! [`ParagraphItem`], so adding a kind means the compiler points at every
//! site that must handle it.

use crate::odf::core::{XmlDocument, XmlElement};
use crate::odf::namespace::{DRAWNS, TEXTNS, XLINKNS};

/// A classified direct child of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParagraphItem<'a> {
    /// A `text:span`: the recursive text plus the raw style reference.
    Span {
        /// Recursive text content of the span.
        text: String,
        /// `text:style-name` exactly as written, unsanitized.
        style_name: Option<&'a str>,
    },
    /// A `draw:frame`: the `xlink:href` of its first `draw:image`, if any.
    Frame {
        /// Raw image reference, unvalidated.
        href: Option<&'a str>,
    },
    /// Any other element. Carries the tag name for diagnostics.
    Other {
        /// Qualified tag name as written in the source.
        tag: &'a str,
    },
}

/// A paragraph of the content tree with its children classified.
pub struct ParagraphNode<'a> {
    element: &'a XmlElement,
    items: Vec<ParagraphItem<'a>>,
}

impl<'a> ParagraphNode<'a> {
    fn classify(element: &'a XmlElement) -> Self {
        let mut items = Vec::new();
        // Text directly under text:p, outside any span, is not an item:
        // only elements are classified.
        for child in element.child_elements() {
            if child.is(TEXTNS, "span") {
                items.push(ParagraphItem::Span {
                    text: child.text(),
                    style_name: child.attribute(TEXTNS, "style-name"),
                });
            } else if child.is(DRAWNS, "frame") {
                let href = child
                    .find_descendant(DRAWNS, "image")
                    .and_then(|image| image.attribute(XLINKNS, "href"));
                items.push(ParagraphItem::Frame { href });
            } else {
                items.push(ParagraphItem::Other {
                    tag: child.qualified_name(),
                });
            }
        }
        Self { element, items }
    }

    /// Returns the classified children in document order.
    #[inline]
    pub fn items(&self) -> &[ParagraphItem<'a>] {
        &self.items
    }

    /// Returns the recursive text of the whole paragraph.
    pub fn text(&self) -> String {
        self.element.text()
    }
}

/// Collects every `text:p` of a loaded content tree, in document order,
/// with children classified.
pub fn paragraphs(content: &XmlDocument) -> Vec<ParagraphNode<'_>> {
    content
        .root()
        .descendants(TEXTNS, "p")
        .into_iter()
        .map(ParagraphNode::classify)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" xmlns:draw="urn:oasis:names:tc:opendocument:xmlns:drawing:1.0" xmlns:xlink="http://www.w3.org/1999/xlink">
  <office:body>
    <office:text>
      <text:p>leading text<text:span text:style-name="Emphasis">styled</text:span><text:span>plain</text:span></text:p>
      <text:p><draw:frame><draw:image xlink:href="Pictures/img.png"/></draw:frame><text:line-break/></text:p>
      <text:p><draw:frame><draw:text-box/></draw:frame></text:p>
    </office:text>
  </office:body>
</office:document-content>"#;

    #[test]
    fn classifies_spans_with_raw_style_names() {
        let content = XmlDocument::parse(CONTENT).unwrap();
        let paragraphs = paragraphs(&content);
        assert_eq!(paragraphs.len(), 3);

        let items = paragraphs[0].items();
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0],
            ParagraphItem::Span {
                text: "styled".to_string(),
                style_name: Some("Emphasis"),
            }
        );
        assert_eq!(
            items[1],
            ParagraphItem::Span {
                text: "plain".to_string(),
                style_name: None,
            }
        );
    }

    #[test]
    fn classifies_frames_and_unknown_children() {
        let content = XmlDocument::parse(CONTENT).unwrap();
        let paragraphs = paragraphs(&content);

        let items = paragraphs[1].items();
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0],
            ParagraphItem::Frame {
                href: Some("Pictures/img.png"),
            }
        );
        assert_eq!(
            items[1],
            ParagraphItem::Other {
                tag: "text:line-break",
            }
        );
    }

    #[test]
    fn frame_without_image_has_no_href() {
        let content = XmlDocument::parse(CONTENT).unwrap();
        let paragraphs = paragraphs(&content);
        assert_eq!(paragraphs[2].items(), &[ParagraphItem::Frame { href: None }]);
    }

    #[test]
    fn direct_text_is_not_an_item_but_counts_in_paragraph_text() {
        let content = XmlDocument::parse(CONTENT).unwrap();
        let paragraphs = paragraphs(&content);
        assert!(paragraphs[0]
            .items()
            .iter()
            .all(|item| matches!(item, ParagraphItem::Span { .. })));
        assert_eq!(paragraphs[0].text(), "leading textstyledplain");
    }

    #[test]
    fn nested_paragraphs_are_collected_in_document_order() {
        let xml = r#"<office:text><text:p>1</text:p><table:table><table:table-cell><text:p>2</text:p></table:table-cell></table:table></office:text>"#;
        let content = XmlDocument::parse(xml).unwrap();
        let texts: Vec<String> = paragraphs(&content).iter().map(ParagraphNode::text).collect();
        assert_eq!(texts, vec!["1", "2"]);
    }
}
