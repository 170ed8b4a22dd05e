//! Hardened XML loading for untrusted OpenDocument parts.
//!
//! Package parts are attacker-controlled, so the loader refuses anything
//! that could be used for entity or memory attacks before building the
//! tree:
//!
//! - DOCTYPE declarations are rejected outright, which removes external
//!   entity resolution and DTD-defined entity bombs as a class.
//! - Only the five predefined XML entities and numeric character
//!   references resolve; any other entity reference is an error.
//! - Cumulative entity expansion, element nesting depth, and overall
//!   document size are capped by [`XmlLimits`].
//!
//! The result is an owned, namespace-resolved tree. Prefixes are resolved
//! against in-scope `xmlns` declarations first and the conventional ODF
//! bindings in [`crate::odf::namespace`] second, so well-formed documents
//! from sloppy producers that omit declarations still query correctly.

use crate::common::{Error, Result};
use crate::odf::namespace;
use memchr::memchr_iter;
use quick_xml::Reader;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// Safety caps applied while loading a single XML part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlLimits {
    /// Maximum size of the XML text in bytes.
    pub max_document_bytes: usize,
    /// Maximum cumulative number of characters produced by resolving
    /// entity and character references.
    pub max_entity_expansion_chars: usize,
    /// Maximum element nesting depth.
    pub max_depth: usize,
}

impl Default for XmlLimits {
    fn default() -> Self {
        Self {
            max_document_bytes: 10 * 1024 * 1024, // 10 MiB
            max_entity_expansion_chars: 1024,
            max_depth: 256,
        }
    }
}

/// A namespace-resolved attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    /// Resolved namespace URI. Unprefixed attributes have no namespace.
    pub namespace: Option<String>,
    /// Local name without prefix.
    pub local_name: String,
    /// Attribute value with references resolved.
    pub value: String,
}

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// A child element.
    Element(XmlElement),
    /// Character data. Adjacent text is merged into a single node.
    Text(String),
}

/// An element of the loaded tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    qualified_name: String,
    namespace: Option<String>,
    local_name: String,
    attributes: Vec<XmlAttribute>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    fn new(
        qualified_name: String,
        namespace: Option<String>,
        local_name: String,
        attributes: Vec<XmlAttribute>,
    ) -> Self {
        Self {
            qualified_name,
            namespace,
            local_name,
            attributes,
            children: Vec::new(),
        }
    }

    /// Returns the name as written in the source, prefix included.
    #[inline]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Returns the resolved namespace URI, if any.
    #[inline]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns the local name without prefix.
    #[inline]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Returns `true` if the element has the given namespace and local name.
    #[inline]
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.local_name == local_name && self.namespace.as_deref() == Some(namespace)
    }

    /// Looks up an attribute value by namespace and local name.
    ///
    /// Falls back to a namespace-less attribute of the same local name, so
    /// documents that drop attribute prefixes still answer the query.
    pub fn attribute(&self, namespace: &str, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| {
                attr.local_name == local_name && attr.namespace.as_deref() == Some(namespace)
            })
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|attr| attr.local_name == local_name && attr.namespace.is_none())
            })
            .map(|attr| attr.value.as_str())
    }

    /// Returns all attributes.
    #[inline]
    pub fn attributes(&self) -> &[XmlAttribute] {
        &self.attributes
    }

    /// Returns the child nodes in document order.
    #[inline]
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Iterates over the direct child elements in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Collects all descendant elements matching the given name, in
    /// document order. The element itself is not considered.
    pub fn descendants(&self, namespace: &str, local_name: &str) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        self.collect_descendants(namespace, local_name, &mut found);
        found
    }

    fn collect_descendants<'a>(
        &'a self,
        namespace: &str,
        local_name: &str,
        found: &mut Vec<&'a XmlElement>,
    ) {
        for child in self.child_elements() {
            if child.is(namespace, local_name) {
                found.push(child);
            }
            child.collect_descendants(namespace, local_name, found);
        }
    }

    /// Returns the first descendant element matching the given name, in
    /// document order.
    pub fn find_descendant(&self, namespace: &str, local_name: &str) -> Option<&XmlElement> {
        for child in self.child_elements() {
            if child.is(namespace, local_name) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(namespace, local_name) {
                return Some(found);
            }
        }
        None
    }

    /// Returns the concatenated text of this element and all descendants.
    pub fn text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, text: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(t) => text.push_str(t),
                XmlNode::Element(element) => element.collect_text(text),
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(XmlNode::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(XmlNode::Text(text.to_string()));
        }
    }

    fn push_char(&mut self, c: char) {
        if let Some(XmlNode::Text(last)) = self.children.last_mut() {
            last.push(c);
        } else {
            self.children.push(XmlNode::Text(c.to_string()));
        }
    }
}

/// A loaded XML document.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    /// Loads a document under [`XmlLimits::default`].
    pub fn parse(xml: &str) -> Result<Self> {
        Self::parse_with(xml, &XmlLimits::default())
    }

    /// Loads a document under the given limits.
    pub fn parse_with(xml: &str, limits: &XmlLimits) -> Result<Self> {
        if xml.len() > limits.max_document_bytes {
            return Err(Error::ResourceLimitExceeded(format!(
                "XML document is {} bytes, over the {} byte limit",
                xml.len(),
                limits.max_document_bytes
            )));
        }

        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut scopes: Vec<NamespaceScope> = Vec::new();
        let mut root: Option<XmlElement> = None;
        let mut expansion = ExpansionBudget::new(limits.max_entity_expansion_chars);

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::DocType(_)) => {
                    return Err(Error::MalformedInput(
                        "DOCTYPE declarations are not allowed".to_string(),
                    ));
                },
                Ok(Event::Start(ref e)) => {
                    if stack.len() >= limits.max_depth {
                        return Err(Error::ResourceLimitExceeded(format!(
                            "element nesting deeper than {} levels",
                            limits.max_depth
                        )));
                    }
                    let element = open_element(e, &mut scopes, &mut expansion)?;
                    stack.push(element);
                },
                Ok(Event::Empty(ref e)) => {
                    if stack.len() >= limits.max_depth {
                        return Err(Error::ResourceLimitExceeded(format!(
                            "element nesting deeper than {} levels",
                            limits.max_depth
                        )));
                    }
                    let element = open_element(e, &mut scopes, &mut expansion)?;
                    scopes.pop();
                    attach(element, &mut stack, &mut root)?;
                },
                Ok(Event::End(_)) => {
                    let element = stack.pop().ok_or_else(|| {
                        Error::MalformedInput("unexpected closing tag".to_string())
                    })?;
                    scopes.pop();
                    attach(element, &mut stack, &mut root)?;
                },
                Ok(Event::Text(ref t)) => {
                    // Entity and character references arrive as separate
                    // GeneralRef events, so text is raw character data here.
                    let text = std::str::from_utf8(t).map_err(|_| {
                        Error::MalformedInput("invalid UTF-8 in character data".to_string())
                    })?;
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(text);
                    }
                },
                Ok(Event::CData(ref t)) => {
                    let text = std::str::from_utf8(t).map_err(|_| {
                        Error::MalformedInput("invalid UTF-8 in CDATA section".to_string())
                    })?;
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(text);
                    }
                },
                Ok(Event::GeneralRef(ref r)) => {
                    let name = std::str::from_utf8(r).map_err(|_| {
                        Error::MalformedInput("invalid UTF-8 in entity reference".to_string())
                    })?;
                    let c = resolve_reference(name).ok_or_else(|| {
                        Error::MalformedInput(format!("reference to undefined entity \"&{name};\""))
                    })?;
                    expansion.charge(1)?;
                    if let Some(parent) = stack.last_mut() {
                        parent.push_char(c);
                    }
                },
                Ok(Event::Decl(_)) | Ok(Event::Comment(_)) | Ok(Event::PI(_)) => {},
                Ok(Event::Eof) => break,
                Err(e) => return Err(e.into()),
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(Error::MalformedInput(
                "unclosed element at end of document".to_string(),
            ));
        }
        root.map(|root| Self { root })
            .ok_or_else(|| Error::MalformedInput("no root element found".to_string()))
    }

    /// Returns the root element.
    #[inline]
    pub fn root(&self) -> &XmlElement {
        &self.root
    }
}

/// Cumulative cap on characters produced by reference resolution.
struct ExpansionBudget {
    produced: usize,
    limit: usize,
}

impl ExpansionBudget {
    fn new(limit: usize) -> Self {
        Self { produced: 0, limit }
    }

    fn charge(&mut self, chars: usize) -> Result<()> {
        self.produced += chars;
        if self.produced > self.limit {
            Err(Error::ResourceLimitExceeded(format!(
                "entity expansion produced more than {} characters",
                self.limit
            )))
        } else {
            Ok(())
        }
    }
}

/// One element's worth of namespace declarations.
#[derive(Default)]
struct NamespaceScope {
    bindings: HashMap<String, String>,
    // Some(None) records an explicit xmlns="" un-declaration.
    default: Option<Option<String>>,
}

impl NamespaceScope {
    fn declare(&mut self, key: &str, uri: String) {
        if let Some(prefix) = key.strip_prefix("xmlns:") {
            self.bindings.insert(prefix.to_string(), uri);
        } else if uri.is_empty() {
            self.default = Some(None);
        } else {
            self.default = Some(Some(uri));
        }
    }
}

fn resolve_prefix(scopes: &[NamespaceScope], prefix: &str) -> Option<String> {
    for scope in scopes.iter().rev() {
        if let Some(uri) = scope.bindings.get(prefix) {
            return Some(uri.clone());
        }
    }
    namespace::well_known_prefix_uri(prefix).map(str::to_string)
}

fn resolve_default(scopes: &[NamespaceScope]) -> Option<String> {
    for scope in scopes.iter().rev() {
        if let Some(default) = &scope.default {
            return default.clone();
        }
    }
    None
}

fn resolve_element_name(qualified: &str, scopes: &[NamespaceScope]) -> (Option<String>, String) {
    match qualified.split_once(':') {
        Some((prefix, local)) => (resolve_prefix(scopes, prefix), local.to_string()),
        None => (resolve_default(scopes), qualified.to_string()),
    }
}

fn resolve_attribute_name(qualified: &str, scopes: &[NamespaceScope]) -> (Option<String>, String) {
    match qualified.split_once(':') {
        Some((prefix, local)) => (resolve_prefix(scopes, prefix), local.to_string()),
        // Unprefixed attributes are namespace-less, not in the default namespace.
        None => (None, qualified.to_string()),
    }
}

/// Resolves a predefined entity or numeric character reference.
///
/// `name` is the content between `&` and `;`. Anything else, including
/// DTD-style custom entities, resolves to `None`.
fn resolve_reference(name: &str) -> Option<char> {
    let name = name.strip_prefix('&').unwrap_or(name);
    let name = name.strip_suffix(';').unwrap_or(name);
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = if let Some(hex) = digits.strip_prefix('x').or_else(|| {
                digits.strip_prefix('X')
            }) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                digits.parse::<u32>().ok()?
            };
            char::from_u32(code)
        },
    }
}

fn open_element(
    e: &BytesStart,
    scopes: &mut Vec<NamespaceScope>,
    expansion: &mut ExpansionBudget,
) -> Result<XmlElement> {
    // First pass over the attributes: xmlns declarations only, so the new
    // scope is complete before any name is resolved.
    let mut scope = NamespaceScope::default();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| Error::MalformedInput(format!("invalid attribute: {e}")))?;
        let key = attribute_key(&attr)?;
        if key == "xmlns" || key.starts_with("xmlns:") {
            let value = unescape_attribute_value(&attr, expansion)?;
            scope.declare(key, value);
        }
    }
    scopes.push(scope);

    let qualified = std::str::from_utf8(e.name().as_ref())
        .map_err(|_| Error::MalformedInput("invalid UTF-8 in element name".to_string()))?
        .to_string();
    let (namespace, local_name) = resolve_element_name(&qualified, scopes);

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| Error::MalformedInput(format!("invalid attribute: {e}")))?;
        let key = attribute_key(&attr)?;
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let value = unescape_attribute_value(&attr, expansion)?;
        let (namespace, local_name) = resolve_attribute_name(key, scopes);
        attributes.push(XmlAttribute {
            namespace,
            local_name,
            value,
        });
    }

    Ok(XmlElement::new(qualified, namespace, local_name, attributes))
}

fn attribute_key<'a>(attr: &'a Attribute<'a>) -> Result<&'a str> {
    std::str::from_utf8(attr.key.as_ref())
        .map_err(|_| Error::MalformedInput("invalid UTF-8 in attribute name".to_string()))
}

fn unescape_attribute_value(attr: &Attribute, expansion: &mut ExpansionBudget) -> Result<String> {
    expansion.charge(memchr_iter(b'&', &attr.value).count())?;
    let value = attr
        .unescape_value()
        .map_err(|e| Error::MalformedInput(format!("invalid attribute value: {e}")))?;
    Ok(value.into_owned())
}

fn attach(
    element: XmlElement,
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
        Ok(())
    } else if root.is_some() {
        Err(Error::MalformedInput(
            "multiple root elements".to_string(),
        ))
    } else {
        *root = Some(element);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::namespace::{OFFICENS, STYLENS, TEXTNS};

    const CONTENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0">
  <office:body>
    <office:text>
      <text:p text:style-name="P1">first</text:p>
      <text:p>second <text:span>nested</text:span></text:p>
    </office:text>
  </office:body>
</office:document-content>"#;

    #[test]
    fn parses_declared_namespaces() {
        let document = XmlDocument::parse(CONTENT).unwrap();
        let root = document.root();
        assert!(root.is(OFFICENS, "document-content"));
        assert_eq!(root.qualified_name(), "office:document-content");

        let paragraphs = root.descendants(TEXTNS, "p");
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].attribute(TEXTNS, "style-name"), Some("P1"));
        assert_eq!(paragraphs[1].attribute(TEXTNS, "style-name"), None);
    }

    #[test]
    fn falls_back_to_well_known_prefixes() {
        let xml = r#"<office:document-content><office:body><text:p>hello</text:p></office:body></office:document-content>"#;
        let document = XmlDocument::parse(xml).unwrap();
        assert!(document.root().is(OFFICENS, "document-content"));
        let paragraphs = document.root().descendants(TEXTNS, "p");
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].text(), "hello");
    }

    #[test]
    fn declared_namespaces_override_well_known_bindings() {
        let xml = r#"<text:p xmlns:text="urn:example:other">hello</text:p>"#;
        let document = XmlDocument::parse(xml).unwrap();
        assert!(!document.root().is(TEXTNS, "p"));
        assert!(document.root().is("urn:example:other", "p"));
    }

    #[test]
    fn unknown_prefixes_resolve_to_no_namespace() {
        let xml = r#"<w:body><w:p/></w:body>"#;
        let document = XmlDocument::parse(xml).unwrap();
        assert_eq!(document.root().namespace(), None);
        assert_eq!(document.root().local_name(), "body");
    }

    #[test]
    fn unprefixed_attributes_are_namespace_less() {
        let xml = r#"<style:style name="X" style:name="Y"/>"#;
        let document = XmlDocument::parse(xml).unwrap();
        // Exact namespace match wins over the namespace-less fallback.
        assert_eq!(document.root().attribute(STYLENS, "name"), Some("Y"));
    }

    #[test]
    fn recursive_text_spans_child_elements() {
        let document = XmlDocument::parse(CONTENT).unwrap();
        let paragraphs = document.root().descendants(TEXTNS, "p");
        assert_eq!(paragraphs[1].text(), "second nested");
    }

    #[test]
    fn doctype_is_rejected() {
        let xml = r#"<!DOCTYPE doc [<!ENTITY x "y">]><doc>&x;</doc>"#;
        let err = XmlDocument::parse(xml).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)), "{err}");
        let err = XmlDocument::parse("<!DOCTYPE html><html/>").unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)), "{err}");
    }

    #[test]
    fn predefined_entities_resolve() {
        let xml = "<doc a=\"x&amp;y\">&lt;tag&gt; &quot;q&quot; &apos;a&apos; &amp;</doc>";
        let document = XmlDocument::parse(xml).unwrap();
        assert_eq!(document.root().text(), "<tag> \"q\" 'a' &");
        assert_eq!(document.root().attributes()[0].value, "x&y".to_string());
    }

    #[test]
    fn character_references_resolve() {
        let xml = "<doc>&#65;&#x42;&#x1F600;</doc>";
        let document = XmlDocument::parse(xml).unwrap();
        assert_eq!(document.root().text(), "AB\u{1f600}");
    }

    #[test]
    fn undefined_entities_are_rejected() {
        let err = XmlDocument::parse("<doc>&custom;</doc>").unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)), "{err}");
    }

    #[test]
    fn document_size_cap_is_enforced() {
        let limits = XmlLimits {
            max_document_bytes: 32,
            ..XmlLimits::default()
        };
        let err = XmlDocument::parse_with("<doc>0123456789012345678901234567890123</doc>", &limits)
            .unwrap_err();
        assert!(matches!(err, Error::ResourceLimitExceeded(_)), "{err}");
    }

    #[test]
    fn depth_cap_is_enforced() {
        let limits = XmlLimits {
            max_depth: 4,
            ..XmlLimits::default()
        };
        let xml = "<a><b><c><d><e/></d></c></b></a>";
        let err = XmlDocument::parse_with(xml, &limits).unwrap_err();
        assert!(matches!(err, Error::ResourceLimitExceeded(_)), "{err}");

        let shallow = "<a><b><c><d/></c></b></a>";
        assert!(XmlDocument::parse_with(shallow, &limits).is_ok());
    }

    #[test]
    fn entity_expansion_cap_is_enforced() {
        let limits = XmlLimits {
            max_entity_expansion_chars: 4,
            ..XmlLimits::default()
        };
        let xml = "<doc>&amp;&amp;&amp;&amp;&amp;</doc>";
        let err = XmlDocument::parse_with(xml, &limits).unwrap_err();
        assert!(matches!(err, Error::ResourceLimitExceeded(_)), "{err}");

        let under = "<doc>&amp;&amp;&amp;&amp;</doc>";
        assert!(XmlDocument::parse_with(under, &limits).is_ok());
    }

    #[test]
    fn expansion_cap_covers_attribute_values() {
        let limits = XmlLimits {
            max_entity_expansion_chars: 2,
            ..XmlLimits::default()
        };
        let err = XmlDocument::parse_with(r#"<doc a="&amp;&amp;&amp;"/>"#, &limits).unwrap_err();
        assert!(matches!(err, Error::ResourceLimitExceeded(_)), "{err}");
    }

    #[test]
    fn malformed_xml_is_rejected() {
        assert!(matches!(
            XmlDocument::parse("<a><b></a></b>").unwrap_err(),
            Error::MalformedInput(_)
        ));
        assert!(matches!(
            XmlDocument::parse("<a>").unwrap_err(),
            Error::MalformedInput(_)
        ));
        assert!(matches!(
            XmlDocument::parse("").unwrap_err(),
            Error::MalformedInput(_)
        ));
        assert!(matches!(
            XmlDocument::parse("just text").unwrap_err(),
            Error::MalformedInput(_)
        ));
    }

    #[test]
    fn raw_text_is_read_verbatim() {
        let xml = "<doc>caf\u{e9} \u{1f600} 100% -- ok</doc>";
        let document = XmlDocument::parse(xml).unwrap();
        assert_eq!(document.root().text(), "caf\u{e9} \u{1f600} 100% -- ok");
    }

    #[test]
    fn cdata_passes_through_verbatim() {
        let xml = "<doc><![CDATA[a & b < c]]></doc>";
        let document = XmlDocument::parse(xml).unwrap();
        assert_eq!(document.root().text(), "a & b < c");
    }

    #[test]
    fn adjacent_text_is_merged() {
        let xml = "<doc>a&amp;b<!-- comment -->c</doc>";
        let document = XmlDocument::parse(xml).unwrap();
        assert_eq!(document.root().children().len(), 1);
        assert_eq!(document.root().text(), "a&bc");
    }

    #[test]
    fn find_descendant_returns_first_in_document_order() {
        let xml = r#"<draw:frame><draw:g><draw:image xlink:href="first"/></draw:g><draw:image xlink:href="second"/></draw:frame>"#;
        let document = XmlDocument::parse(xml).unwrap();
        let image = document
            .root()
            .find_descendant(crate::odf::namespace::DRAWNS, "image")
            .unwrap();
        assert_eq!(
            image.attribute(crate::odf::namespace::XLINKNS, "href"),
            Some("first")
        );
        assert!(document.root().find_descendant(TEXTNS, "p").is_none());
    }

    #[test]
    fn descendants_preserve_document_order() {
        let xml = r#"<office:text><text:p>1</text:p><text:section><text:p>2</text:p></text:section><text:p>3</text:p></office:text>"#;
        let document = XmlDocument::parse(xml).unwrap();
        let texts: Vec<String> = document
            .root()
            .descendants(TEXTNS, "p")
            .iter()
            .map(|p| p.text())
            .collect();
        assert_eq!(texts, vec!["1", "2", "3"]);
    }
}
