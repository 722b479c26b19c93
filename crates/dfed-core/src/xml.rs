//! # Wire XML — Shared Document Plumbing
//!
//! This module defines [`XmlNode`], the single representation of wire XML
//! used by every codec in the workspace. Entities and discovery documents
//! both build an `XmlNode` tree and hand it to the canonical renderers, and
//! both decode through [`XmlNode::parse`].
//!
//! ## Design
//!
//! Rendering is deterministic: fixed declaration, two-space indentation,
//! attributes in insertion order, leaf text inline, empty elements
//! self-closed. Two equal trees always render to identical bytes, which is
//! what lets the higher layers promise a byte-stable wire contract.
//!
//! Parsing is tolerant of formatting: indentation whitespace between child
//! elements is dropped, while the text of a leaf element is preserved
//! exactly as written (including leading/trailing whitespace). Comments,
//! processing instructions and the XML declaration are skipped. Structural
//! strictness (which elements must be present) belongs to the codecs built
//! on top, not to this layer.

use quick_xml::escape::{escape, unescape};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::XmlError;

/// A single element in a wire XML document: name, attributes in insertion
/// order, child elements in document order, and text content.
///
/// A node carries either text or children, never both; the renderers ignore
/// text once a child has been pushed, and the parser drops whitespace-only
/// text from elements that contain children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
    text: String,
}

impl XmlNode {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: String::new(),
        }
    }

    /// Create a leaf element carrying text content.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: text.into(),
        }
    }

    /// Append an attribute. Attributes render in insertion order.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((key.into(), value.into()));
    }

    /// Append a child element.
    pub fn push_child(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    // -- accessors --

    /// The element name as written in the document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The text content. Empty for elements that contain children.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Look up an attribute value by key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All attributes in insertion order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// All child elements in document order.
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// The first child element with the given name.
    pub fn find_child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    // -- canonical rendering --

    /// Render as a standalone document: XML declaration plus the element
    /// tree, ending in a newline.
    pub fn render_document(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        self.render_into(&mut out, 0);
        out
    }

    /// Render as a document fragment without a declaration, for embedding
    /// inside an outer envelope.
    pub fn render_fragment(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }

        if !self.children.is_empty() {
            out.push_str(">\n");
            for child in &self.children {
                child.render_into(out, depth + 1);
            }
            for _ in 0..depth {
                out.push_str("  ");
            }
            out.push_str("</");
            out.push_str(&self.name);
            out.push_str(">\n");
        } else if self.text.is_empty() {
            out.push_str("/>\n");
        } else {
            out.push('>');
            out.push_str(&escape(self.text.as_str()));
            out.push_str("</");
            out.push_str(&self.name);
            out.push_str(">\n");
        }
    }

    // -- parsing --

    /// Parse a document (or fragment) into the tree of its root element.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] if the input is not well-formed or contains no
    /// root element. Content after the root element is ignored.
    pub fn parse(input: &str) -> Result<XmlNode, XmlError> {
        let mut reader = Reader::from_str(input);
        let mut stack: Vec<XmlNode> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    stack.push(node_from_start(&start)?);
                }
                Event::Empty(start) => {
                    let node = node_from_start(&start)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => return Ok(node),
                    }
                }
                Event::End(_) => {
                    // The reader has already verified the end tag matches.
                    let Some(mut node) = stack.pop() else {
                        continue;
                    };
                    if !node.children.is_empty()
                        && node.text.chars().all(|c| c.is_whitespace())
                    {
                        node.text.clear();
                    }
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => return Ok(node),
                    }
                }
                Event::Text(text) => {
                    if let Some(node) = stack.last_mut() {
                        let raw = String::from_utf8_lossy(&text);
                        node.text.push_str(&unescape(&raw)?);
                    }
                }
                Event::CData(data) => {
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Event::Eof => {
                    return Err(match stack.last() {
                        Some(open) => XmlError::UnexpectedEof {
                            element: open.name.clone(),
                        },
                        None => XmlError::NoRoot,
                    });
                }
                // Declaration, comments, processing instructions, doctypes.
                _ => {}
            }
        }
    }
}

fn node_from_start(start: &quick_xml::events::BytesStart<'_>) -> Result<XmlNode, XmlError> {
    let mut node = XmlNode::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape(&raw)?.into_owned();
        node.attributes.push((key, value));
    }
    Ok(node)
}
