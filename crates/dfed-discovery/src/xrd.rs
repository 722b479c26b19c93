//! # XRD Documents
//!
//! Minimal generic layer for Extensible Resource Descriptor documents, the
//! container format WebFinger account lookups travel in. The writer is
//! deterministic (subject, then aliases, then links, attributes always in
//! `rel`, `type`, `href` order); the reader is deliberately tolerant and
//! extracts whatever subject, aliases and links it can find, leaving
//! completeness checks to the protocol layer above.

use serde::{Deserialize, Serialize};

use dfed_core::{XmlError, XmlNode};

/// The XRD 1.0 XML namespace.
pub const XRD_NAMESPACE: &str = "http://docs.oasis-open.org/ns/xri/xrd-1.0";

/// One `<Link>` entry: relation, optional media type, target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XrdLink {
    rel: String,
    media_type: Option<String>,
    href: String,
}

impl XrdLink {
    /// Create a link without a media type.
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        XrdLink {
            rel: rel.into(),
            media_type: None,
            href: href.into(),
        }
    }

    /// Set the `type` attribute.
    pub fn media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// The link relation.
    pub fn rel(&self) -> &str {
        &self.rel
    }

    /// The media type, if one is declared.
    pub fn media_type_str(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    /// The link target.
    pub fn href(&self) -> &str {
        &self.href
    }

    fn to_node(&self) -> XmlNode {
        let mut node = XmlNode::new("Link");
        node.set_attribute("rel", &self.rel);
        if let Some(media_type) = &self.media_type {
            node.set_attribute("type", media_type);
        }
        node.set_attribute("href", &self.href);
        node
    }

    fn from_node(node: &XmlNode) -> Option<XrdLink> {
        // A link without a relation or target is useless to any consumer.
        let rel = node.attribute("rel")?;
        let href = node.attribute("href")?;
        Some(XrdLink {
            rel: rel.to_string(),
            media_type: node.attribute("type").map(str::to_string),
            href: href.to_string(),
        })
    }
}

/// An XRD document: subject, aliases and links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XrdDocument {
    subject: Option<String>,
    aliases: Vec<String>,
    links: Vec<XrdLink>,
}

impl XrdDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `<Subject>`.
    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = Some(subject.into());
    }

    /// Append an `<Alias>`.
    pub fn push_alias(&mut self, alias: impl Into<String>) {
        self.aliases.push(alias.into());
    }

    /// Append a `<Link>`.
    pub fn push_link(&mut self, link: XrdLink) {
        self.links.push(link);
    }

    /// The subject, if present.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// The aliases, in document order.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The links, in document order.
    pub fn links(&self) -> &[XrdLink] {
        &self.links
    }

    /// The first link with the given relation.
    pub fn link(&self, rel: &str) -> Option<&XrdLink> {
        self.links.iter().find(|link| link.rel == rel)
    }

    /// Render the full document, XML declaration included.
    pub fn to_xml(&self) -> String {
        let mut root = XmlNode::new("XRD");
        root.set_attribute("xmlns", XRD_NAMESPACE);
        if let Some(subject) = &self.subject {
            root.push_child(XmlNode::with_text("Subject", subject));
        }
        for alias in &self.aliases {
            root.push_child(XmlNode::with_text("Alias", alias));
        }
        for link in &self.links {
            root.push_child(link.to_node());
        }
        root.render_document()
    }

    /// Extract subject, aliases and links from a document.
    ///
    /// Unknown elements and links without `rel` or `href` are skipped; an
    /// entirely empty result is still `Ok`. Callers decide what counts as
    /// incomplete.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] only when the input is not well-formed XML.
    pub fn parse(input: &str) -> Result<XrdDocument, XmlError> {
        let root = XmlNode::parse(input)?;
        let mut document = XrdDocument::new();
        for child in root.children() {
            match child.name() {
                "Subject" if document.subject.is_none() => {
                    document.subject = Some(child.text().to_string());
                }
                "Alias" => document.aliases.push(child.text().to_string()),
                "Link" => {
                    if let Some(link) = XrdLink::from_node(child) {
                        document.links.push(link);
                    }
                }
                _ => {}
            }
        }
        Ok(document)
    }
}
