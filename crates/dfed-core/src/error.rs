//! # Error Types
//!
//! Structured error types for the foundational layer, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Higher layers define their own error enums (schema build, entity
//! construction, wire decoding, discovery, configuration) and convert from
//! these where a boundary is crossed.

use thiserror::Error;

/// Validation errors for protocol identifier newtypes.
///
/// Each identifier type enforces format constraints at construction time.
/// These errors carry the rejected input so that callers can diagnose bad
/// federation data without guesswork.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// Guid is not at least 16 hexadecimal characters.
    #[error("invalid guid: \"{0}\" (expected at least 16 hex characters)")]
    InvalidGuid(String),

    /// diaspora* ID does not match the `user@host` account shape.
    #[error("invalid diaspora* ID: \"{0}\" (expected lowercase user@host, optional :port)")]
    InvalidDiasporaId(String),

    /// Timestamp string is not valid UTC ISO 8601.
    #[error("invalid timestamp: \"{value}\" ({reason})")]
    InvalidTimestamp {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Errors while reading a wire XML document into an [`XmlNode`] tree.
///
/// [`XmlNode`]: crate::xml::XmlNode
#[derive(Error, Debug)]
pub enum XmlError {
    /// The underlying parser rejected the document as not well-formed.
    #[error("malformed XML: {0}")]
    Malformed(#[from] quick_xml::Error),

    /// An element attribute could not be decoded.
    #[error("malformed XML attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// A character reference or entity could not be resolved.
    #[error("invalid escape sequence in XML: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    /// The document ended while an element was still open.
    #[error("unexpected end of document inside <{element}>")]
    UnexpectedEof {
        /// Name of the innermost unclosed element.
        element: String,
    },

    /// The document contains no root element.
    #[error("document contains no root element")]
    NoRoot,
}
