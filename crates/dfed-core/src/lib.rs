#![deny(missing_docs)]

//! # dfed-core — Foundational Types for the dfed Federation Library
//!
//! This crate defines the foundational types that every other crate in the
//! workspace depends on. It has no internal crate dependencies — only `serde`,
//! `thiserror`, `chrono`, and `quick-xml` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for protocol identifiers.** A [`Guid`] and a
//!    [`DiasporaId`] are distinct types validated at construction. You cannot
//!    pass an arbitrary string where a protocol identifier is expected.
//!
//! 2. **[`XmlNode`] is the sole path to wire XML.** Every codec in the
//!    workspace parses through [`XmlNode::parse`] and emits through the
//!    canonical renderers, which produce deterministic bytes: fixed
//!    declaration, fixed indentation, fixed attribute order. Two equal
//!    documents always render identically.
//!
//! 3. **UTC-only, second-precision [`Timestamp`].** Subseconds are truncated
//!    at construction, not at serialization, so value equality and canonical
//!    rendering can never disagree.
//!
//! 4. **Structured errors with `thiserror`.** No `Box<dyn Error>`, no
//!    `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod temporal;
pub mod xml;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{IdentityError, XmlError};
pub use identity::{DiasporaId, Guid};
pub use temporal::Timestamp;
pub use xml::XmlNode;
