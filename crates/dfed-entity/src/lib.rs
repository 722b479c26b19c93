//! # dfed-entity — Schema-Defined Federation Entities
//!
//! The entity framework of the dfed federation library. An entity type is
//! described once by an ordered [`EntitySchema`]; instances are immutable
//! [`Entity`] values built through a single validating constructor and
//! marshalled to and from wire XML in schema declaration order.
//!
//! ## Design
//!
//! - **Schemas are frozen.** A schema is assembled through [`SchemaBuilder`],
//!   which rejects duplicate property names, and finalized into an
//!   `Arc<EntitySchema>` that is never mutated again. The process-wide set of
//!   known types lives in a [`SchemaRegistry`] built once at startup.
//! - **Construction is all-or-nothing.** [`Entity::construct`] checks every
//!   property and reports *every* violation in one [`EntityError`], never
//!   just the first. Decoded XML is assembled through a separate private
//!   path, so both roads lead to the same immutable representation.
//! - **Marshalling is deterministic.** `to_xml` emits elements in schema
//!   declaration order; `from_xml` refuses partial decodes. For every
//!   constructible entity `e`, `from_xml(to_xml(e))` equals `e`.

pub mod catalog;
pub mod entity;
pub mod registry;
pub mod schema;
pub mod value;
pub mod xml;

pub use entity::{Entity, EntityError, Violation};
pub use registry::SchemaRegistry;
pub use schema::{EntitySchema, PropertyDef, PropertyKind, SchemaBuilder, SchemaError};
pub use value::PropertyValue;
pub use xml::ParsingError;
