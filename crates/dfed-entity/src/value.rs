//! # Property Values
//!
//! The dynamically-kinded value carried by one entity property. A value is
//! one of the seven wire kinds; which kind a given property accepts is
//! declared by its [`PropertyKind`] in the schema.
//!
//! [`PropertyKind`]: crate::schema::PropertyKind

use dfed_core::Timestamp;

use crate::entity::Entity;

/// A single property value of an entity instance.
///
/// Nested entities and collections hold full [`Entity`] values of their own
/// types, so an entity instance is a tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Free-form text.
    Str(String),
    /// Signed integer.
    Int(i64),
    /// Non-negative integer (pixel sizes and similar counts).
    UInt(u64),
    /// Boolean flag.
    Bool(bool),
    /// UTC timestamp with second precision.
    Timestamp(Timestamp),
    /// A nested entity of the type named by the schema.
    Entity(Entity),
    /// An ordered collection of nested entities of one type.
    Collection(Vec<Entity>),
}

impl PropertyValue {
    /// The kind of this value, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            PropertyValue::Str(_) => "string",
            PropertyValue::Int(_) => "integer",
            PropertyValue::UInt(_) => "unsigned integer",
            PropertyValue::Bool(_) => "boolean",
            PropertyValue::Timestamp(_) => "timestamp",
            PropertyValue::Entity(_) => "entity",
            PropertyValue::Collection(_) => "collection",
        }
    }

    /// Borrow the text of a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Read a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow a nested entity value.
    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            PropertyValue::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// Borrow a collection value.
    pub fn as_collection(&self) -> Option<&[Entity]> {
        match self {
            PropertyValue::Collection(items) => Some(items),
            _ => None,
        }
    }

    /// Render a scalar value as wire text. `None` for nested entities and
    /// collections, which serialize as sub-trees rather than text.
    pub(crate) fn wire_text(&self) -> Option<String> {
        match self {
            PropertyValue::Str(s) => Some(s.clone()),
            PropertyValue::Int(i) => Some(i.to_string()),
            PropertyValue::UInt(u) => Some(u.to_string()),
            PropertyValue::Bool(b) => Some(if *b { "true" } else { "false" }.to_string()),
            PropertyValue::Timestamp(ts) => Some(ts.to_canonical_string()),
            PropertyValue::Entity(_) | PropertyValue::Collection(_) => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Str(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Str(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Int(i)
    }
}

impl From<u64> for PropertyValue {
    fn from(u: u64) -> Self {
        PropertyValue::UInt(u)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<Timestamp> for PropertyValue {
    fn from(ts: Timestamp) -> Self {
        PropertyValue::Timestamp(ts)
    }
}

impl From<Entity> for PropertyValue {
    fn from(e: Entity) -> Self {
        PropertyValue::Entity(e)
    }
}

impl From<Vec<Entity>> for PropertyValue {
    fn from(items: Vec<Entity>) -> Self {
        PropertyValue::Collection(items)
    }
}
