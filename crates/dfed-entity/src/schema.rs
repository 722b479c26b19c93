//! # Property Schemas
//!
//! The declarative, ordered description of an entity type. A schema is an
//! ordered sequence of property definitions bound to a type name; declaration
//! order is the wire order, fixed when the schema is finalized.
//!
//! ## Design
//!
//! Schemas pass through exactly two states: a [`SchemaBuilder`] that accepts
//! declarations (and rejects duplicate names on the spot), and a frozen
//! [`EntitySchema`] behind an `Arc` that is never mutated again. There is no
//! way to reopen a finalized schema.

use std::sync::Arc;

use thiserror::Error;

use crate::value::PropertyValue;

/// Errors raised while building schemas or populating a registry.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The same property name was declared twice on one entity type.
    #[error("duplicate property \"{property}\" declared on entity type \"{entity_type}\"")]
    DuplicateProperty {
        /// The entity type being built.
        entity_type: String,
        /// The property name that was declared twice.
        property: String,
    },

    /// An entity type name was registered twice.
    #[error("entity type \"{0}\" is already registered")]
    DuplicateType(String),
}

/// The kind of value a property holds.
///
/// Nested-entity and collection kinds carry the schema of the nested type,
/// so marshalling can recurse without a registry lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    /// Free-form text.
    String,
    /// Signed integer.
    Integer,
    /// Non-negative integer.
    UnsignedInteger,
    /// Boolean flag.
    Boolean,
    /// UTC timestamp, second precision.
    Timestamp,
    /// A single nested entity of the given type.
    Entity(Arc<EntitySchema>),
    /// Zero or more nested entities of the given type.
    Collection(Arc<EntitySchema>),
}

impl PropertyKind {
    /// Short kind name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            PropertyKind::String => "string",
            PropertyKind::Integer => "integer",
            PropertyKind::UnsignedInteger => "unsigned integer",
            PropertyKind::Boolean => "boolean",
            PropertyKind::Timestamp => "timestamp",
            PropertyKind::Entity(_) => "entity",
            PropertyKind::Collection(_) => "collection",
        }
    }

    /// Full description for error messages, naming the nested type where
    /// there is one.
    pub fn describe(&self) -> String {
        match self {
            PropertyKind::Entity(schema) => format!("nested \"{}\" entity", schema.name()),
            PropertyKind::Collection(schema) => {
                format!("collection of \"{}\" entities", schema.name())
            }
            scalar => scalar.name().to_string(),
        }
    }
}

/// One property of an entity type: name, kind, wire element name,
/// required-ness and optional default.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    name: String,
    xml_name: String,
    kind: PropertyKind,
    required: bool,
    default: Option<PropertyValue>,
}

impl PropertyDef {
    fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        let name = name.into();
        Self {
            xml_name: name.clone(),
            name,
            kind,
            required: true,
            default: None,
        }
    }

    /// A required text property.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::String)
    }

    /// A required signed-integer property.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Integer)
    }

    /// A required non-negative-integer property.
    pub fn unsigned(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::UnsignedInteger)
    }

    /// A required boolean property.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Boolean)
    }

    /// A required timestamp property.
    pub fn timestamp(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Timestamp)
    }

    /// A required nested-entity property. The wire element name defaults to
    /// the property name.
    pub fn entity(name: impl Into<String>, schema: Arc<EntitySchema>) -> Self {
        Self::new(name, PropertyKind::Entity(schema))
    }

    /// A collection-of-nested-entity property. Serializes as one child
    /// element per item, each named by the property's wire name; collections
    /// carrying plural property names are typically renamed to the nested
    /// type's singular (a `photos` property travels as `<photo>` elements).
    pub fn collection(name: impl Into<String>, schema: Arc<EntitySchema>) -> Self {
        Self::new(name, PropertyKind::Collection(schema))
    }

    /// Mark the property optional: absence is not a violation and nothing is
    /// emitted on the wire when the value is absent.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Override the wire element name (e.g. `diaspora_id` is carried as
    /// `diaspora_handle`).
    pub fn xml_name(mut self, xml_name: impl Into<String>) -> Self {
        self.xml_name = xml_name.into();
        self
    }

    /// Supply a default used when the property is absent at construction or
    /// absent from decoded XML.
    pub fn with_default(mut self, value: impl Into<PropertyValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// The property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wire element name.
    pub fn wire_name(&self) -> &str {
        &self.xml_name
    }

    /// The declared kind.
    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    /// Whether absence (with no default) is a violation.
    pub fn required(&self) -> bool {
        self.required
    }

    /// The declared default, if any.
    pub fn default(&self) -> Option<&PropertyValue> {
        self.default.as_ref()
    }
}

/// A frozen, ordered sequence of property definitions bound to an entity
/// type name. The type name doubles as the XML root element name.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySchema {
    name: String,
    properties: Vec<PropertyDef>,
}

impl EntitySchema {
    /// The entity type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All property definitions in declaration order.
    pub fn properties(&self) -> &[PropertyDef] {
        &self.properties
    }

    /// Look up a property definition by name.
    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// The declaration position of a property, which is also its slot index
    /// in every instance of this type.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }
}

/// Assembles an [`EntitySchema`] declaration by declaration.
///
/// # Example
///
/// ```
/// use dfed_entity::{PropertyDef, SchemaBuilder};
///
/// # fn build() -> Result<(), dfed_entity::SchemaError> {
/// let mut builder = SchemaBuilder::new("location");
/// builder.declare(PropertyDef::string("address"))?;
/// builder.declare(PropertyDef::string("lat"))?;
/// builder.declare(PropertyDef::string("lng"))?;
/// let schema = builder.finalize();
/// assert_eq!(schema.name(), "location");
/// # Ok(())
/// # }
/// # build().unwrap();
/// ```
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    properties: Vec<PropertyDef>,
}

impl SchemaBuilder {
    /// Start a schema for the given entity type name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Append a property declaration.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateProperty`] if a property with the
    /// same name was already declared; the schema is left unchanged.
    pub fn declare(&mut self, def: PropertyDef) -> Result<(), SchemaError> {
        if self.properties.iter().any(|p| p.name == def.name) {
            return Err(SchemaError::DuplicateProperty {
                entity_type: self.name.clone(),
                property: def.name,
            });
        }
        self.properties.push(def);
        Ok(())
    }

    /// Freeze declaration order and return the immutable schema.
    pub fn finalize(self) -> Arc<EntitySchema> {
        Arc::new(EntitySchema {
            name: self.name,
            properties: self.properties,
        })
    }
}
