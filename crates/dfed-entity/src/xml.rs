//! # Entity XML Marshalling
//!
//! Deterministic wire marshalling for entities. `to_xml` walks the schema in
//! declaration order, so equal entities always serialize to identical bytes;
//! `from_xml` decodes all-or-nothing and hands the coerced slots to the
//! crate-private assembly constructor.
//!
//! ## Wire Shape
//!
//! The root element is the entity type name. Scalar properties are leaf
//! elements carrying coerced text; absent optionals are omitted entirely.
//! Nested entities emit their sub-tree under the property's wire name, and
//! collections emit one child element per item in list order. Elements not
//! declared by the schema are ignored on decode, which is what lets an older
//! pod read entities from a newer one.

use std::sync::Arc;

use thiserror::Error;

use dfed_core::{Timestamp, XmlError, XmlNode};

use crate::entity::Entity;
use crate::schema::{EntitySchema, PropertyDef, PropertyKind};
use crate::value::PropertyValue;

/// Errors raised while decoding wire XML into an entity.
///
/// A partial entity is never returned: the first structural problem aborts
/// the whole decode.
#[derive(Error, Debug)]
pub enum ParsingError {
    /// The input was not well-formed XML.
    #[error("invalid entity XML: {0}")]
    Xml(#[from] XmlError),

    /// The root element does not match the expected entity type.
    #[error("unexpected root element <{found}> (expected <{expected}>)")]
    UnexpectedRoot {
        /// The element name the schema demands.
        expected: String,
        /// The element name found in the document.
        found: String,
    },

    /// A required element (with no default) was absent.
    #[error("missing element <{element}> for entity type \"{entity_type}\"")]
    MissingElement {
        /// The entity type being decoded.
        entity_type: String,
        /// The wire element name that was not found.
        element: String,
    },

    /// More than one element was supplied for a single-valued property.
    #[error("ambiguous duplicate element <{element}> for entity type \"{entity_type}\"")]
    DuplicateElement {
        /// The entity type being decoded.
        entity_type: String,
        /// The wire element name that appeared more than once.
        element: String,
    },

    /// Scalar text could not be coerced to the declared kind.
    #[error("cannot read <{element}> as {kind}: \"{text}\"")]
    Coercion {
        /// The wire element name.
        element: String,
        /// The declared kind name.
        kind: &'static str,
        /// The text that failed to coerce.
        text: String,
    },
}

impl Entity {
    /// Serialize to wire XML, elements in schema declaration order.
    ///
    /// The output is a document fragment (no XML declaration), ready to be
    /// embedded in a transport envelope.
    pub fn to_xml(&self) -> String {
        self.to_xml_node().render_fragment()
    }

    /// Build the wire element tree without rendering it.
    pub fn to_xml_node(&self) -> XmlNode {
        node_for(self, self.type_name())
    }

    /// Parse wire XML against a schema.
    ///
    /// # Errors
    ///
    /// Returns [`ParsingError`] if the input is not well-formed, the root
    /// element does not match the schema's type name, a required element is
    /// missing, an element is duplicated, or text fails kind coercion.
    pub fn from_xml(schema: Arc<EntitySchema>, input: &str) -> Result<Entity, ParsingError> {
        let node = XmlNode::parse(input)?;
        Self::from_xml_node(schema, &node)
    }

    /// Decode an already-parsed element tree against a schema.
    pub fn from_xml_node(schema: Arc<EntitySchema>, node: &XmlNode) -> Result<Entity, ParsingError> {
        if node.name() != schema.name() {
            return Err(ParsingError::UnexpectedRoot {
                expected: schema.name().to_string(),
                found: node.name().to_string(),
            });
        }
        decode_fields(&schema, node)
    }
}

fn node_for(entity: &Entity, element_name: &str) -> XmlNode {
    let mut node = XmlNode::new(element_name);
    for (def, slot) in entity.schema().properties().iter().zip(entity.slots()) {
        let Some(value) = slot else { continue };
        match value {
            PropertyValue::Entity(nested) => {
                node.push_child(node_for(nested, def.wire_name()));
            }
            PropertyValue::Collection(items) => {
                for item in items {
                    node.push_child(node_for(item, def.wire_name()));
                }
            }
            scalar => {
                // wire_text is Some for every scalar variant.
                if let Some(text) = scalar.wire_text() {
                    node.push_child(XmlNode::with_text(def.wire_name(), text));
                }
            }
        }
    }
    node
}

fn decode_fields(schema: &Arc<EntitySchema>, node: &XmlNode) -> Result<Entity, ParsingError> {
    let mut slots = Vec::with_capacity(schema.properties().len());

    for def in schema.properties() {
        let slot = match def.kind() {
            PropertyKind::Collection(nested) => {
                let items = node
                    .children_named(def.wire_name())
                    .map(|child| decode_fields(nested, child))
                    .collect::<Result<Vec<_>, _>>()?;
                Some(PropertyValue::Collection(items))
            }
            PropertyKind::Entity(nested) => {
                match single_child(schema.name(), node, def.wire_name())? {
                    Some(child) => Some(PropertyValue::Entity(decode_fields(nested, child)?)),
                    None => absent_slot(schema, def)?,
                }
            }
            scalar_kind => match single_child(schema.name(), node, def.wire_name())? {
                Some(child) => Some(coerce_scalar(scalar_kind, def, child.text())?),
                None => absent_slot(schema, def)?,
            },
        };
        slots.push(slot);
    }

    Ok(Entity::from_slots(schema.clone(), slots))
}

/// Resolve an absent element: fill the declared default, error if the
/// property is required, otherwise leave the slot empty.
fn absent_slot(
    schema: &EntitySchema,
    def: &PropertyDef,
) -> Result<Option<PropertyValue>, ParsingError> {
    match def.default() {
        Some(default) => Ok(Some(default.clone())),
        None if def.required() => Err(ParsingError::MissingElement {
            entity_type: schema.name().to_string(),
            element: def.wire_name().to_string(),
        }),
        None => Ok(None),
    }
}

fn single_child<'a>(
    entity_type: &str,
    node: &'a XmlNode,
    element: &'a str,
) -> Result<Option<&'a XmlNode>, ParsingError> {
    let mut matches = node.children_named(element);
    let first = matches.next();
    if matches.next().is_some() {
        return Err(ParsingError::DuplicateElement {
            entity_type: entity_type.to_string(),
            element: element.to_string(),
        });
    }
    Ok(first)
}

fn coerce_scalar(
    kind: &PropertyKind,
    def: &PropertyDef,
    text: &str,
) -> Result<PropertyValue, ParsingError> {
    let coercion_error = || ParsingError::Coercion {
        element: def.wire_name().to_string(),
        kind: kind.name(),
        text: text.to_string(),
    };

    match kind {
        PropertyKind::String => Ok(PropertyValue::Str(text.to_string())),
        PropertyKind::Integer => text
            .parse::<i64>()
            .map(PropertyValue::Int)
            .map_err(|_| coercion_error()),
        PropertyKind::UnsignedInteger => text
            .parse::<u64>()
            .map(PropertyValue::UInt)
            .map_err(|_| coercion_error()),
        PropertyKind::Boolean => match text {
            "true" | "t" | "yes" | "y" | "1" => Ok(PropertyValue::Bool(true)),
            "false" | "f" | "no" | "n" | "0" => Ok(PropertyValue::Bool(false)),
            _ => Err(coercion_error()),
        },
        PropertyKind::Timestamp => Timestamp::parse(text)
            .map(PropertyValue::Timestamp)
            .map_err(|_| coercion_error()),
        // Entity and Collection never reach scalar coercion.
        PropertyKind::Entity(_) | PropertyKind::Collection(_) => Err(coercion_error()),
    }
}
