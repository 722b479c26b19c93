//! # Entity Instances
//!
//! An [`Entity`] is an immutable, fully-populated instance of one
//! [`EntitySchema`]. There are exactly two ways to obtain one: the public
//! validating constructor [`Entity::construct`], and the crate-private
//! assembly path used by the XML decoder after it has already coerced every
//! field. Both produce the same representation; neither can skip the
//! schema's ordering.
//!
//! ## Construction Contract
//!
//! Construction is all-or-nothing. Every required property must be present
//! (or carry a declared default) and every supplied value must match its
//! declared kind; keys the schema does not know are rejected. On failure the
//! returned [`EntityError`] enumerates *every* violation, not just the first
//! one encountered, so a pod operator sees the whole picture at once.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::schema::{EntitySchema, PropertyKind};
use crate::value::PropertyValue;

/// A single structural violation found while constructing an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// A required property (with no default) was absent.
    Missing {
        /// The property name.
        property: String,
    },
    /// A supplied value did not match the declared kind.
    WrongKind {
        /// The property name.
        property: String,
        /// Description of the declared kind.
        expected: String,
        /// Kind of the value actually supplied.
        actual: &'static str,
    },
    /// A supplied key is not declared by the schema.
    Unknown {
        /// The unrecognized key.
        property: String,
    },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::Missing { property } => {
                write!(f, "missing required property \"{property}\"")
            }
            Violation::WrongKind {
                property,
                expected,
                actual,
            } => write!(f, "property \"{property}\": expected {expected}, got {actual}"),
            Violation::Unknown { property } => write!(f, "unknown property \"{property}\""),
        }
    }
}

/// Errors raised by entity construction.
#[derive(Error, Debug)]
pub enum EntityError {
    /// One or more properties failed the structural checks. Carries every
    /// violation found, in schema declaration order (unknown keys last).
    #[error("cannot construct \"{entity_type}\": {count} property violation(s)")]
    Construction {
        /// The entity type that was being constructed.
        entity_type: String,
        /// Number of violations found.
        count: usize,
        /// Individual violations.
        violations: Vec<Violation>,
    },
}

impl EntityError {
    /// Borrow the collected violations.
    pub fn violations(&self) -> &[Violation] {
        match self {
            EntityError::Construction { violations, .. } => violations,
        }
    }
}

/// An immutable, schema-validated entity instance.
///
/// Property values are stored in schema declaration order; absent optionals
/// hold no value. Two entities are equal iff they have the same type and all
/// property values are equal, recursively through nested entities.
#[derive(Clone)]
pub struct Entity {
    schema: Arc<EntitySchema>,
    slots: Vec<Option<PropertyValue>>,
}

impl Entity {
    /// Build an entity from raw values, validating against the schema.
    ///
    /// Declared defaults fill properties absent from `values`. Collections
    /// are checked element-wise and nested entities by their type.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::Construction`] carrying every missing,
    /// mistyped and unknown property found.
    pub fn construct(
        schema: Arc<EntitySchema>,
        values: BTreeMap<String, PropertyValue>,
    ) -> Result<Entity, EntityError> {
        let mut remaining = values;
        let mut violations = Vec::new();
        let mut slots = Vec::with_capacity(schema.properties().len());

        for def in schema.properties() {
            match remaining.remove(def.name()) {
                Some(value) => {
                    if kind_matches(def.kind(), &value) {
                        slots.push(Some(value));
                    } else {
                        violations.push(Violation::WrongKind {
                            property: def.name().to_string(),
                            expected: def.kind().describe(),
                            actual: value.kind_name(),
                        });
                        slots.push(None);
                    }
                }
                None => match def.default() {
                    Some(default) => slots.push(Some(default.clone())),
                    None if def.required() => {
                        violations.push(Violation::Missing {
                            property: def.name().to_string(),
                        });
                        slots.push(None);
                    }
                    None => slots.push(None),
                },
            }
        }

        // BTreeMap iteration keeps unknown-key reporting deterministic.
        for (name, _) in remaining {
            violations.push(Violation::Unknown { property: name });
        }

        if !violations.is_empty() {
            return Err(EntityError::Construction {
                entity_type: schema.name().to_string(),
                count: violations.len(),
                violations,
            });
        }

        tracing::debug!(entity_type = %schema.name(), "constructed entity");
        Ok(Entity { schema, slots })
    }

    /// Assemble an entity from slots the XML decoder has already coerced
    /// and checked against the schema. Not a public construction path.
    pub(crate) fn from_slots(schema: Arc<EntitySchema>, slots: Vec<Option<PropertyValue>>) -> Entity {
        debug_assert_eq!(slots.len(), schema.properties().len());
        Entity { schema, slots }
    }

    /// The schema this entity was validated against.
    pub fn schema(&self) -> &Arc<EntitySchema> {
        &self.schema
    }

    /// The entity type name.
    pub fn type_name(&self) -> &str {
        self.schema.name()
    }

    /// Look up a property value by name. `None` for absent optionals and
    /// for names the schema does not declare.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        let position = self.schema.position(name)?;
        self.slots[position].as_ref()
    }

    /// Property values in schema declaration order.
    pub(crate) fn slots(&self) -> &[Option<PropertyValue>] {
        &self.slots
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name() && self.slots == other.slots
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut dbg = f.debug_struct(self.schema.name());
        for (def, slot) in self.schema.properties().iter().zip(&self.slots) {
            if let Some(value) = slot {
                dbg.field(def.name(), value);
            }
        }
        dbg.finish()
    }
}

/// Whether a supplied value satisfies a declared kind. Nested entities are
/// matched by type name; their contents were validated when they were
/// constructed.
fn kind_matches(kind: &PropertyKind, value: &PropertyValue) -> bool {
    match (kind, value) {
        (PropertyKind::String, PropertyValue::Str(_)) => true,
        (PropertyKind::Integer, PropertyValue::Int(_)) => true,
        (PropertyKind::UnsignedInteger, PropertyValue::UInt(_)) => true,
        (PropertyKind::Boolean, PropertyValue::Bool(_)) => true,
        (PropertyKind::Timestamp, PropertyValue::Timestamp(_)) => true,
        (PropertyKind::Entity(schema), PropertyValue::Entity(entity)) => {
            entity.type_name() == schema.name()
        }
        (PropertyKind::Collection(schema), PropertyValue::Collection(items)) => {
            items.iter().all(|item| item.type_name() == schema.name())
        }
        _ => false,
    }
}
