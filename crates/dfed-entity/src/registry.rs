//! # Schema Registry
//!
//! Lookup table from entity type name to schema. A registry is assembled
//! once, at startup, and then only read; nothing in the protocol path adds
//! schemas while traffic is flowing.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::schema::{EntitySchema, SchemaError};

/// Immutable-after-startup collection of entity schemas, keyed by type name.
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Arc<EntitySchema>>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under its type name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateType`] if a schema with the same type
    /// name is already registered. The registry is left unchanged.
    pub fn register(&mut self, schema: Arc<EntitySchema>) -> Result<(), SchemaError> {
        if self.schemas.contains_key(schema.name()) {
            return Err(SchemaError::DuplicateType(schema.name().to_string()));
        }
        self.schemas.insert(schema.name().to_string(), schema);
        Ok(())
    }

    /// Look up a schema by entity type name.
    pub fn get(&self, type_name: &str) -> Option<Arc<EntitySchema>> {
        self.schemas.get(type_name).cloned()
    }

    /// Whether a type name is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.schemas.contains_key(type_name)
    }

    /// Registered type names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PropertyDef, SchemaBuilder};

    fn schema(name: &str) -> Arc<EntitySchema> {
        let mut builder = SchemaBuilder::new(name);
        builder.declare(PropertyDef::string("guid")).unwrap();
        builder.finalize()
    }

    #[test]
    fn register_and_get() {
        let mut registry = SchemaRegistry::new();
        registry.register(schema("person")).unwrap();

        assert!(registry.contains("person"));
        assert_eq!(registry.get("person").unwrap().name(), "person");
        assert!(registry.get("comment").is_none());
    }

    #[test]
    fn duplicate_type_rejected_and_original_kept() {
        let mut registry = SchemaRegistry::new();
        let original = schema("person");
        registry.register(original.clone()).unwrap();

        let err = registry.register(schema("person")).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateType(ref name) if name == "person"));
        assert!(Arc::ptr_eq(&registry.get("person").unwrap(), &original));
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = SchemaRegistry::new();
        registry.register(schema("status_message")).unwrap();
        registry.register(schema("location")).unwrap();
        registry.register(schema("person")).unwrap();

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, ["location", "person", "status_message"]);
    }
}
