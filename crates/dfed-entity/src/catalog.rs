//! # Built-in Entity Catalog
//!
//! Schema definitions for the federation entities every pod must speak:
//! `location`, `photo`, `profile`, `person` and `status_message`. The wire
//! names here are load-bearing; remote pods reject documents whose elements
//! are spelled differently, so the `diaspora_handle` renames are kept even
//! though the in-memory properties use the modern names.
//!
//! ## Design
//!
//! Each schema function is pure and takes the schemas it nests as arguments,
//! which keeps the dependency order (`location` and `photo` before
//! `status_message`, `profile` before `person`) visible at the call site.
//! [`SchemaRegistry::builtin`] wires the whole catalog together.

use std::sync::Arc;

use crate::registry::SchemaRegistry;
use crate::schema::{EntitySchema, PropertyDef, SchemaBuilder, SchemaError};

/// Schema for a geographic location attached to a post.
pub fn location_schema() -> Result<Arc<EntitySchema>, SchemaError> {
    let mut builder = SchemaBuilder::new("location");
    builder.declare(PropertyDef::string("address"))?;
    builder.declare(PropertyDef::string("lat"))?;
    builder.declare(PropertyDef::string("lng"))?;
    Ok(builder.finalize())
}

/// Schema for a photo, standalone or attached to a status message.
pub fn photo_schema() -> Result<Arc<EntitySchema>, SchemaError> {
    let mut builder = SchemaBuilder::new("photo");
    builder.declare(PropertyDef::string("guid"))?;
    builder.declare(PropertyDef::string("author").xml_name("diaspora_handle"))?;
    builder.declare(PropertyDef::boolean("public").with_default(false))?;
    builder.declare(PropertyDef::timestamp("created_at"))?;
    builder.declare(PropertyDef::string("remote_photo_path"))?;
    builder.declare(PropertyDef::string("remote_photo_name"))?;
    builder.declare(PropertyDef::string("text").optional())?;
    builder.declare(PropertyDef::string("status_message_guid"))?;
    builder.declare(PropertyDef::unsigned("height"))?;
    builder.declare(PropertyDef::unsigned("width"))?;
    Ok(builder.finalize())
}

/// Schema for a person's profile document.
pub fn profile_schema() -> Result<Arc<EntitySchema>, SchemaError> {
    let mut builder = SchemaBuilder::new("profile");
    builder.declare(PropertyDef::string("author").xml_name("diaspora_handle"))?;
    builder.declare(PropertyDef::string("first_name").optional())?;
    builder.declare(PropertyDef::string("last_name").optional())?;
    builder.declare(PropertyDef::string("image_url").optional())?;
    builder.declare(PropertyDef::string("image_url_medium").optional())?;
    builder.declare(PropertyDef::string("image_url_small").optional())?;
    builder.declare(PropertyDef::string("birthday").optional())?;
    builder.declare(PropertyDef::string("gender").optional())?;
    builder.declare(PropertyDef::string("bio").optional())?;
    builder.declare(PropertyDef::string("location").optional())?;
    builder.declare(PropertyDef::boolean("searchable").with_default(true))?;
    builder.declare(PropertyDef::boolean("nsfw").with_default(false))?;
    builder.declare(PropertyDef::string("tag_string").optional())?;
    Ok(builder.finalize())
}

/// Schema for a person, the discovery root entity.
///
/// Nests the given `profile` schema. The profile is optional at the schema
/// layer so that persons sourced from storage hooks can be represented
/// before federation; the person validator is what enforces its presence.
pub fn person_schema(profile: Arc<EntitySchema>) -> Result<Arc<EntitySchema>, SchemaError> {
    let mut builder = SchemaBuilder::new("person");
    builder.declare(PropertyDef::string("guid"))?;
    builder.declare(PropertyDef::string("diaspora_id").xml_name("diaspora_handle"))?;
    builder.declare(PropertyDef::string("url"))?;
    builder.declare(PropertyDef::entity("profile", profile).optional())?;
    builder.declare(PropertyDef::string("exported_key"))?;
    Ok(builder.finalize())
}

/// Schema for a status message with optional attached photos and location.
pub fn status_message_schema(
    photo: Arc<EntitySchema>,
    location: Arc<EntitySchema>,
) -> Result<Arc<EntitySchema>, SchemaError> {
    let mut builder = SchemaBuilder::new("status_message");
    builder.declare(PropertyDef::string("author").xml_name("diaspora_handle"))?;
    builder.declare(PropertyDef::string("guid"))?;
    builder.declare(PropertyDef::timestamp("created_at"))?;
    builder.declare(PropertyDef::string("provider_display_name").optional())?;
    builder.declare(PropertyDef::string("raw_message"))?;
    builder.declare(PropertyDef::collection("photos", photo).xml_name("photo"))?;
    builder.declare(PropertyDef::entity("location", location).optional())?;
    builder.declare(PropertyDef::boolean("public").with_default(false))?;
    Ok(builder.finalize())
}

impl SchemaRegistry {
    /// Build a registry holding the complete built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if any schema declares a duplicate property
    /// or the catalog registers a type name twice. With the definitions in
    /// this module that cannot happen, but the registry API reports it
    /// rather than panicking.
    pub fn builtin() -> Result<SchemaRegistry, SchemaError> {
        let location = location_schema()?;
        let photo = photo_schema()?;
        let profile = profile_schema()?;
        let person = person_schema(profile.clone())?;
        let status_message = status_message_schema(photo.clone(), location.clone())?;

        let mut registry = SchemaRegistry::new();
        registry.register(location)?;
        registry.register(photo)?;
        registry.register(profile)?;
        registry.register(person)?;
        registry.register(status_message)?;
        Ok(registry)
    }
}
