//! # dfed
//!
//! Protocol core for federated social networking: schema-defined entities
//! with deterministic XML marshalling, rule-based validation, WebFinger
//! discovery documents, and the extension hooks a host application wires
//! at startup.
//!
//! This crate is the facade; the layers live in their own crates and are
//! re-exported here:
//!
//! - `dfed-core`: identifier newtypes, canonical timestamps, XML plumbing.
//! - `dfed-entity`: property schemas, the immutable [`Entity`] value, the
//!   built-in entity catalog and wire marshalling.
//! - `dfed-validation`: pure predicate rules bound per entity type.
//! - `dfed-discovery`: WebFinger/XRD account documents.
//! - [`callbacks`] and [`config`] (this crate): the host-facing seam and
//!   fail-fast startup validation.
//!
//! ## Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use dfed::{Entity, SchemaRegistry, person_validator};
//!
//! let registry = SchemaRegistry::builtin()?;
//! let profile = Entity::construct(
//!     registry.get("profile").unwrap(),
//!     BTreeMap::from([("author".to_string(), "alice@pod.example".into())]),
//! )?;
//! let person = Entity::construct(
//!     registry.get("person").unwrap(),
//!     BTreeMap::from([
//!         ("guid".to_string(), "0123456789abcdef".into()),
//!         ("diaspora_id".to_string(), "alice@pod.example".into()),
//!         ("url".to_string(), "https://pod.example/".into()),
//!         ("profile".to_string(), profile.into()),
//!         (
//!             "exported_key".to_string(),
//!             "-----BEGIN PUBLIC KEY-----\nABCDEF==\n-----END PUBLIC KEY-----".into(),
//!         ),
//!     ]),
//! )?;
//!
//! assert!(person_validator().validate(&person).is_ok());
//! let xml = person.to_xml();
//! assert_eq!(Entity::from_xml(registry.get("person").unwrap(), &xml)?, person);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod callbacks;
pub mod config;

pub use callbacks::{CallbackError, Callbacks, Hook, HookEvent, HookHandler, HookReply};
pub use config::{ConfigurationError, Federation, FederationBuilder};

pub use dfed_core::{DiasporaId, Guid, IdentityError, Timestamp, XmlError, XmlNode};
pub use dfed_discovery::{DiscoveryError, WebFinger, XrdDocument, XrdLink};
pub use dfed_entity::{
    Entity, EntityError, EntitySchema, ParsingError, PropertyDef, PropertyKind, PropertyValue,
    SchemaBuilder, SchemaError, SchemaRegistry, Violation,
};
pub use dfed_validation::{
    person_validator, photo_validator, profile_validator, status_message_validator, Rule,
    RuleFailure, ValidationError, ValidationReport, Validator,
};
