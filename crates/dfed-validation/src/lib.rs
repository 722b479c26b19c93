//! # dfed-validation
//!
//! Rule-based validation for federation entities. A [`Validator`] binds an
//! ordered list of pure predicate [`Rule`]s to the properties of one entity
//! type; running it reports every failed binding in one pass, never just
//! the first.
//!
//! ## Validation
//!
//! Construction (in `dfed-entity`) enforces the schema contract; the
//! validators here enforce protocol semantics on top of it. The
//! [`catalog`] module carries the bindings every pod applies before
//! federating the built-in entity types.

pub mod catalog;
pub mod rules;
pub mod validator;

pub use catalog::{person_validator, photo_validator, profile_validator, status_message_validator};
pub use rules::Rule;
pub use validator::{RuleFailure, ValidationError, ValidationReport, Validator};
