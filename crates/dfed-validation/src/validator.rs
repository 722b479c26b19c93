//! # Validator Engine
//!
//! A validator is an ordered list of `(property, rule)` bindings for one
//! entity type. Running it applies every binding in declaration order and
//! reports every failure; there is no short-circuit, so a caller always
//! sees the complete picture in one pass.
//!
//! ## Design Decision
//!
//! Validation is separate from construction. Construction enforces the
//! schema contract (presence and kinds); validators enforce protocol
//! semantics (a guid that is actually a guid, a key that is actually a
//! key). An entity can therefore be constructed, inspected and persisted
//! even when it would not survive federation-side validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dfed_entity::Entity;

use crate::rules::Rule;

/// One failed `(property, rule)` binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFailure {
    property: String,
    rule: Rule,
}

impl RuleFailure {
    /// The property the rule was bound to.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// The rule that failed.
    pub fn rule(&self) -> Rule {
        self.rule
    }
}

impl fmt::Display for RuleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "property \"{}\" breaks rule {}", self.property, self.rule.name())
    }
}

/// Outcome of one validator run: every failed binding, in binding order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    entity_type: String,
    failures: Vec<RuleFailure>,
}

impl ValidationReport {
    /// Whether every binding passed.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// The entity type that was validated.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Every failed binding, in binding order.
    pub fn failures(&self) -> &[RuleFailure] {
        &self.failures
    }

    /// Convert into a `Result` for callers running validation inline.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] carrying every failure if any binding
    /// failed.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.failures.is_empty() {
            return Ok(());
        }
        Err(ValidationError {
            entity_type: self.entity_type,
            count: self.failures.len(),
            failures: self.failures,
        })
    }
}

/// An entity failed one or more validation rules.
#[derive(Error, Debug)]
#[error("entity \"{entity_type}\" failed validation: {count} rule failure(s)")]
pub struct ValidationError {
    entity_type: String,
    count: usize,
    failures: Vec<RuleFailure>,
}

impl ValidationError {
    /// Every failed binding, in binding order.
    pub fn failures(&self) -> &[RuleFailure] {
        &self.failures
    }
}

/// Ordered `(property, rule)` bindings for one entity type.
#[derive(Debug, Clone)]
pub struct Validator {
    entity_type: String,
    bindings: Vec<(String, Rule)>,
}

impl Validator {
    /// Create a validator with no bindings.
    pub fn new(entity_type: impl Into<String>) -> Self {
        Validator {
            entity_type: entity_type.into(),
            bindings: Vec::new(),
        }
    }

    /// Bind a rule to a property. Bindings run in the order they are added;
    /// a property may carry several rules.
    pub fn rule(mut self, property: impl Into<String>, rule: Rule) -> Self {
        self.bindings.push((property.into(), rule));
        self
    }

    /// The entity type this validator covers.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// The bindings, in run order.
    pub fn bindings(&self) -> &[(String, Rule)] {
        &self.bindings
    }

    /// Run every binding against the entity and report every failure.
    pub fn validate(&self, entity: &Entity) -> ValidationReport {
        let mut failures = Vec::new();
        for (property, rule) in &self.bindings {
            if !rule.check(entity.get(property)) {
                failures.push(RuleFailure {
                    property: property.clone(),
                    rule: *rule,
                });
            }
        }
        if !failures.is_empty() {
            tracing::warn!(
                entity_type = %self.entity_type,
                failures = failures.len(),
                "entity failed validation"
            );
        }
        ValidationReport {
            entity_type: self.entity_type.clone(),
            failures,
        }
    }
}
