//! # Built-in Validator Catalog
//!
//! The rule bindings every pod applies before federating an entity. These
//! mirror the entity catalog in `dfed-entity`: the person entity names its
//! handle property `diaspora_id`, the post-type entities name theirs
//! `author`, and both travel on the wire as `diaspora_handle`.

use crate::rules::Rule;
use crate::validator::Validator;

/// Validator for the `person` entity.
///
/// Five bindings: guid shape, handle shape, absolute profile URL, presence
/// of the nested profile and a decodable PEM public key.
pub fn person_validator() -> Validator {
    Validator::new("person")
        .rule("guid", Rule::Guid)
        .rule("diaspora_id", Rule::DiasporaId)
        .rule("url", Rule::Uri)
        .rule("profile", Rule::NotNil)
        .rule("exported_key", Rule::PublicKey)
}

/// Validator for the `profile` entity.
pub fn profile_validator() -> Validator {
    Validator::new("profile").rule("author", Rule::DiasporaId)
}

/// Validator for the `status_message` entity.
pub fn status_message_validator() -> Validator {
    Validator::new("status_message")
        .rule("author", Rule::DiasporaId)
        .rule("guid", Rule::Guid)
}

/// Validator for the `photo` entity.
pub fn photo_validator() -> Validator {
    Validator::new("photo")
        .rule("guid", Rule::Guid)
        .rule("author", Rule::DiasporaId)
        .rule("remote_photo_path", Rule::NotNil)
        .rule("status_message_guid", Rule::Guid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use dfed_entity::{Entity, PropertyValue, SchemaRegistry};

    fn construct(type_name: &str, pairs: &[(&str, PropertyValue)]) -> Entity {
        let registry = SchemaRegistry::builtin().unwrap();
        let values: BTreeMap<String, PropertyValue> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Entity::construct(registry.get(type_name).unwrap(), values).unwrap()
    }

    fn good_profile() -> Entity {
        construct("profile", &[("author", "alice@pod.example".into())])
    }

    /// The five person fields, each overridable to a broken value.
    fn person_with(overrides: &[(&str, PropertyValue)]) -> Entity {
        let mut pairs: Vec<(&str, PropertyValue)> = vec![
            ("guid", "0123456789abcdef".into()),
            ("diaspora_id", "alice@pod.example".into()),
            ("url", "https://pod.example/".into()),
            ("profile", good_profile().into()),
            (
                "exported_key",
                "-----BEGIN PUBLIC KEY-----\nABCDEF==\n-----END PUBLIC KEY-----".into(),
            ),
        ];
        for (name, value) in overrides {
            if let Some(slot) = pairs.iter_mut().find(|(n, _)| n == name) {
                slot.1 = value.clone();
            }
        }
        construct("person", &pairs)
    }

    fn person_without_profile() -> Entity {
        construct(
            "person",
            &[
                ("guid", "0123456789abcdef".into()),
                ("diaspora_id", "alice@pod.example".into()),
                ("url", "https://pod.example/".into()),
                (
                    "exported_key",
                    "-----BEGIN PUBLIC KEY-----\nABCDEF==\n-----END PUBLIC KEY-----".into(),
                ),
            ],
        )
    }

    #[test]
    fn well_formed_person_passes_all_five_bindings() {
        let report = person_validator().validate(&person_with(&[]));
        assert!(report.is_ok(), "unexpected failures: {:?}", report.failures());
    }

    #[test]
    fn breaking_one_person_field_fails_exactly_that_binding() {
        let cases: Vec<(&str, Entity, Rule)> = vec![
            ("guid", person_with(&[("guid", "".into())]), Rule::Guid),
            (
                "diaspora_id",
                person_with(&[("diaspora_id", "not a handle".into())]),
                Rule::DiasporaId,
            ),
            ("url", person_with(&[("url", "not a url".into())]), Rule::Uri),
            ("profile", person_without_profile(), Rule::NotNil),
            (
                "exported_key",
                person_with(&[("exported_key", "garbage".into())]),
                Rule::PublicKey,
            ),
        ];

        for (property, entity, expected_rule) in cases {
            let report = person_validator().validate(&entity);
            assert_eq!(
                report.failures().len(),
                1,
                "breaking {property} should fail exactly one binding, got {:?}",
                report.failures()
            );
            assert_eq!(report.failures()[0].property(), property);
            assert_eq!(report.failures()[0].rule(), expected_rule);
        }
    }

    #[test]
    fn profile_validator_checks_the_author_handle() {
        assert!(profile_validator().validate(&good_profile()).is_ok());

        let bad = construct("profile", &[("author", "@@".into())]);
        let report = profile_validator().validate(&bad);
        assert_eq!(report.failures().len(), 1);
        assert_eq!(report.failures()[0].property(), "author");
    }

    #[test]
    fn status_message_validator_checks_author_and_guid() {
        let created_at = dfed_core::Timestamp::parse("2026-04-10T08:30:00Z").unwrap();
        let good = construct(
            "status_message",
            &[
                ("author", "alice@pod.example".into()),
                ("guid", "fedcba9876543210".into()),
                ("created_at", created_at.clone().into()),
                ("raw_message", "hello".into()),
                ("photos", Vec::<Entity>::new().into()),
            ],
        );
        assert!(status_message_validator().validate(&good).is_ok());

        let bad = construct(
            "status_message",
            &[
                ("author", "nope".into()),
                ("guid", "xyz".into()),
                ("created_at", created_at.into()),
                ("raw_message", "hello".into()),
                ("photos", Vec::<Entity>::new().into()),
            ],
        );
        let report = status_message_validator().validate(&bad);
        assert_eq!(report.failures().len(), 2);
    }

    #[test]
    fn photo_validator_covers_the_linking_guid() {
        let created_at = dfed_core::Timestamp::parse("2026-04-10T08:30:00Z").unwrap();
        let bad = construct(
            "photo",
            &[
                ("guid", "11112222333344445555".into()),
                ("author", "alice@pod.example".into()),
                ("created_at", created_at.into()),
                ("remote_photo_path", "https://pod.example/uploads/".into()),
                ("remote_photo_name", "a.jpg".into()),
                ("status_message_guid", "not-hex".into()),
                ("height", 1u64.into()),
                ("width", 1u64.into()),
            ],
        );
        let report = photo_validator().validate(&bad);
        assert_eq!(report.failures().len(), 1);
        assert_eq!(report.failures()[0].property(), "status_message_guid");
    }
}
