//! # Entity Marshalling Round-Trip Tests
//!
//! These integration tests verify the marshalling law for the built-in
//! catalog: for every entity type and any accepted value set,
//! `Entity::from_xml(schema, &entity.to_xml())` yields an entity equal to
//! the original.
//!
//! ## How it works
//!
//! 1. Full instances of every catalog type are constructed through the
//!    public all-or-nothing constructor.
//! 2. Each is serialized, re-parsed and compared for equality, including
//!    collections with zero, one and many members.
//! 3. A pinned byte-for-byte vector guards the canonical element order and
//!    the legacy `diaspora_handle` wire renames.
//! 4. Property tests push arbitrary printable text through the escape
//!    layer.

use std::collections::BTreeMap;
use std::sync::Arc;

use proptest::prelude::*;

use dfed_core::Timestamp;
use dfed_entity::{Entity, EntitySchema, PropertyValue, SchemaRegistry};

fn registry() -> SchemaRegistry {
    SchemaRegistry::builtin().expect("built-in catalog must assemble")
}

fn schema(name: &str) -> Arc<EntitySchema> {
    registry().get(name).expect("catalog type must be registered")
}

fn values(pairs: &[(&str, PropertyValue)]) -> BTreeMap<String, PropertyValue> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn created_at() -> Timestamp {
    Timestamp::parse("2026-04-10T08:30:00Z").expect("fixture timestamp parses")
}

fn a_profile() -> Entity {
    Entity::construct(
        schema("profile"),
        values(&[
            ("author", "alice@pod.example".into()),
            ("first_name", "Alice".into()),
            ("bio", "Federation maintainer & <xml> fan".into()),
            ("searchable", true.into()),
            ("nsfw", false.into()),
            ("tag_string", "#federation #rust".into()),
        ]),
    )
    .expect("profile fixture constructs")
}

fn a_person() -> Entity {
    Entity::construct(
        schema("person"),
        values(&[
            ("guid", "0123456789abcdef".into()),
            ("diaspora_id", "alice@pod.example".into()),
            ("url", "https://pod.example/".into()),
            ("profile", a_profile().into()),
            (
                "exported_key",
                "-----BEGIN PUBLIC KEY-----\nABCDEF==\n-----END PUBLIC KEY-----".into(),
            ),
        ]),
    )
    .expect("person fixture constructs")
}

fn a_photo(guid: &str) -> Entity {
    Entity::construct(
        schema("photo"),
        values(&[
            ("guid", guid.into()),
            ("author", "alice@pod.example".into()),
            ("public", true.into()),
            ("created_at", created_at().into()),
            ("remote_photo_path", "https://pod.example/uploads/".into()),
            ("remote_photo_name", "f1db1d1bed1d.jpg".into()),
            ("status_message_guid", "fedcba9876543210".into()),
            ("height", 480u64.into()),
            ("width", 640u64.into()),
        ]),
    )
    .expect("photo fixture constructs")
}

fn a_location() -> Entity {
    Entity::construct(
        schema("location"),
        values(&[
            ("address", "Vienna, Austria".into()),
            ("lat", "48.2082".into()),
            ("lng", "16.3738".into()),
        ]),
    )
    .expect("location fixture constructs")
}

fn a_status_message(photos: Vec<Entity>) -> Entity {
    Entity::construct(
        schema("status_message"),
        values(&[
            ("author", "alice@pod.example".into()),
            ("guid", "fedcba9876543210".into()),
            ("created_at", created_at().into()),
            ("raw_message", "Greetings from the federation!".into()),
            ("photos", photos.into()),
            ("location", a_location().into()),
            ("public", true.into()),
        ]),
    )
    .expect("status_message fixture constructs")
}

fn roundtrip(entity: &Entity) -> Entity {
    Entity::from_xml(schema(entity.type_name()), &entity.to_xml())
        .expect("serialized entity must parse back")
}

#[test]
fn every_catalog_type_roundtrips() {
    let fixtures = [
        a_location(),
        a_photo("11112222333344445555"),
        a_profile(),
        a_person(),
        a_status_message(vec![a_photo("11112222333344445555")]),
    ];
    for entity in &fixtures {
        assert_eq!(
            &roundtrip(entity),
            entity,
            "round-trip mismatch for {}",
            entity.type_name()
        );
    }
}

#[test]
fn status_message_roundtrips_with_zero_one_many_photos() {
    for count in [0, 1, 5] {
        let photos: Vec<Entity> = (0..count)
            .map(|i| a_photo(&format!("{i:016x}")))
            .collect();
        let message = a_status_message(photos);
        let recovered = roundtrip(&message);
        assert_eq!(recovered, message, "round-trip mismatch with {count} photos");

        let Some(PropertyValue::Collection(items)) = recovered.get("photos") else {
            panic!("photos slot missing after round-trip");
        };
        assert_eq!(items.len(), count);
    }
}

#[test]
fn person_serializes_to_pinned_canonical_bytes() {
    let person = Entity::construct(
        schema("person"),
        values(&[
            ("guid", "0123456789abcdef".into()),
            ("diaspora_id", "alice@pod.example".into()),
            ("url", "https://pod.example/".into()),
            (
                "profile",
                Entity::construct(
                    schema("profile"),
                    values(&[("author", "alice@pod.example".into())]),
                )
                .unwrap()
                .into(),
            ),
            ("exported_key", "KEY".into()),
        ]),
    )
    .unwrap();

    // Element order is schema declaration order; handles travel under the
    // legacy diaspora_handle name; defaulted booleans are always emitted.
    assert_eq!(
        person.to_xml(),
        "<person>\n\
         \x20 <guid>0123456789abcdef</guid>\n\
         \x20 <diaspora_handle>alice@pod.example</diaspora_handle>\n\
         \x20 <url>https://pod.example/</url>\n\
         \x20 <profile>\n\
         \x20   <diaspora_handle>alice@pod.example</diaspora_handle>\n\
         \x20   <searchable>true</searchable>\n\
         \x20   <nsfw>false</nsfw>\n\
         \x20 </profile>\n\
         \x20 <exported_key>KEY</exported_key>\n\
         </person>\n"
    );
}

#[test]
fn equal_entities_serialize_to_identical_bytes() {
    let first = a_status_message(vec![a_photo("aaaabbbbccccdddd")]);
    let second = a_status_message(vec![a_photo("aaaabbbbccccdddd")]);
    assert_eq!(first, second);
    assert_eq!(first.to_xml(), second.to_xml());
}

#[test]
fn decode_tolerates_elements_from_newer_pods() {
    let xml = "<location>\
               <address>Vienna, Austria</address>\
               <lat>48.2082</lat>\
               <lng>16.3738</lng>\
               <altitude_m>171</altitude_m>\
               </location>";
    let decoded = Entity::from_xml(schema("location"), xml).expect("unknown elements are skipped");
    assert_eq!(decoded, a_location());
}

#[test]
fn markup_significant_text_survives_the_wire() {
    let message = Entity::construct(
        schema("status_message"),
        values(&[
            ("author", "alice@pod.example".into()),
            ("guid", "fedcba9876543210".into()),
            ("created_at", created_at().into()),
            ("raw_message", "<b>bold</b> & \"quoted\" 'text'".into()),
            ("photos", Vec::<Entity>::new().into()),
        ]),
    )
    .unwrap();

    let xml = message.to_xml();
    assert!(xml.contains("&lt;b&gt;bold&lt;/b&gt; &amp;"));
    assert_eq!(roundtrip(&message), message);
}

proptest! {
    #[test]
    fn arbitrary_printable_message_text_roundtrips(text in "[ -~]*") {
        let message = Entity::construct(
            schema("status_message"),
            values(&[
                ("author", "alice@pod.example".into()),
                ("guid", "fedcba9876543210".into()),
                ("created_at", created_at().into()),
                ("raw_message", text.as_str().into()),
                ("photos", Vec::<Entity>::new().into()),
            ]),
        )
        .unwrap();
        prop_assert_eq!(roundtrip(&message), message);
    }

    #[test]
    fn arbitrary_printable_location_fields_roundtrip(
        address in "[ -~]*",
        lat in "-?[0-9]{1,2}\\.[0-9]{1,6}",
        lng in "-?[0-9]{1,3}\\.[0-9]{1,6}",
    ) {
        let location = Entity::construct(
            schema("location"),
            values(&[
                ("address", address.as_str().into()),
                ("lat", lat.as_str().into()),
                ("lng", lng.as_str().into()),
            ]),
        )
        .unwrap();
        prop_assert_eq!(roundtrip(&location), location);
    }
}
