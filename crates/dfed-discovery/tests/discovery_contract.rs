//! # Discovery Document Contract Tests
//!
//! These integration tests pin the WebFinger wire contract end to end:
//!
//! 1. A full account data set produces a document whose serialized form
//!    parses back with every field byte-equal to the input.
//! 2. The rendered XML is pinned byte-for-byte, legacy relations included.
//! 3. Removing the subject, the alias, or any one of the seven required
//!    links makes the reader reject the whole document.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine};

use dfed_discovery::{
    DiscoveryError, WebFinger, REL_ATOM, REL_GUID, REL_HCARD, REL_PROFILE, REL_PUBKEY, REL_SALMON,
    REL_SEED,
};

const PEM: &str = "-----BEGIN PUBLIC KEY-----\nABCDEF==\n-----END PUBLIC KEY-----";

fn account_data() -> BTreeMap<String, String> {
    [
        ("acct_uri", "acct:user@server.example"),
        ("alias_url", "https://server.example/people/0123456789abcdef"),
        ("hcard_url", "https://server.example/hcard/users/0123456789abcdef"),
        ("seed_url", "https://server.example/"),
        ("guid", "0123456789abcdef"),
        ("profile_url", "https://server.example/u/user"),
        ("atom_url", "https://server.example/public/user.atom"),
        ("salmon_url", "https://server.example/receive/users/0123456789abcdef"),
        ("pubkey", PEM),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[test]
fn account_document_roundtrips_byte_equal() {
    let published = WebFinger::from_person(account_data()).unwrap();
    let read_back = WebFinger::from_xml(&published.to_xml()).unwrap();

    assert_eq!(read_back, published);
    assert_eq!(read_back.acct_uri(), "acct:user@server.example");
    assert_eq!(read_back.alias_url(), "https://server.example/people/0123456789abcdef");
    assert_eq!(
        read_back.hcard_url(),
        "https://server.example/hcard/users/0123456789abcdef"
    );
    assert_eq!(read_back.seed_url(), "https://server.example/");
    assert_eq!(read_back.guid(), "0123456789abcdef");
    assert_eq!(read_back.profile_url(), "https://server.example/u/user");
    assert_eq!(read_back.atom_url(), "https://server.example/public/user.atom");
    assert_eq!(
        read_back.salmon_url(),
        "https://server.example/receive/users/0123456789abcdef"
    );
    assert_eq!(read_back.pubkey(), PEM);
}

#[test]
fn rendered_document_is_pinned_byte_for_byte() {
    let xml = WebFinger::from_person(account_data()).unwrap().to_xml();
    let expected = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <XRD xmlns=\"http://docs.oasis-open.org/ns/xri/xrd-1.0\">\n\
         \x20 <Subject>acct:user@server.example</Subject>\n\
         \x20 <Alias>https://server.example/people/0123456789abcdef</Alias>\n\
         \x20 <Link rel=\"http://microformats.org/profile/hcard\" type=\"text/html\" href=\"https://server.example/hcard/users/0123456789abcdef\"/>\n\
         \x20 <Link rel=\"http://joindiaspora.com/seed_location\" type=\"text/html\" href=\"https://server.example/\"/>\n\
         \x20 <Link rel=\"http://joindiaspora.com/guid\" type=\"text/html\" href=\"0123456789abcdef\"/>\n\
         \x20 <Link rel=\"http://webfinger.net/rel/profile-page\" type=\"text/html\" href=\"https://server.example/u/user\"/>\n\
         \x20 <Link rel=\"http://schemas.google.com/g/2010#updates-from\" type=\"application/atom+xml\" href=\"https://server.example/public/user.atom\"/>\n\
         \x20 <Link rel=\"salmon\" href=\"https://server.example/receive/users/0123456789abcdef\"/>\n\
         \x20 <Link rel=\"diaspora-public-key\" type=\"RSA\" href=\"{pubkey_b64}\"/>\n\
         </XRD>\n",
        pubkey_b64 = STANDARD.encode(PEM.as_bytes()),
    );
    assert_eq!(xml, expected);
}

#[test]
fn removing_any_required_link_rejects_the_document() {
    let xml = WebFinger::from_person(account_data()).unwrap().to_xml();

    for rel in [
        REL_HCARD, REL_SEED, REL_GUID, REL_PROFILE, REL_ATOM, REL_SALMON, REL_PUBKEY,
    ] {
        let without: String = xml
            .lines()
            .filter(|line| !line.contains(&format!("rel=\"{rel}\"")))
            .map(|line| format!("{line}\n"))
            .collect();

        let err = WebFinger::from_xml(&without).unwrap_err();
        assert!(
            matches!(err, DiscoveryError::MissingRelation { rel: ref missing } if missing == rel),
            "dropping {rel} should be rejected as a missing relation"
        );
    }
}

#[test]
fn removing_subject_or_alias_rejects_the_document() {
    let xml = WebFinger::from_person(account_data()).unwrap().to_xml();

    let without_subject: String = xml
        .lines()
        .filter(|line| !line.contains("<Subject>"))
        .map(|line| format!("{line}\n"))
        .collect();
    assert!(matches!(
        WebFinger::from_xml(&without_subject).unwrap_err(),
        DiscoveryError::MissingSubject
    ));

    let without_alias: String = xml
        .lines()
        .filter(|line| !line.contains("<Alias>"))
        .map(|line| format!("{line}\n"))
        .collect();
    assert!(matches!(
        WebFinger::from_xml(&without_alias).unwrap_err(),
        DiscoveryError::MissingAliases
    ));
}

#[test]
fn extra_links_and_elements_are_tolerated() {
    let xml = WebFinger::from_person(account_data()).unwrap().to_xml();
    let with_extras = xml.replace(
        "</XRD>",
        "  <Link rel=\"http://ostatus.org/schema/1.0/subscribe\" href=\"https://server.example/s?u={uri}\"/>\n\
         \x20 <Expires>2030-01-01T00:00:00Z</Expires>\n\
         </XRD>",
    );
    let read_back = WebFinger::from_xml(&with_extras).unwrap();
    assert_eq!(read_back, WebFinger::from_person(account_data()).unwrap());
}
