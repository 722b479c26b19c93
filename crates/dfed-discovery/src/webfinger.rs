//! # WebFinger Account Documents
//!
//! The discovery document a pod serves for `acct:` lookups, and the reader
//! for documents served by remote pods. The wire format is XRD with the
//! legacy link relations the network has matched byte-for-byte since the
//! first federation release, in a fixed order; changing either would break
//! discovery against older pods.
//!
//! ## Validation
//!
//! Both directions are all-or-nothing. `from_person` demands exactly the
//! field set the account callback is contracted to supply, and `from_xml`
//! demands subject, alias and all seven required link relations; a document
//! missing any piece yields an error, never a partial result.

use std::collections::BTreeMap;

use base64::{
    alphabet,
    engine::general_purpose::{GeneralPurpose, PAD, STANDARD},
    Engine,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dfed_core::XmlError;

use crate::xrd::{XrdDocument, XrdLink};

/// hCard lookup, legacy relation.
pub const REL_HCARD: &str = "http://microformats.org/profile/hcard";
/// Pod root URL, legacy relation.
pub const REL_SEED: &str = "http://joindiaspora.com/seed_location";
/// Person GUID, legacy relation carrying the GUID itself as target.
pub const REL_GUID: &str = "http://joindiaspora.com/guid";
/// Human-visible profile page.
pub const REL_PROFILE: &str = "http://webfinger.net/rel/profile-page";
/// Public activity feed.
pub const REL_ATOM: &str = "http://schemas.google.com/g/2010#updates-from";
/// Salmon endpoint for direct delivery.
pub const REL_SALMON: &str = "salmon";
/// Public key, legacy relation carrying base64 of the PEM as target.
pub const REL_PUBKEY: &str = "diaspora-public-key";

/// The field set `from_person` requires, sorted.
const REQUIRED_FIELDS: [&str; 9] = [
    "acct_uri",
    "alias_url",
    "atom_url",
    "guid",
    "hcard_url",
    "profile_url",
    "pubkey",
    "salmon_url",
    "seed_url",
];

/// Errors raised while building or reading a discovery document.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The input was not well-formed XML.
    #[error("invalid discovery XML: {0}")]
    Xml(#[from] XmlError),

    /// `from_person` data does not carry exactly the contracted fields.
    #[error(
        "discovery data does not match the required field set: missing [{}], unexpected [{}]",
        .missing.join(", "),
        .unexpected.join(", ")
    )]
    FieldMismatch {
        /// The absent field names, sorted.
        missing: Vec<String>,
        /// The surplus field names, sorted.
        unexpected: Vec<String>,
    },

    /// The document has no `<Subject>`.
    #[error("discovery document has no subject")]
    MissingSubject,

    /// The document has no `<Alias>`.
    #[error("discovery document has no alias")]
    MissingAliases,

    /// The document has no `<Link>` at all.
    #[error("discovery document has no links")]
    MissingLinks,

    /// A required link relation is absent.
    #[error("discovery document has no link with rel \"{rel}\"")]
    MissingRelation {
        /// The absent relation.
        rel: String,
    },

    /// The public key link target is not base64 of PEM text.
    #[error("discovery document public key is invalid: {reason}")]
    InvalidPubkey {
        /// What the decoder rejected.
        reason: String,
    },
}

/// A complete WebFinger account document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebFinger {
    acct_uri: String,
    alias_url: String,
    hcard_url: String,
    seed_url: String,
    guid: String,
    profile_url: String,
    atom_url: String,
    salmon_url: String,
    pubkey: String,
}

impl WebFinger {
    /// Build a document from account data supplied by the person callback.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::FieldMismatch`] naming every absent field
    /// and every field outside the contract in one report. The field set
    /// must match exactly.
    pub fn from_person(mut data: BTreeMap<String, String>) -> Result<WebFinger, DiscoveryError> {
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|field| !data.contains_key(**field))
            .map(|field| field.to_string())
            .collect();
        let unexpected: Vec<String> = data
            .keys()
            .filter(|key| !REQUIRED_FIELDS.contains(&key.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(DiscoveryError::FieldMismatch { missing, unexpected });
        }

        // The check above guarantees every remove finds its field.
        let mut field = |name: &str| data.remove(name).unwrap_or_default();
        Ok(WebFinger {
            acct_uri: field("acct_uri"),
            alias_url: field("alias_url"),
            hcard_url: field("hcard_url"),
            seed_url: field("seed_url"),
            guid: field("guid"),
            profile_url: field("profile_url"),
            atom_url: field("atom_url"),
            salmon_url: field("salmon_url"),
            pubkey: field("pubkey"),
        })
    }

    /// Read a document served by a remote pod.
    ///
    /// Extra links and foreign elements are tolerated; anything required
    /// that is absent aborts the whole read.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] if the XML is malformed, subject, alias
    /// or the whole link section is missing, any of the seven required
    /// relations is absent, or the public key target does not decode to
    /// PEM text.
    pub fn from_xml(input: &str) -> Result<WebFinger, DiscoveryError> {
        let document = XrdDocument::parse(input)?;

        let acct_uri = document
            .subject()
            .ok_or(DiscoveryError::MissingSubject)?
            .to_string();
        let alias_url = document
            .aliases()
            .first()
            .ok_or(DiscoveryError::MissingAliases)?
            .clone();
        if document.links().is_empty() {
            return Err(DiscoveryError::MissingLinks);
        }

        let link = |rel: &str| -> Result<String, DiscoveryError> {
            document
                .link(rel)
                .map(|link| link.href().to_string())
                .ok_or_else(|| DiscoveryError::MissingRelation {
                    rel: rel.to_string(),
                })
        };

        let hcard_url = link(REL_HCARD)?;
        let seed_url = link(REL_SEED)?;
        let guid = link(REL_GUID)?;
        let profile_url = link(REL_PROFILE)?;
        let atom_url = link(REL_ATOM)?;
        let salmon_url = link(REL_SALMON)?;
        let pubkey = decode_pubkey(&link(REL_PUBKEY)?)?;

        tracing::debug!(subject = %acct_uri, "read webfinger document");
        Ok(WebFinger {
            acct_uri,
            alias_url,
            hcard_url,
            seed_url,
            guid,
            profile_url,
            atom_url,
            salmon_url,
            pubkey,
        })
    }

    /// Assemble the XRD document: subject, one alias, then the seven links
    /// in their fixed order.
    pub fn to_xrd(&self) -> XrdDocument {
        let mut document = XrdDocument::new();
        document.set_subject(&self.acct_uri);
        document.push_alias(&self.alias_url);
        document.push_link(XrdLink::new(REL_HCARD, &self.hcard_url).media_type("text/html"));
        document.push_link(XrdLink::new(REL_SEED, &self.seed_url).media_type("text/html"));
        document.push_link(XrdLink::new(REL_GUID, &self.guid).media_type("text/html"));
        document.push_link(XrdLink::new(REL_PROFILE, &self.profile_url).media_type("text/html"));
        document
            .push_link(XrdLink::new(REL_ATOM, &self.atom_url).media_type("application/atom+xml"));
        document.push_link(XrdLink::new(REL_SALMON, &self.salmon_url));
        document.push_link(
            XrdLink::new(REL_PUBKEY, STANDARD.encode(self.pubkey.as_bytes())).media_type("RSA"),
        );
        document
    }

    /// Render the account document, XML declaration included.
    pub fn to_xml(&self) -> String {
        self.to_xrd().to_xml()
    }

    /// The `acct:` subject URI.
    pub fn acct_uri(&self) -> &str {
        &self.acct_uri
    }

    /// The person URL alias.
    pub fn alias_url(&self) -> &str {
        &self.alias_url
    }

    /// The hCard lookup URL.
    pub fn hcard_url(&self) -> &str {
        &self.hcard_url
    }

    /// The pod root URL.
    pub fn seed_url(&self) -> &str {
        &self.seed_url
    }

    /// The person GUID.
    pub fn guid(&self) -> &str {
        &self.guid
    }

    /// The profile page URL.
    pub fn profile_url(&self) -> &str {
        &self.profile_url
    }

    /// The atom feed URL.
    pub fn atom_url(&self) -> &str {
        &self.atom_url
    }

    /// The salmon endpoint URL.
    pub fn salmon_url(&self) -> &str {
        &self.salmon_url
    }

    /// The PEM public key text.
    pub fn pubkey(&self) -> &str {
        &self.pubkey
    }
}

// Emission stays canonical (`STANDARD`), but reads must tolerate nonzero
// trailing bits in the final quantum; pods publish such targets.
const PUBKEY_BASE64: GeneralPurpose =
    GeneralPurpose::new(&alphabet::STANDARD, PAD.with_decode_allow_trailing_bits(true));

fn decode_pubkey(encoded: &str) -> Result<String, DiscoveryError> {
    let bytes = PUBKEY_BASE64
        .decode(encoded.as_bytes())
        .map_err(|err| DiscoveryError::InvalidPubkey {
            reason: err.to_string(),
        })?;
    String::from_utf8(bytes).map_err(|_| DiscoveryError::InvalidPubkey {
        reason: "decoded key is not UTF-8 text".to_string(),
    })
}
