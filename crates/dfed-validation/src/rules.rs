//! # Validation Rules
//!
//! The fixed table of pure predicate rules a validator can bind to a
//! property. Rules inspect a single property value and return pass or fail;
//! they never look at sibling properties and never mutate anything, so a
//! validator run is just a fold over its rule list.
//!
//! An absent value fails every rule. Optional-and-absent properties are
//! simply not bound to rules by the built-in validators.

use base64::{
    alphabet,
    engine::general_purpose::{GeneralPurpose, PAD},
    Engine,
};
use serde::{Deserialize, Serialize};
use url::Url;

use dfed_core::{DiasporaId, Guid};
use dfed_entity::PropertyValue;

/// A pure predicate over one property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rule {
    /// The value must be present.
    NotNil,
    /// The value must be a well-formed entity GUID.
    Guid,
    /// The value must be a well-formed `user@host` federation identifier.
    DiasporaId,
    /// The value must parse as an absolute URL with a host.
    Uri,
    /// The value must be a PEM public key with a decodable base64 body.
    PublicKey,
}

impl Rule {
    /// Rule name as it appears in failure reports.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::NotNil => "not_nil",
            Rule::Guid => "guid",
            Rule::DiasporaId => "diaspora_id",
            Rule::Uri => "URI",
            Rule::PublicKey => "public_key",
        }
    }

    /// Apply the rule to a property value. `None` (absent) fails every rule.
    pub fn check(&self, value: Option<&PropertyValue>) -> bool {
        let Some(value) = value else { return false };
        match self {
            Rule::NotNil => true,
            Rule::Guid => as_text(value).is_some_and(Guid::is_valid),
            Rule::DiasporaId => as_text(value).is_some_and(DiasporaId::is_valid),
            Rule::Uri => as_text(value).is_some_and(is_absolute_url),
            Rule::PublicKey => as_text(value).is_some_and(is_pem_public_key),
        }
    }
}

fn as_text(value: &PropertyValue) -> Option<&str> {
    value.as_str()
}

fn is_absolute_url(text: &str) -> bool {
    Url::parse(text).map(|url| url.has_host()).unwrap_or(false)
}

/// Accepts the `PUBLIC KEY` and `RSA PUBLIC KEY` armors. The BEGIN and END
/// lines must match, and the body between them must be non-empty base64
/// with canonical padding.
fn is_pem_public_key(text: &str) -> bool {
    const ARMORS: [(&str, &str); 2] = [
        ("-----BEGIN PUBLIC KEY-----", "-----END PUBLIC KEY-----"),
        ("-----BEGIN RSA PUBLIC KEY-----", "-----END RSA PUBLIC KEY-----"),
    ];
    // Deployed pods publish keys whose final quantum carries nonzero
    // trailing bits; padding stays mandatory.
    const BODY_BASE64: GeneralPurpose =
        GeneralPurpose::new(&alphabet::STANDARD, PAD.with_decode_allow_trailing_bits(true));

    let trimmed = text.trim();
    for (begin, end) in ARMORS {
        if let Some(rest) = trimmed.strip_prefix(begin) {
            let Some(body) = rest.strip_suffix(end) else {
                return false;
            };
            let body: String = body.split_whitespace().collect();
            if body.is_empty() {
                return false;
            }
            return BODY_BASE64
                .decode(body.as_bytes())
                .map(|bytes| !bytes.is_empty())
                .unwrap_or(false);
        }
    }
    false
}
