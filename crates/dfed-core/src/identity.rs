//! # Identity Newtypes
//!
//! Domain-primitive newtypes for the two identifiers the federation protocol
//! threads through every message: the entity [`Guid`] and the account
//! [`DiasporaId`]. Each is a distinct type — you cannot pass a guid where an
//! account identifier is expected.
//!
//! ## Validation
//!
//! Both identifiers validate format at construction time and store the value
//! exactly as given. Wire codecs and validation rules reuse these checks, so
//! there is a single definition of each shape in the workspace.

use serde::{Deserialize, Serialize};

use crate::error::IdentityError;

// ---------------------------------------------------------------------------
// Guid
// ---------------------------------------------------------------------------

/// A globally unique entity identifier.
///
/// Every federated entity (post, photo, person) carries a guid that is stable
/// across all pods. The protocol shape is hexadecimal, at least 16 characters.
///
/// # Validation
///
/// - Must be at least 16 characters
/// - Every character must be an ASCII hex digit (`0-9`, `a-f`, `A-F`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Guid(String);

impl Guid {
    /// Create a guid from a string, validating the hex shape.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidGuid`] if the string is shorter than
    /// 16 characters or contains a non-hex character.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityError> {
        let s = value.into();
        if Self::is_valid(&s) {
            Ok(Self(s))
        } else {
            Err(IdentityError::InvalidGuid(s))
        }
    }

    /// Check the guid shape without constructing.
    pub fn is_valid(s: &str) -> bool {
        s.len() >= 16 && s.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Access the guid string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// DiasporaId
// ---------------------------------------------------------------------------

/// A federated account identifier: `user@host` with an optional `:port`.
///
/// This is the handle other pods use to discover and address a person
/// (e.g. `alice@pod.example` or `bob@localhost:3000`). Pods normalize
/// handles to lowercase before they appear on the wire, so uppercase input
/// is rejected rather than silently folded.
///
/// # Validation
///
/// - Exactly one `@`, with non-empty user and host parts
/// - User part: lowercase letters, digits, `-`, `_`, `.`
/// - Host part: dot-separated labels of lowercase letters, digits and `-`,
///   no label starting or ending with `-`
/// - Optional port: `:` followed by one or more digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiasporaId(String);

impl DiasporaId {
    /// Create a diaspora* ID from a string, validating the account shape.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidDiasporaId`] if the string does not
    /// match the `user@host[:port]` format.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityError> {
        let s = value.into();
        if Self::is_valid(&s) {
            Ok(Self(s))
        } else {
            Err(IdentityError::InvalidDiasporaId(s))
        }
    }

    /// Check the account-identifier shape without constructing.
    pub fn is_valid(s: &str) -> bool {
        let Some((user, host)) = s.split_once('@') else {
            return false;
        };
        if host.contains('@') {
            return false;
        }

        if user.is_empty()
            || !user
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "-_.".contains(c))
        {
            return false;
        }

        // Split off an optional :port suffix before checking hostname labels.
        let hostname = match host.split_once(':') {
            Some((name, port)) => {
                if port.is_empty() || !port.chars().all(|c| c.is_ascii_digit()) {
                    return false;
                }
                name
            }
            None => host,
        };

        if hostname.is_empty() {
            return false;
        }
        hostname.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        })
    }

    /// Access the full identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the user part (everything before the `@`).
    pub fn username(&self) -> &str {
        match self.0.split_once('@') {
            Some((user, _)) => user,
            None => &self.0,
        }
    }

    /// Return the host part (everything after the `@`, including any port).
    pub fn host(&self) -> &str {
        match self.0.split_once('@') {
            Some((_, host)) => host,
            None => &self.0,
        }
    }
}

impl std::fmt::Display for DiasporaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Guid --

    #[test]
    fn guid_valid_lowercase_hex() {
        let guid = Guid::new("0123456789abcdef").unwrap();
        assert_eq!(guid.as_str(), "0123456789abcdef");
    }

    #[test]
    fn guid_valid_longer_and_mixed_case() {
        assert!(Guid::new("0123456789abcdef0123456789ABCDEF").is_ok());
        assert!(Guid::new("ABCDEF0123456789").is_ok());
    }

    #[test]
    fn guid_rejects_invalid() {
        assert!(Guid::new("").is_err());
        assert!(Guid::new("0123456789abcde").is_err()); // 15 chars
        assert!(Guid::new("0123456789abcdeg").is_err()); // 'g' is not hex
        assert!(Guid::new("0123456789 abcdef").is_err()); // whitespace
    }

    #[test]
    fn guid_display_matches_input() {
        let guid = Guid::new("fedcba9876543210").unwrap();
        assert_eq!(format!("{guid}"), "fedcba9876543210");
    }

    // -- DiasporaId --

    #[test]
    fn diaspora_id_valid_examples() {
        assert!(DiasporaId::new("alice@pod.example").is_ok());
        assert!(DiasporaId::new("user@server.example").is_ok());
        assert!(DiasporaId::new("bob-1_2.3@sub.pod.example").is_ok());
        assert!(DiasporaId::new("dev@localhost:3000").is_ok());
    }

    #[test]
    fn diaspora_id_part_accessors() {
        let id = DiasporaId::new("alice@pod.example").unwrap();
        assert_eq!(id.username(), "alice");
        assert_eq!(id.host(), "pod.example");

        let with_port = DiasporaId::new("dev@localhost:3000").unwrap();
        assert_eq!(with_port.host(), "localhost:3000");
    }

    #[test]
    fn diaspora_id_rejects_invalid() {
        assert!(DiasporaId::new("").is_err());
        assert!(DiasporaId::new("alice").is_err()); // no @
        assert!(DiasporaId::new("@pod.example").is_err()); // empty user
        assert!(DiasporaId::new("alice@").is_err()); // empty host
        assert!(DiasporaId::new("alice@@pod.example").is_err()); // double @
        assert!(DiasporaId::new("Alice@pod.example").is_err()); // uppercase user
        assert!(DiasporaId::new("alice@pod..example").is_err()); // empty label
        assert!(DiasporaId::new("alice@-pod.example").is_err()); // label starts with -
        assert!(DiasporaId::new("alice@pod.example:").is_err()); // empty port
        assert!(DiasporaId::new("alice@pod.example:80x").is_err()); // non-digit port
        assert!(DiasporaId::new("al ice@pod.example").is_err()); // whitespace
    }

    #[test]
    fn diaspora_id_display_matches_input() {
        let id = DiasporaId::new("alice@pod.example").unwrap();
        assert_eq!(format!("{id}"), "alice@pod.example");
    }
}
