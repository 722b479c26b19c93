//! # dfed-discovery
//!
//! WebFinger discovery for federated accounts. [`XrdDocument`] is the
//! generic XRD container, [`WebFinger`] the protocol document built on it,
//! with the legacy link relations remote pods match byte-for-byte.
//!
//! Reading is all-or-nothing: a remote document either yields every field
//! a [`WebFinger`] carries or a [`DiscoveryError`] naming what is missing.

pub mod webfinger;
pub mod xrd;

pub use webfinger::{
    DiscoveryError, WebFinger, REL_ATOM, REL_GUID, REL_HCARD, REL_PROFILE, REL_PUBKEY, REL_SALMON,
    REL_SEED,
};
pub use xrd::{XrdDocument, XrdLink, XRD_NAMESPACE};
