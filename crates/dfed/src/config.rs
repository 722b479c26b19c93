//! # Startup Configuration
//!
//! Assembles and validates everything the library needs from its host
//! before any federation traffic flows: the pod's own base URI, the CA
//! bundle used when fetching from remote pods, and a fully wired hook
//! registry. Validation is fail-fast; a misconfigured pod must not come
//! up half-working.

use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

use crate::callbacks::{CallbackError, Callbacks, Hook, HookEvent, HookReply};

/// A configuration problem that aborts startup.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// No server URI was supplied.
    #[error("server_uri is not configured")]
    MissingServerUri,

    /// The server URI does not parse as an absolute URL with a host.
    #[error("server_uri \"{uri}\" is invalid: {reason}")]
    InvalidServerUri {
        /// The rejected value.
        uri: String,
        /// Why the parser rejected it.
        reason: String,
    },

    /// No CA bundle path was supplied.
    #[error("certificate_authorities is not configured")]
    MissingCertificateAuthorities,

    /// The CA bundle path does not refer to an existing file.
    #[error("certificate_authorities file not found: {path}")]
    CertificateAuthoritiesNotFound {
        /// The rejected path.
        path: PathBuf,
    },

    /// No hook registry was supplied.
    #[error("callbacks are not configured")]
    MissingCallbacks,

    /// Declared hooks are still unwired.
    #[error("hooks not wired: {}", .hooks.iter().map(|h| h.to_string()).collect::<Vec<_>>().join(", "))]
    UnwiredHooks {
        /// Every hook with no handler, in hook order.
        hooks: Vec<Hook>,
    },
}

/// Collects configuration before validation.
///
/// ```
/// use dfed::{Callbacks, FederationBuilder, Hook, HookReply};
///
/// let mut callbacks = Callbacks::default();
/// for hook in Hook::all() {
///     callbacks.on(hook, |_| HookReply::Ack).unwrap();
/// }
///
/// let ca_bundle = tempfile::NamedTempFile::new().unwrap();
/// let federation = FederationBuilder::new()
///     .server_uri("https://pod.example/")
///     .certificate_authorities(ca_bundle.path())
///     .callbacks(callbacks)
///     .build()
///     .unwrap();
/// assert_eq!(federation.server_uri().host_str(), Some("pod.example"));
/// ```
#[derive(Debug, Default)]
pub struct FederationBuilder {
    server_uri: Option<String>,
    certificate_authorities: Option<PathBuf>,
    callbacks: Option<Callbacks>,
}

impl FederationBuilder {
    /// Start with nothing configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pod's own base URI.
    pub fn server_uri(mut self, uri: impl Into<String>) -> Self {
        self.server_uri = Some(uri.into());
        self
    }

    /// Set the CA bundle file used for outbound TLS verification.
    pub fn certificate_authorities(mut self, path: impl Into<PathBuf>) -> Self {
        self.certificate_authorities = Some(path.into());
        self
    }

    /// Supply the hook registry. It is sealed on a successful build.
    pub fn callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks = Some(callbacks);
        self
    }

    /// Validate everything and produce the immutable [`Federation`].
    ///
    /// The first problem found aborts the build; it is logged at error
    /// level and returned so the host can abort startup with a precise
    /// message.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] naming the missing or invalid piece.
    pub fn build(self) -> Result<Federation, ConfigurationError> {
        let raw_uri = match self.server_uri {
            Some(uri) => uri,
            None => return Err(fatal(ConfigurationError::MissingServerUri)),
        };
        let server_uri = match Url::parse(&raw_uri) {
            Ok(url) if url.has_host() => url,
            Ok(_) => {
                return Err(fatal(ConfigurationError::InvalidServerUri {
                    uri: raw_uri,
                    reason: "URI has no host".to_string(),
                }))
            }
            Err(err) => {
                return Err(fatal(ConfigurationError::InvalidServerUri {
                    uri: raw_uri,
                    reason: err.to_string(),
                }))
            }
        };

        let certificate_authorities = match self.certificate_authorities {
            Some(path) => path,
            None => return Err(fatal(ConfigurationError::MissingCertificateAuthorities)),
        };
        if !certificate_authorities.is_file() {
            return Err(fatal(ConfigurationError::CertificateAuthoritiesNotFound {
                path: certificate_authorities,
            }));
        }

        let mut callbacks = match self.callbacks {
            Some(callbacks) => callbacks,
            None => return Err(fatal(ConfigurationError::MissingCallbacks)),
        };
        let unwired = callbacks.missing_handlers();
        if !unwired.is_empty() {
            return Err(fatal(ConfigurationError::UnwiredHooks { hooks: unwired }));
        }

        callbacks.seal();
        tracing::info!(server_uri = %server_uri, "federation configured");
        Ok(Federation {
            server_uri,
            certificate_authorities,
            callbacks,
        })
    }
}

/// Log a configuration failure before surfacing it.
fn fatal(err: ConfigurationError) -> ConfigurationError {
    tracing::error!(error = %err, "federation configuration rejected");
    err
}

/// Validated, immutable runtime configuration.
///
/// Built once at startup via [`FederationBuilder`]; afterwards it is safe
/// to share behind an `Arc` and read from any thread.
#[derive(Debug)]
pub struct Federation {
    server_uri: Url,
    certificate_authorities: PathBuf,
    callbacks: Callbacks,
}

impl Federation {
    /// The pod's own base URI.
    pub fn server_uri(&self) -> &Url {
        &self.server_uri
    }

    /// The CA bundle file for outbound TLS verification.
    pub fn certificate_authorities(&self) -> &Path {
        &self.certificate_authorities
    }

    /// The sealed hook registry.
    pub fn callbacks(&self) -> &Callbacks {
        &self.callbacks
    }

    /// Fire a hook through the sealed registry.
    ///
    /// # Errors
    ///
    /// Returns [`CallbackError`] if the event's hook is outside the
    /// declared set.
    pub fn trigger(&self, event: &HookEvent) -> Result<Vec<HookReply>, CallbackError> {
        self.callbacks.trigger(event)
    }
}
