//! # Extension Hooks
//!
//! The seam between this library and its host application. The library
//! cannot reach the host's storage, so the host registers handlers for a
//! fixed set of lifecycle hooks; protocol code triggers them and consumes
//! the replies.
//!
//! ## Design Decision
//!
//! The registry is an explicit value handed to whatever needs it, never a
//! process-wide global. It has two phases: during startup the host calls
//! [`Callbacks::on`] freely; once configuration validates, the registry is
//! sealed and becomes read-only, at which point [`Callbacks::trigger`] is
//! safe from any number of threads. Registering after the seal is a misuse
//! error, not a race.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use dfed_entity::Entity;

/// The lifecycle points a host application can hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Hook {
    /// Look up a local person for a WebFinger query, by account handle.
    FetchPersonForWebfinger,
    /// Look up a local person for an hCard query, by GUID.
    FetchPersonForHcard,
    /// A remote person was discovered and parsed; persist it.
    SavePersonAfterWebfinger,
}

impl Hook {
    /// Every hook the protocol layer triggers.
    pub fn all() -> [Hook; 3] {
        [
            Hook::FetchPersonForWebfinger,
            Hook::FetchPersonForHcard,
            Hook::SavePersonAfterWebfinger,
        ]
    }

    /// The hook's wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Hook::FetchPersonForWebfinger => "fetch_person_for_webfinger",
            Hook::FetchPersonForHcard => "fetch_person_for_hcard",
            Hook::SavePersonAfterWebfinger => "save_person_after_webfinger",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Hook {
    type Err = CallbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hook::all()
            .into_iter()
            .find(|hook| hook.name() == s)
            .ok_or_else(|| CallbackError::UnknownHookName {
                name: s.to_string(),
            })
    }
}

/// Typed payload delivered to handlers when a hook fires.
#[derive(Debug, Clone, PartialEq)]
pub enum HookEvent {
    /// WebFinger lookup for a local account handle.
    FetchPersonForWebfinger {
        /// The queried account handle, e.g. `alice@pod.example`.
        account: String,
    },
    /// hCard lookup for a local person.
    FetchPersonForHcard {
        /// The queried person GUID.
        guid: String,
    },
    /// A discovered remote person, parsed and ready to persist.
    SavePersonAfterWebfinger {
        /// The parsed `person` entity.
        person: Entity,
    },
}

impl HookEvent {
    /// The hook this event belongs to.
    pub fn hook(&self) -> Hook {
        match self {
            HookEvent::FetchPersonForWebfinger { .. } => Hook::FetchPersonForWebfinger,
            HookEvent::FetchPersonForHcard { .. } => Hook::FetchPersonForHcard,
            HookEvent::SavePersonAfterWebfinger { .. } => Hook::SavePersonAfterWebfinger,
        }
    }
}

/// A handler's answer to a hook event.
#[derive(Debug, Clone, PartialEq)]
pub enum HookReply {
    /// A person lookup result; `None` when the account is unknown.
    Person(Option<Entity>),
    /// The event was handled, nothing to return.
    Ack,
}

/// A registered hook handler.
pub type HookHandler = Box<dyn Fn(&HookEvent) -> HookReply + Send + Sync>;

/// Errors raised by hook registration and triggering.
#[derive(Error, Debug)]
pub enum CallbackError {
    /// The hook is outside the set this registry was declared with.
    #[error("hook \"{0}\" is outside the declared hook set")]
    UnknownCallback(Hook),

    /// A string did not name any known hook.
    #[error("\"{name}\" is not a known hook name")]
    UnknownHookName {
        /// The unrecognized name.
        name: String,
    },

    /// Registration was attempted after the registry was sealed.
    #[error("hook registry is sealed; handlers can only be registered during startup")]
    Sealed,
}

/// Registry of hook handlers, declared once and sealed at startup.
pub struct Callbacks {
    required: BTreeSet<Hook>,
    handlers: BTreeMap<Hook, Vec<HookHandler>>,
    sealed: bool,
}

impl Callbacks {
    /// Create a registry whose required hook set is fixed to `required`.
    pub fn new(required: impl IntoIterator<Item = Hook>) -> Self {
        Callbacks {
            required: required.into_iter().collect(),
            handlers: BTreeMap::new(),
            sealed: false,
        }
    }

    /// The declared hook set, in hook order.
    pub fn required(&self) -> impl Iterator<Item = Hook> + '_ {
        self.required.iter().copied()
    }

    /// Register a handler. Handlers for the same hook run in registration
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`CallbackError::Sealed`] once the registry is sealed, or
    /// [`CallbackError::UnknownCallback`] if the hook is outside the
    /// declared set. Nothing is registered on failure.
    pub fn on(
        &mut self,
        hook: Hook,
        handler: impl Fn(&HookEvent) -> HookReply + Send + Sync + 'static,
    ) -> Result<(), CallbackError> {
        if self.sealed {
            return Err(CallbackError::Sealed);
        }
        if !self.required.contains(&hook) {
            return Err(CallbackError::UnknownCallback(hook));
        }
        self.handlers.entry(hook).or_default().push(Box::new(handler));
        Ok(())
    }

    /// Make the registry read-only. Idempotent.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Whether the registry has been sealed.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Fire a hook: invoke every registered handler in registration order
    /// and collect every reply.
    ///
    /// # Errors
    ///
    /// Returns [`CallbackError::UnknownCallback`] if the event's hook is
    /// outside the declared set.
    pub fn trigger(&self, event: &HookEvent) -> Result<Vec<HookReply>, CallbackError> {
        let hook = event.hook();
        if !self.required.contains(&hook) {
            return Err(CallbackError::UnknownCallback(hook));
        }
        let handlers = self.handlers.get(&hook).map(Vec::as_slice).unwrap_or(&[]);
        tracing::debug!(hook = %hook, handlers = handlers.len(), "triggering hook");
        Ok(handlers.iter().map(|handler| handler(event)).collect())
    }

    /// Whether every declared hook has at least one handler.
    pub fn definition_complete(&self) -> bool {
        self.missing_handlers().is_empty()
    }

    /// The declared hooks with no handler yet, in hook order.
    pub fn missing_handlers(&self) -> Vec<Hook> {
        self.required
            .iter()
            .filter(|hook| {
                self.handlers
                    .get(hook)
                    .map(|handlers| handlers.is_empty())
                    .unwrap_or(true)
            })
            .copied()
            .collect()
    }

    /// Number of handlers registered for a hook.
    pub fn handler_count(&self, hook: Hook) -> usize {
        self.handlers.get(&hook).map(Vec::len).unwrap_or(0)
    }
}

impl Default for Callbacks {
    /// A registry requiring every hook the protocol layer triggers.
    fn default() -> Self {
        Callbacks::new(Hook::all())
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Handlers are opaque closures; show their counts per hook.
        let wired: BTreeMap<&str, usize> = self
            .required
            .iter()
            .map(|hook| (hook.name(), self.handler_count(*hook)))
            .collect();
        f.debug_struct("Callbacks")
            .field("handlers", &wired)
            .field("sealed", &self.sealed)
            .finish()
    }
}
