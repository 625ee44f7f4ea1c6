#![forbid(unsafe_code)]

//! Error types for component definition, construction and binding.
//!
//! Every error is raised eagerly and synchronously. A failed operation
//! leaves no partial state behind: no registry entry, no listener, no
//! instance.

use falsework_dom::{DomError, SelectorError};

/// Registration and lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The name is already bound, to this or any other definition.
    #[error("a component is already registered as <{name}>")]
    AlreadyRegistered { name: String },
    /// Name derivation produced nothing and no explicit name was given.
    #[error("type identifier {identifier:?} derives an empty element name")]
    EmptyDerivedName { identifier: String },
    #[error("{name:?} is not a valid custom element name: {reason}")]
    InvalidName { name: String, reason: &'static str },
    /// Construction was requested for a type or tag with no registration.
    #[error("no component is registered for {what}")]
    NotDefined { what: String },
}

/// Isolated scope failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("<{tag}> already has an isolated scope")]
    AlreadyInitialized { tag: String },
}

/// Event binding failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("invalid selector list {selectors:?} for {event:?}")]
    InvalidSelector {
        event: String,
        selectors: String,
        #[source]
        source: SelectorError,
    },
    /// A selector's subject cannot guarantee the handler's element kind.
    #[error("selector #{index} of {selectors:?} does not narrow to <{expected}> elements")]
    KindMismatch {
        selectors: String,
        index: usize,
        expected: &'static str,
    },
}

/// Any failure surfaced by the component layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Scope(#[from] ScopeError),
    #[error(transparent)]
    Bind(#[from] BindError),
    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Result alias for the component layer.
pub type Result<T, E = Error> = std::result::Result<T, E>;
