#![forbid(unsafe_code)]

//! Per-instance isolated render targets.

use falsework_dom::{DomError, Element, ShadowMode, ShadowRoot, ShadowRootInit};

use crate::error::{Error, ScopeError};

/// The isolated container an instance renders into.
///
/// Owned by exactly one instance. In closed mode the host element's public
/// surface ([`Element::shadow_root`]) does not expose it; this handle is the
/// only way in.
#[derive(Debug)]
pub struct Scope {
    root: ShadowRoot,
}

impl Scope {
    /// Attach an isolated container to `host`.
    ///
    /// # Errors
    ///
    /// [`ScopeError::AlreadyInitialized`] when `host` already has one. Any
    /// other refusal of the document (a tag that cannot host a scope) is
    /// passed through as [`Error::Dom`].
    pub fn create(host: &Element, init: ShadowRootInit) -> Result<Self, Error> {
        match host.attach_shadow(init) {
            Ok(root) => {
                tracing::debug!(host = %host.local_name(), mode = ?init.mode, "scope created");
                Ok(Self { root })
            }
            Err(DomError::ShadowRootExists { tag }) => {
                Err(ScopeError::AlreadyInitialized { tag }.into())
            }
            Err(other) => Err(other.into()),
        }
    }

    /// The container node.
    #[must_use]
    pub fn root(&self) -> &ShadowRoot {
        &self.root
    }

    #[must_use]
    pub fn host(&self) -> Element {
        self.root.host()
    }

    #[must_use]
    pub fn mode(&self) -> ShadowMode {
        self.root.mode()
    }
}
