#![forbid(unsafe_code)]

//! Selector-filtered event routing for one component instance.
//!
//! # Modes
//!
//! - **Capture** ([`Router::capture`]): a capture-phase listener on the
//!   instance's scope root. The handler runs when the event's origin matches
//!   at least one selector of the list. Capture phase means non-bubbling
//!   events originating inside the scope are seen too.
//! - **Subscribe** ([`Router::subscribe`]): a bubble-phase listener on an
//!   external node such as the window. Unfiltered unless selectors are
//!   given.
//!
//! # Invariants
//!
//! 1. Selectors are parsed and kind-checked before any listener is
//!    attached; a failed bind attaches nothing.
//! 2. Matching never leaves the origin's tree scope: combinators see the
//!    origin's ancestors inside the scope only.
//! 3. Every attached listener is tracked; [`Router::teardown`] removes them
//!    all, and dropping the router tears down.
//! 4. Handlers for one instance fire in binding order.

use std::fmt;

use falsework_dom::{Event, ListenerId, ListenerOptions, Node, SelectorList};

use crate::error::BindError;
use crate::kind::{Captured, ElementKind, Target};
use crate::scope::Scope;

/// Identifies one binding within a [`Router`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(u32);

struct Attached {
    id: BindingId,
    node: Node,
    listener: ListenerId,
    event: String,
}

/// Tracks the listeners of one instance.
#[derive(Default)]
pub struct Router {
    attached: Vec<Attached>,
    next_id: u32,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("bindings", &self.attached.len())
            .finish()
    }
}

/// Parse `selectors` for a binding on `event`.
///
/// # Errors
///
/// [`BindError::InvalidSelector`] for malformed input.
pub fn parse_selectors(event: &str, selectors: &str) -> Result<SelectorList, BindError> {
    SelectorList::parse(selectors).map_err(|source| BindError::InvalidSelector {
        event: event.to_owned(),
        selectors: selectors.to_owned(),
        source,
    })
}

/// Check that every selector's subject names `K`'s tag.
///
/// # Errors
///
/// [`BindError::KindMismatch`] naming the first offending selector.
pub fn check_kind<K: ElementKind>(list: &SelectorList) -> Result<(), BindError> {
    let Some(expected) = K::TAG else {
        return Ok(());
    };
    match list.subject_tags().iter().position(|tag| *tag != Some(expected)) {
        Some(index) => Err(BindError::KindMismatch {
            selectors: list.as_str().to_owned(),
            index,
            expected: K::NAME,
        }),
        None => Ok(()),
    }
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `event` anywhere inside `scope`, filtered by
    /// `selectors`.
    ///
    /// # Errors
    ///
    /// [`BindError::InvalidSelector`] or [`BindError::KindMismatch`]; no
    /// listener is attached in either case.
    pub fn capture<K: ElementKind>(
        &mut self,
        scope: &Scope,
        event: &str,
        selectors: &str,
        handler: impl Fn(Captured<'_, K>) + 'static,
    ) -> Result<BindingId, BindError> {
        let list = parse_selectors(event, selectors)?;
        self.capture_list(scope, event, list, handler)
    }

    /// [`Router::capture`] with an already parsed selector list.
    ///
    /// # Errors
    ///
    /// [`BindError::KindMismatch`] when the list does not narrow to `K`.
    pub fn capture_list<K: ElementKind>(
        &mut self,
        scope: &Scope,
        event: &str,
        list: SelectorList,
        handler: impl Fn(Captured<'_, K>) + 'static,
    ) -> Result<BindingId, BindError> {
        check_kind::<K>(&list)?;
        let id = self.next_binding_id();
        let event_name = event.to_owned();
        let listener = scope.root().add_event_listener(
            event,
            ListenerOptions::capture(),
            move |ev: &Event| {
                let Some(origin) = ev.target_node().and_then(|n| n.as_element()) else {
                    return;
                };
                if !origin.matches_list(&list) {
                    tracing::trace!(event = %event_name, selectors = %list, "origin filtered out");
                    return;
                }
                let Some(target) = Target::<K>::narrow(origin) else {
                    return;
                };
                tracing::trace!(event = %event_name, binding = ?id, "captured");
                handler(Captured::new(ev, target));
            },
        );
        tracing::debug!(event, kind = K::NAME, binding = ?id, "capture binding attached");
        self.attached.push(Attached {
            id,
            node: scope.root().as_node().clone(),
            listener,
            event: event.to_owned(),
        });
        Ok(id)
    }

    /// Bind `handler` to `event` on an external `source` node.
    ///
    /// With `selectors`, the handler only runs when the (retargeted) origin
    /// matches one of them.
    ///
    /// # Errors
    ///
    /// [`BindError::InvalidSelector`]; no listener is attached.
    pub fn subscribe(
        &mut self,
        source: &Node,
        event: &str,
        selectors: Option<&str>,
        handler: impl Fn(&Event) + 'static,
    ) -> Result<BindingId, BindError> {
        let list = selectors
            .map(|s| parse_selectors(event, s))
            .transpose()?;
        let id = self.next_binding_id();
        let listener = source.add_event_listener(event, ListenerOptions::bubble(), move |ev| {
            if let Some(list) = &list {
                let matched = ev
                    .target_node()
                    .and_then(|n| n.as_element())
                    .is_some_and(|origin| origin.matches_list(list));
                if !matched {
                    return;
                }
            }
            handler(ev);
        });
        tracing::debug!(event, source = ?source.id(), binding = ?id, "subscription attached");
        self.attached.push(Attached {
            id,
            node: source.clone(),
            listener,
            event: event.to_owned(),
        });
        Ok(id)
    }

    /// Remove one binding. Returns whether it was attached.
    pub fn unbind(&mut self, id: BindingId) -> bool {
        let Some(index) = self.attached.iter().position(|a| a.id == id) else {
            return false;
        };
        let attached = self.attached.remove(index);
        attached.node.remove_event_listener(attached.listener);
        true
    }

    /// Remove every binding. Returns how many were removed.
    pub fn teardown(&mut self) -> usize {
        let count = self.attached.len();
        for attached in self.attached.drain(..) {
            attached.node.remove_event_listener(attached.listener);
            tracing::trace!(event = %attached.event, binding = ?attached.id, "binding removed");
        }
        if count > 0 {
            tracing::debug!(count, "router torn down");
        }
        count
    }

    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.attached.len()
    }

    fn next_binding_id(&mut self) -> BindingId {
        let id = BindingId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl Drop for Router {
    fn drop(&mut self) {
        self.teardown();
    }
}
