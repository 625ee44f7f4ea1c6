#![forbid(unsafe_code)]

//! The declaration table a component builds once per definition.
//!
//! [`Component::declare`](super::Component::declare) fills a
//! [`Declarations`] with reactive properties and event bindings. Selectors
//! are parsed and kind-checked while declaring, so a bad declaration fails
//! the definition instead of a later construction. Each construction then
//! walks the table to wire the new instance.

use std::fmt;
use std::rc::{Rc, Weak};

use falsework_dom::{Document, Event, Node};
use falsework_runtime::reactive::{Subscription, WriteHooks};

use super::instance::Core;
use crate::error::BindError;
use crate::kind::{Captured, ElementKind};
use crate::router::{BindingId, Router, check_kind, parse_selectors};
use crate::scope::Scope;

pub(crate) type Attach<C> = Box<dyn Fn(&C, Rc<dyn Fn()>) -> Subscription>;
pub(crate) type Bind<C> =
    Box<dyn Fn(&mut Router, &Scope, &Weak<Core<C>>) -> Result<BindingId, BindError>>;

pub(crate) struct ReactiveDecl<C> {
    pub(crate) attach: Attach<C>,
    pub(crate) on_change: Option<Rc<dyn Fn(&C)>>,
}

/// Reactive properties and event bindings of a component type.
pub struct Declarations<C> {
    pub(crate) reactive: Vec<ReactiveDecl<C>>,
    pub(crate) bindings: Vec<Bind<C>>,
    error: Option<BindError>,
}

impl<C> Default for Declarations<C> {
    fn default() -> Self {
        Self {
            reactive: Vec::new(),
            bindings: Vec::new(),
            error: None,
        }
    }
}

impl<C> fmt::Debug for Declarations<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Declarations")
            .field("reactive", &self.reactive.len())
            .field("bindings", &self.bindings.len())
            .field("error", &self.error)
            .finish()
    }
}

impl<C: 'static> Declarations<C> {
    /// Re-render whenever the property returned by `field` is written.
    pub fn reactive<P: WriteHooks + 'static>(&mut self, field: fn(&C) -> &P) -> &mut Self {
        self.push_reactive(field, None)
    }

    /// Like [`Declarations::reactive`], running `on_change` before the
    /// render is requested.
    pub fn reactive_with<P: WriteHooks + 'static>(
        &mut self,
        field: fn(&C) -> &P,
        on_change: impl Fn(&C) + 'static,
    ) -> &mut Self {
        self.push_reactive(field, Some(Rc::new(on_change)))
    }

    fn push_reactive<P: WriteHooks + 'static>(
        &mut self,
        field: fn(&C) -> &P,
        on_change: Option<Rc<dyn Fn(&C)>>,
    ) -> &mut Self {
        self.reactive.push(ReactiveDecl {
            attach: Box::new(move |state: &C, hook: Rc<dyn Fn()>| {
                let prop = field(state);
                tracing::trace!(prop = prop.name(), "reactive property bound");
                prop.on_write(hook)
            }),
            on_change,
        });
        self
    }

    /// Run `handler` when `event` fires on an element inside the scope that
    /// matches any of `selectors`.
    ///
    /// The origin reaches the handler narrowed to `K`; every selector's
    /// subject must name `K`'s tag unless `K` is
    /// [`AnyElement`](crate::kind::AnyElement).
    pub fn capture<K: ElementKind>(
        &mut self,
        event: &str,
        selectors: &str,
        handler: impl Fn(&C, Captured<'_, K>) + 'static,
    ) -> &mut Self {
        let list = match parse_selectors(event, selectors)
            .and_then(|list| check_kind::<K>(&list).map(|()| list))
        {
            Ok(list) => list,
            Err(err) => return self.fail(err),
        };
        let event = event.to_owned();
        let handler = Rc::new(handler);
        self.bindings.push(Box::new(
            move |router: &mut Router, scope: &Scope, weak: &Weak<Core<C>>| {
                let handler = Rc::clone(&handler);
                let weak = weak.clone();
                router.capture_list::<K>(scope, &event, list.clone(), move |captured| {
                    if let Some(core) = weak.upgrade() {
                        handler(&core.state, captured);
                    }
                })
            },
        ));
        self
    }

    /// Run `handler` when `event` reaches the node `source` picks from the
    /// document, typically the window.
    pub fn subscribe(
        &mut self,
        source: fn(&Document) -> Node,
        event: &str,
        handler: impl Fn(&C, &Event) + 'static,
    ) -> &mut Self {
        self.push_subscription(source, event, None, handler)
    }

    /// [`Declarations::subscribe`] that only fires for origins matching
    /// `selectors`.
    pub fn subscribe_filtered(
        &mut self,
        source: fn(&Document) -> Node,
        event: &str,
        selectors: &str,
        handler: impl Fn(&C, &Event) + 'static,
    ) -> &mut Self {
        if let Err(err) = parse_selectors(event, selectors) {
            return self.fail(err);
        }
        self.push_subscription(source, event, Some(selectors.to_owned()), handler)
    }

    fn push_subscription(
        &mut self,
        source: fn(&Document) -> Node,
        event: &str,
        selectors: Option<String>,
        handler: impl Fn(&C, &Event) + 'static,
    ) -> &mut Self {
        let event = event.to_owned();
        let handler = Rc::new(handler);
        self.bindings.push(Box::new(
            move |router: &mut Router, scope: &Scope, weak: &Weak<Core<C>>| {
                let node = source(scope.root().document());
                let handler = Rc::clone(&handler);
                let weak = weak.clone();
                router.subscribe(&node, &event, selectors.as_deref(), move |ev| {
                    if let Some(core) = weak.upgrade() {
                        handler(&core.state, ev);
                    }
                })
            },
        ));
        self
    }

    fn fail(&mut self, err: BindError) -> &mut Self {
        tracing::debug!(%err, "declaration rejected");
        self.error.get_or_insert(err);
        self
    }

    /// Number of reactive properties declared.
    #[must_use]
    pub fn reactive_count(&self) -> usize {
        self.reactive.len()
    }

    /// Number of event bindings declared.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// The table, or the first declaration error.
    pub(crate) fn finish(mut self) -> Result<Self, BindError> {
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}
