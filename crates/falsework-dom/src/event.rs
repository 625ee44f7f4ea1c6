#![forbid(unsafe_code)]

//! Events, listeners and composed-path dispatch.
//!
//! Dispatch follows the DOM model:
//!
//! 1. The event path runs from the target up through its ancestors. At a
//!    shadow root the path continues into the host only for `composed`
//!    events. After the document node the window is visited.
//! 2. Capture listeners run root → target, then non-capture listeners run
//!    target → root (ancestors only when the event bubbles).
//! 3. For each listener the target is retargeted: listeners outside the
//!    origin's shadow tree see the shadow host instead of the origin.
//!
//! # Invariants
//!
//! 1. Listeners on one node run in registration order.
//! 2. A listener removed during dispatch does not run afterwards.
//! 3. `once` listeners are removed before they are invoked.
//! 4. `stop_propagation` finishes the current node; `stop_immediate_propagation`
//!    also skips the remaining listeners on it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::node::{Document, Node, NodeId, NodeKind};

/// Global counter for listener ids.
static LISTENER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Shared listener callback.
pub type Callback = Rc<dyn Fn(&Event)>;

/// Identifier returned by [`Node::add_event_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        Self(LISTENER_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// How a listener participates in dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerOptions {
    /// Run during the capture pass instead of the bubble pass.
    pub capture: bool,
    /// Remove after the first invocation.
    pub once: bool,
}

impl ListenerOptions {
    #[must_use]
    pub const fn capture() -> Self {
        Self {
            capture: true,
            once: false,
        }
    }

    #[must_use]
    pub const fn bubble() -> Self {
        Self {
            capture: false,
            once: false,
        }
    }

    #[must_use]
    pub const fn once(mut self) -> Self {
        self.once = true;
        self
    }
}

pub(crate) struct Listener {
    pub(crate) id: ListenerId,
    event_type: String,
    options: ListenerOptions,
    callback: Callback,
}

impl Listener {
    pub(crate) fn new(event_type: &str, options: ListenerOptions, callback: Callback) -> Self {
        Self {
            id: ListenerId::next(),
            event_type: event_type.to_owned(),
            options,
            callback,
        }
    }
}

/// Dispatch phase of an event as seen by the running listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// Pointer payload of mouse events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MouseDetail {
    pub client_x: f64,
    pub client_y: f64,
    pub button: i16,
}

/// Event payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EventDetail {
    #[default]
    None,
    Mouse(MouseDetail),
    Text(String),
}

/// A dispatched event.
///
/// Constructed once and passed by reference to every listener; dispatch
/// state (target, phase, flags) lives in cells.
pub struct Event {
    event_type: String,
    bubbles: bool,
    composed: bool,
    detail: EventDetail,
    document: RefCell<Option<Document>>,
    target: Cell<Option<NodeId>>,
    current_target: Cell<Option<NodeId>>,
    phase: Cell<Phase>,
    stop: Cell<bool>,
    stop_immediate: Cell<bool>,
    canceled: Cell<bool>,
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("type", &self.event_type)
            .field("bubbles", &self.bubbles)
            .field("composed", &self.composed)
            .field("detail", &self.detail)
            .field("target", &self.target.get())
            .field("phase", &self.phase.get())
            .finish()
    }
}

impl Event {
    /// A non-bubbling, non-composed event.
    #[must_use]
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            bubbles: false,
            composed: false,
            detail: EventDetail::None,
            document: RefCell::new(None),
            target: Cell::new(None),
            current_target: Cell::new(None),
            phase: Cell::new(Phase::None),
            stop: Cell::new(false),
            stop_immediate: Cell::new(false),
            canceled: Cell::new(false),
        }
    }

    /// A bubbling, composed mouse event.
    #[must_use]
    pub fn mouse(event_type: impl Into<String>, detail: MouseDetail) -> Self {
        Self::new(event_type)
            .bubbles(true)
            .composed(true)
            .with_detail(EventDetail::Mouse(detail))
    }

    /// A primary-button `click`.
    #[must_use]
    pub fn click() -> Self {
        Self::mouse("click", MouseDetail::default())
    }

    #[must_use]
    pub fn bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    #[must_use]
    pub fn composed(mut self, composed: bool) -> Self {
        self.composed = composed;
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: EventDetail) -> Self {
        self.detail = detail;
        self
    }

    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    #[must_use]
    pub fn is_bubbling(&self) -> bool {
        self.bubbles
    }

    #[must_use]
    pub fn is_composed(&self) -> bool {
        self.composed
    }

    #[must_use]
    pub fn detail(&self) -> &EventDetail {
        &self.detail
    }

    /// Mouse payload, when this is a mouse event.
    #[must_use]
    pub fn mouse_detail(&self) -> Option<MouseDetail> {
        match self.detail {
            EventDetail::Mouse(detail) => Some(detail),
            _ => None,
        }
    }

    /// Target as seen by the running listener (retargeted across shadow
    /// boundaries).
    #[must_use]
    pub fn target(&self) -> Option<NodeId> {
        self.target.get()
    }

    /// Handle to [`Event::target`].
    #[must_use]
    pub fn target_node(&self) -> Option<Node> {
        let id = self.target.get()?;
        self.document.borrow().as_ref().map(|doc| doc.node(id))
    }

    #[must_use]
    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target.get()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    pub fn stop_propagation(&self) {
        self.stop.set(true);
    }

    pub fn stop_immediate_propagation(&self) {
        self.stop.set(true);
        self.stop_immediate.set(true);
    }

    pub fn prevent_default(&self) {
        self.canceled.set(true);
    }

    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.canceled.get()
    }

    fn reset(&self, document: &Document) {
        *self.document.borrow_mut() = Some(document.clone());
        self.stop.set(false);
        self.stop_immediate.set(false);
        self.canceled.set(false);
    }
}

impl Document {
    /// Composed path from `target` upwards.
    pub(crate) fn event_path(&self, target: NodeId, composed: bool) -> Vec<NodeId> {
        let tree = self.tree();
        let mut path = Vec::new();
        let mut cursor = Some(target);
        while let Some(id) = cursor {
            path.push(id);
            let node = tree.get(id);
            cursor = match node.kind {
                NodeKind::ShadowRoot { host, .. } => composed.then_some(host),
                NodeKind::Document => Some(tree.window),
                NodeKind::Window => None,
                _ => node.parent,
            };
        }
        path
    }

    /// `origin` as seen from a listener on `listener`.
    pub(crate) fn retarget(&self, mut origin: NodeId, listener: NodeId) -> NodeId {
        let tree = self.tree();
        loop {
            let root = tree.root_of(origin);
            match tree.get(root).kind {
                NodeKind::ShadowRoot { host, .. }
                    if !tree.is_shadow_including_inclusive_ancestor(root, listener) =>
                {
                    origin = host;
                }
                _ => return origin,
            }
        }
    }

    pub(crate) fn dispatch(&self, target: NodeId, event: &Event) -> bool {
        event.reset(self);
        let path = self.event_path(target, event.composed);
        tracing::trace!(
            event = %event.event_type,
            target = ?target,
            path_len = path.len(),
            "dispatch"
        );

        for &node in path.iter().rev() {
            let seen = self.retarget(target, node);
            let phase = if seen == node {
                Phase::AtTarget
            } else {
                Phase::Capturing
            };
            self.invoke(node, seen, event, true, phase);
            if event.stop.get() {
                return self.finish(event);
            }
        }

        for &node in &path {
            let seen = self.retarget(target, node);
            let phase = if seen == node {
                Phase::AtTarget
            } else if event.bubbles {
                Phase::Bubbling
            } else {
                continue;
            };
            self.invoke(node, seen, event, false, phase);
            if event.stop.get() {
                break;
            }
        }
        self.finish(event)
    }

    fn finish(&self, event: &Event) -> bool {
        event.phase.set(Phase::None);
        event.current_target.set(None);
        !event.canceled.get()
    }

    fn invoke(&self, node: NodeId, seen: NodeId, event: &Event, capture: bool, phase: Phase) {
        let matching: Vec<(ListenerId, bool, Callback)> = {
            let tree = self.tree();
            tree.get(node)
                .listeners
                .iter()
                .filter(|l| l.options.capture == capture && l.event_type == event.event_type)
                .map(|l| (l.id, l.options.once, Rc::clone(&l.callback)))
                .collect()
        };
        if matching.is_empty() {
            return;
        }
        event.target.set(Some(seen));
        event.current_target.set(Some(node));
        event.phase.set(phase);

        for (id, once, callback) in matching {
            let still_registered = self
                .tree()
                .get(node)
                .listeners
                .iter()
                .any(|l| l.id == id);
            if !still_registered {
                continue;
            }
            if once {
                self.node(node).remove_event_listener(id);
            }
            callback(event);
            if event.stop_immediate.get() {
                break;
            }
        }
    }
}
