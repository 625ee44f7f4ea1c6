#![forbid(unsafe_code)]

//! In-memory host environment for Falsework components.
//!
//! This crate models the parts of a browser document that a component layer
//! relies on:
//!
//! - [`Document`]: an arena of nodes with a window above the document node.
//! - [`Element`] / [`ShadowRoot`]: element handles and isolated shadow trees
//!   with open or closed visibility.
//! - [`Event`]: composed-path dispatch with capture, target and bubble
//!   phases and shadow retargeting.
//! - [`SelectorList`]: CSS selector parsing and matching.
//!
//! Everything is single-threaded: handles are `Rc`-based and `!Send`.

pub mod error;
pub mod event;
pub mod node;
pub mod selector;

pub use error::DomError;
pub use event::{Callback, Event, EventDetail, ListenerId, ListenerOptions, MouseDetail, Phase};
pub use node::{
    Document, Element, Node, NodeId, NodeType, SHADOW_HOSTS, ShadowMode, ShadowRoot, ShadowRootInit,
};
pub use selector::{SelectorError, SelectorList};
