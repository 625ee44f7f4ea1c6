#![forbid(unsafe_code)]

//! Falsework: declarative components over an in-memory document.
//!
//! A component is a plain Rust type implementing [`Component`]. Defining it
//! on a [`Host`] registers an element name (explicit, or derived from the
//! type identifier), and every element created with that name gets:
//!
//! - its own isolated scope (a shadow root, closed unless asked otherwise);
//! - reactive properties whose writes coalesce into one render per tick;
//! - event bindings that capture by selector inside the scope, or subscribe
//!   to a shared source such as the window.
//!
//! ```
//! use falsework::prelude::*;
//!
//! struct Counter {
//!     count: Prop<u32>,
//! }
//!
//! impl Component for Counter {
//!     const IDENTIFIER: &'static str = "TapCounter";
//!
//!     fn init() -> Self {
//!         Self { count: Prop::new("count", 0) }
//!     }
//!
//!     fn shadow_root_init() -> ShadowRootInit {
//!         ShadowRootInit::open()
//!     }
//!
//!     fn declare(decl: &mut Declarations<Self>) {
//!         decl.reactive(|c| &c.count).capture::<Button>(
//!             "click",
//!             "button",
//!             |c, _| c.count.update(|n| *n += 1),
//!         );
//!     }
//!
//!     fn template(&self) -> Option<Markup> {
//!         Some(html::el("button").text(self.count.get().to_string()))
//!     }
//! }
//!
//! let host = Host::new();
//! host.define::<Counter>().unwrap();
//! let counter = host.construct::<Counter>().unwrap();
//! host.tick();
//!
//! let root = counter.host().shadow_root().unwrap();
//! root.children()[0].as_element().unwrap().click();
//! host.tick();
//! assert_eq!(root.text_content(), "1");
//! ```

pub mod component;
pub mod error;
pub mod host;
pub mod kind;
pub mod naming;
pub mod registry;
pub mod router;
pub mod scope;

pub use component::{Component, Declarations, Instance};
pub use error::{BindError, Error, RegistryError, Result, ScopeError};
pub use host::{Definition, Host};
pub use kind::{AnyElement, Captured, ElementKind, Target};
pub use naming::{derive_name, string_tag};
pub use registry::{Registry, resolve_name, validate_name};
pub use router::{BindingId, Router};
pub use scope::Scope;

pub use falsework_dom as dom;
pub use falsework_runtime as runtime;

/// Everything a component definition usually needs.
pub mod prelude {
    pub use crate::component::{Component, Declarations, Instance};
    pub use crate::error::Error;
    pub use crate::host::Host;
    pub use crate::kind::{
        Anchor, AnyElement, Button, Captured, Div, ElementKind, Form, Image, Input, Label,
        ListItem, Paragraph, Select, Span, Target, TextArea,
    };
    pub use falsework_dom::{Document, Element, Event, Node, ShadowMode, ShadowRootInit};
    pub use falsework_runtime::render::html;
    pub use falsework_runtime::reactive::{bind_mapped, bind_mapped2, bind_prop};
    pub use falsework_runtime::{Binding, HostConfig, Markup, Prop, Scheduling};
}
