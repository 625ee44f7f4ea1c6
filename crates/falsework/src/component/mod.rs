#![forbid(unsafe_code)]

//! Components: typed state, a template, and declarative event bindings.
//!
//! # Lifecycle
//!
//! 1. **Define**: [`Host::define`](crate::Host::define) resolves the
//!    element name, runs [`Component::declare`] once to build the
//!    declaration table, and registers the definition.
//! 2. **Construct**: for each element with the registered tag, the host
//!    attaches the isolated scope, calls [`Component::init`], hooks every
//!    reactive property, attaches every event binding, and requests the
//!    first render.
//! 3. **Update**: a write to a reactive property requests a render. Requests
//!    coalesce until the scheduler runs them, so many writes in one tick
//!    produce one render that observes the final values.
//! 4. **Teardown**: [`Host::remove`](crate::Host::remove) or
//!    [`Instance::teardown`] detaches all listeners and hooks at once.
//!
//! # Example
//!
//! ```
//! use falsework::prelude::*;
//!
//! struct Greeting {
//!     name: Prop<String>,
//! }
//!
//! impl Component for Greeting {
//!     const IDENTIFIER: &'static str = "GreetingCard";
//!
//!     fn init() -> Self {
//!         Self { name: Prop::new("name", "world".to_owned()) }
//!     }
//!
//!     fn declare(decl: &mut Declarations<Self>) {
//!         decl.reactive(|c| &c.name);
//!     }
//!
//!     fn template(&self) -> Option<Markup> {
//!         Some(html::el("p").text(format!("hello {}", self.name.get())))
//!     }
//! }
//!
//! let host = Host::new();
//! assert_eq!(host.define::<Greeting>().unwrap(), "greeting-card");
//! let card = host.construct::<Greeting>().unwrap();
//! host.tick();
//! assert_eq!(card.render_count(), 1);
//! assert_eq!(card.to_string(), "[object HTMLGreetingCardElement]");
//! ```

use std::borrow::Cow;

use falsework_dom::ShadowRootInit;
use falsework_runtime::Markup;

mod declare;
pub(crate) mod instance;
mod queue;

pub use declare::Declarations;
pub use instance::Instance;

/// A component type.
pub trait Component: Sized + 'static {
    /// Type identifier the element name is derived from.
    const IDENTIFIER: &'static str;

    /// Explicit element name; takes precedence over derivation.
    const NAME: Option<&'static str> = None;

    /// Fresh state for a new instance.
    fn init() -> Self;

    /// Scope options. Closed by default.
    fn shadow_root_init() -> ShadowRootInit {
        ShadowRootInit::closed()
    }

    /// Declare reactive properties and event bindings. Runs once per
    /// definition.
    fn declare(decl: &mut Declarations<Self>) {
        let _ = decl;
    }

    /// Content to render; `None` skips rendering.
    fn template(&self) -> Option<Markup> {
        None
    }

    /// Style text written after the template.
    fn css(&self) -> Option<Cow<'_, str>> {
        None
    }
}
