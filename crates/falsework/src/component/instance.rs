#![forbid(unsafe_code)]

//! Live component instances.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use falsework_dom::{Element, Node};
use falsework_runtime::reactive::BindingScope;
use falsework_runtime::render::html;
use falsework_runtime::{Renderer, Scheduler};

use super::Component;
use super::declare::Declarations;
use super::queue::RenderQueue;
use crate::error::Error;
use crate::naming::string_tag;
use crate::router::Router;
use crate::scope::Scope;

/// Shared services an instance renders and schedules through.
#[derive(Clone)]
pub(crate) struct Services {
    pub(crate) scheduler: Rc<dyn Scheduler>,
    pub(crate) renderer: Rc<dyn Renderer>,
}

pub(crate) struct Core<C> {
    pub(crate) state: C,
    host: Element,
    scope: Scope,
    router: RefCell<Router>,
    subscriptions: RefCell<BindingScope>,
    services: Services,
    queue: RenderQueue,
    connected: Cell<bool>,
}

/// Type-erased view of a mounted instance, kept by the host.
pub(crate) trait Mounted {
    fn teardown(&self);
    /// The instance's scope root, where nested instances may live.
    fn scope_root(&self) -> Node;
    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<C: Component> Mounted for Core<C> {
    fn teardown(&self) {
        Core::teardown(self);
    }

    fn scope_root(&self) -> Node {
        self.scope.root().as_node().clone()
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

impl<C: Component> Core<C> {
    fn request_render(self: &Rc<Self>) {
        if !self.connected.get() || !self.queue.mark_pending() {
            return;
        }
        let weak = Rc::downgrade(self);
        tracing::trace!(
            component = C::IDENTIFIER,
            via = self.services.scheduler.label(),
            "render scheduled"
        );
        self.services.scheduler.schedule(Box::new(move || {
            if let Some(core) = weak.upgrade()
                && core.queue.take_pending()
            {
                core.render();
            }
        }));
    }

    fn render(&self) {
        if !self.connected.get() {
            return;
        }
        self.queue.run(|| self.render_once());
    }

    fn render_once(&self) -> bool {
        let Some(template) = self.state.template() else {
            tracing::trace!(component = C::IDENTIFIER, "no template; render skipped");
            return false;
        };
        let mut content = vec![template];
        if let Some(css) = self.state.css() {
            content.push(html::style(css.into_owned()));
        }
        let _span = tracing::debug_span!(
            "render",
            component = C::IDENTIFIER,
            render = self.queue.renders() + 1
        )
        .entered();
        match self.services.renderer.render(self.scope.root(), &content) {
            Ok(stats) => {
                tracing::trace!(%stats, "render applied");
                true
            }
            Err(err) => {
                tracing::warn!(%err, "render failed");
                false
            }
        }
    }

    fn teardown(&self) {
        if !self.connected.replace(false) {
            return;
        }
        let removed = self.router.borrow_mut().teardown();
        let released = {
            let mut subs = self.subscriptions.borrow_mut();
            let count = subs.binding_count();
            subs.clear();
            count
        };
        self.queue.clear();
        tracing::debug!(
            component = C::IDENTIFIER,
            listeners = removed,
            subscriptions = released,
            "instance torn down"
        );
    }
}

/// Construct and wire one instance of `C` on `element`.
pub(crate) fn mount<C: Component>(
    element: &Element,
    declarations: &Declarations<C>,
    services: &Services,
) -> Result<Instance<C>, Error> {
    let scope = Scope::create(element, C::shadow_root_init())?;
    let core = Rc::new(Core {
        state: C::init(),
        host: element.clone(),
        scope,
        router: RefCell::new(Router::new()),
        subscriptions: RefCell::new(BindingScope::new()),
        services: services.clone(),
        queue: RenderQueue::default(),
        connected: Cell::new(true),
    });
    let weak = Rc::downgrade(&core);

    {
        let mut subs = core.subscriptions.borrow_mut();
        for decl in &declarations.reactive {
            let hook: Rc<dyn Fn()> = {
                let weak = Weak::clone(&weak);
                let on_change = decl.on_change.clone();
                Rc::new(move || {
                    let Some(core) = weak.upgrade() else {
                        return;
                    };
                    if let Some(on_change) = &on_change {
                        on_change(&core.state);
                    }
                    core.request_render();
                })
            };
            subs.hold((decl.attach)(&core.state, hook));
        }
    }

    let bound = {
        let mut router = core.router.borrow_mut();
        declarations
            .bindings
            .iter()
            .try_for_each(|bind| bind(&mut *router, &core.scope, &weak).map(drop))
    };
    if let Err(err) = bound {
        core.teardown();
        return Err(err.into());
    }

    tracing::debug!(
        component = C::IDENTIFIER,
        tag = %element.local_name(),
        reactive = declarations.reactive.len(),
        bindings = declarations.bindings.len(),
        "instance mounted"
    );
    core.request_render();
    Ok(Instance(core))
}

/// Handle to a live component instance.
///
/// Clones share the instance.
pub struct Instance<C>(Rc<Core<C>>);

impl<C> Clone for Instance<C> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<C: Component> Instance<C> {
    pub(crate) fn from_any(any: Rc<dyn Any>) -> Option<Self> {
        any.downcast::<Core<C>>().ok().map(Self)
    }

    pub(crate) fn into_mounted(self) -> Rc<dyn Mounted> {
        self.0
    }

    /// The host element.
    #[must_use]
    pub fn host(&self) -> &Element {
        &self.0.host
    }

    /// The component's state.
    #[must_use]
    pub fn state(&self) -> &C {
        &self.0.state
    }

    /// Schedule a render unless one is already pending.
    pub fn request_render(&self) {
        self.0.request_render();
    }

    /// Render synchronously, whether or not a render is pending.
    pub fn render_now(&self) {
        self.0.render();
    }

    #[must_use]
    pub fn render_pending(&self) -> bool {
        self.0.queue.is_pending()
    }

    /// Renders that wrote into the scope so far.
    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.0.queue.renders()
    }

    /// Event listeners currently attached for this instance.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.0.router.borrow().binding_count()
    }

    /// Reactive property hooks currently held.
    #[must_use]
    pub fn reactive_count(&self) -> usize {
        self.0.subscriptions.borrow().binding_count()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.0.connected.get()
    }

    /// Detach every listener and property hook. Later writes and requests
    /// do nothing.
    pub fn teardown(&self) {
        self.0.teardown();
    }

    /// `HTML<PascalCase>Element` for the registered tag.
    #[must_use]
    pub fn string_tag(&self) -> String {
        string_tag(&self.0.host.local_name())
    }
}

impl<C: Component> fmt::Display for Instance<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[object {}]", self.string_tag())
    }
}

impl<C: Component> fmt::Debug for Instance<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("component", &C::IDENTIFIER)
            .field("host", &self.0.host)
            .field("renders", &self.0.queue.renders())
            .field("connected", &self.0.connected.get())
            .finish()
    }
}
