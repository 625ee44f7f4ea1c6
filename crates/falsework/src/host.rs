#![forbid(unsafe_code)]

//! The component host: document, registry, scheduler and live instances.

use std::any::TypeId;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use falsework_dom::{Document, Element, Node, NodeId};
use falsework_runtime::{
    FrameScheduler, HostConfig, ImmediateScheduler, PatchRenderer, Renderer, Scheduler, Scheduling,
};

use crate::component::instance::{Mounted, Services, mount};
use crate::component::{Component, Declarations, Instance};
use crate::error::{Error, RegistryError};
use crate::registry::{Registry, resolve_name};

type MountFn = dyn Fn(&Element, &Services) -> Result<Rc<dyn Mounted>, Error>;

/// A registered component type.
#[derive(Clone)]
pub struct Definition {
    identifier: &'static str,
    type_id: TypeId,
    mount: Rc<MountFn>,
}

impl Definition {
    /// Build the definition of `C`, running its declarations once.
    ///
    /// # Errors
    ///
    /// The first invalid selector or kind mismatch among the declarations.
    pub fn of<C: Component>() -> Result<Self, Error> {
        let mut declarations = Declarations::<C>::default();
        C::declare(&mut declarations);
        let declarations = Rc::new(declarations.finish()?);
        Ok(Self {
            identifier: C::IDENTIFIER,
            type_id: TypeId::of::<C>(),
            mount: Rc::new(move |element: &Element, services: &Services| {
                mount::<C>(element, &declarations, services).map(Instance::into_mounted)
            }),
        })
    }

    #[must_use]
    pub fn identifier(&self) -> &'static str {
        self.identifier
    }

    /// Whether this is the definition of `C`.
    #[must_use]
    pub fn is<C: Component>(&self) -> bool {
        self.type_id == TypeId::of::<C>()
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

/// Owns a document and the components defined for it.
pub struct Host {
    document: Document,
    config: HostConfig,
    registry: RefCell<Registry<Definition>>,
    services: Services,
    frames: Option<Rc<FrameScheduler>>,
    instances: RefCell<AHashMap<NodeId, Rc<dyn Mounted>>>,
    ticks: Cell<u64>,
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("scheduling", &self.config.scheduling)
            .field("defined", &self.registry.borrow().len())
            .field("instances", &self.instances.borrow().len())
            .field("ticks", &self.ticks.get())
            .finish()
    }
}

impl Host {
    /// A host with default configuration (frame scheduling).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(HostConfig::default())
    }

    #[must_use]
    pub fn with_config(config: HostConfig) -> Self {
        let frames = match config.scheduling {
            Scheduling::Frame => Some(Rc::new(FrameScheduler::new())),
            Scheduling::Immediate => None,
        };
        let scheduler: Rc<dyn Scheduler> = match &frames {
            Some(frames) => Rc::clone(frames) as Rc<dyn Scheduler>,
            None => Rc::new(ImmediateScheduler),
        };
        tracing::debug!(scheduling = %config.scheduling, "host created");
        Self {
            document: Document::new(),
            config,
            registry: RefCell::new(Registry::new()),
            services: Services {
                scheduler,
                renderer: Rc::new(PatchRenderer::new()),
            },
            frames,
            instances: RefCell::new(AHashMap::new()),
            ticks: Cell::new(0),
        }
    }

    /// Replace the render engine for instances constructed afterwards.
    #[must_use]
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.services.renderer = Rc::new(renderer);
        self
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The shared broadcast target above the document.
    #[must_use]
    pub fn window(&self) -> Node {
        self.document.window()
    }

    #[must_use]
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Register `C` under its explicit or derived name. Returns the name.
    ///
    /// # Errors
    ///
    /// [`RegistryError`] for empty, invalid or taken names; [`BindError`]
    /// for invalid declarations. Nothing is registered on failure.
    ///
    /// Once registered, the name stays bound. With
    /// [`HostConfig::upgrade_on_define`] set, existing elements that fail to
    /// construct are logged and skipped; the others are still upgraded.
    ///
    /// [`BindError`]: crate::error::BindError
    pub fn define<C: Component>(&self) -> Result<String, Error> {
        let name = resolve_name(C::IDENTIFIER, C::NAME)?;
        self.define_as::<C>(&name)?;
        Ok(name)
    }

    /// Register `C` under `name`, ignoring its own naming.
    ///
    /// # Errors
    ///
    /// As [`Host::define`].
    pub fn define_as<C: Component>(&self, name: &str) -> Result<(), Error> {
        let definition = Definition::of::<C>()?;
        self.registry.borrow_mut().register(name, definition)?;
        if self.config.upgrade_on_define {
            let (upgraded, failures) = self.upgrade_all(&self.document.root());
            if upgraded > 0 || !failures.is_empty() {
                tracing::debug!(
                    name,
                    upgraded,
                    failed = failures.len(),
                    "existing elements upgraded"
                );
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn is_defined(&self, name: &str) -> bool {
        self.registry.borrow().contains(name)
    }

    /// Registered names in registration order.
    #[must_use]
    pub fn defined_names(&self) -> Vec<String> {
        self.registry.borrow().names().map(str::to_owned).collect()
    }

    /// Create an element; registered tags get a component instance.
    ///
    /// # Errors
    ///
    /// Construction failures of the registered component.
    pub fn create_element(&self, tag: &str) -> Result<Element, Error> {
        let element = self.document.create_element(tag);
        let definition = self.registry.borrow().get(&element.local_name()).cloned();
        if let Some(definition) = definition {
            self.mount_with(&definition, &element)?;
        }
        Ok(element)
    }

    /// Create an element for `C` under the first name it was registered as.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotDefined`] when `C` was never registered.
    pub fn construct<C: Component>(&self) -> Result<Instance<C>, Error> {
        let name = self
            .registry
            .borrow()
            .find_name(Definition::is::<C>)
            .map(str::to_owned)
            .ok_or_else(|| RegistryError::NotDefined {
                what: format!("type {}", C::IDENTIFIER),
            })?;
        let element = self.create_element(&name)?;
        self.instance::<C>(&element).ok_or_else(|| {
            RegistryError::NotDefined {
                what: format!("<{name}>"),
            }
            .into()
        })
    }

    /// Instantiate registered components for elements under `root` that
    /// have none yet. Returns how many were created.
    ///
    /// Every candidate is attempted even when an earlier one fails.
    ///
    /// # Errors
    ///
    /// The first construction failure; successful upgrades stay.
    pub fn upgrade(&self, root: &Node) -> Result<usize, Error> {
        let (upgraded, failures) = self.upgrade_all(root);
        match failures.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(upgraded),
        }
    }

    fn upgrade_all(&self, root: &Node) -> (usize, Vec<Error>) {
        let mut candidates = Vec::new();
        collect_elements(root, &mut candidates);
        let mut upgraded = 0;
        let mut failures = Vec::new();
        for element in candidates {
            if self.instances.borrow().contains_key(&element.id()) {
                continue;
            }
            let definition = self.registry.borrow().get(&element.local_name()).cloned();
            let Some(definition) = definition else {
                continue;
            };
            match self.mount_with(&definition, &element) {
                Ok(()) => upgraded += 1,
                Err(error) => {
                    tracing::warn!(tag = %element.local_name(), %error, "upgrade failed");
                    failures.push(error);
                }
            }
        }
        (upgraded, failures)
    }

    /// The instance of `C` living on `element`, if any.
    #[must_use]
    pub fn instance<C: Component>(&self, element: &Element) -> Option<Instance<C>> {
        if element.document() != &self.document {
            return None;
        }
        let mounted = self.instances.borrow().get(&element.id()).cloned()?;
        Instance::from_any(mounted.into_any())
    }

    /// Detach `element` and tear down every instance in its subtree: the
    /// element itself, its descendants, and instances nested in their
    /// scopes. Returns whether any instance was torn down.
    pub fn remove(&self, element: &Element) -> bool {
        element.remove();
        if element.document() != &self.document {
            return false;
        }
        let mut pending = vec![element.clone()];
        collect_elements(element, &mut pending);
        let mut torn_down = 0usize;
        while let Some(candidate) = pending.pop() {
            let Some(mounted) = self.instances.borrow_mut().remove(&candidate.id()) else {
                continue;
            };
            collect_elements(&mounted.scope_root(), &mut pending);
            mounted.teardown();
            torn_down += 1;
        }
        if torn_down > 0 {
            tracing::debug!(tag = %element.local_name(), torn_down, "subtree removed");
        }
        torn_down > 0
    }

    /// Number of live instances.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances.borrow().len()
    }

    /// Advance one frame, running deferred renders. Returns how many ran.
    ///
    /// With immediate scheduling nothing is ever deferred and this returns 0.
    pub fn tick(&self) -> usize {
        self.ticks.set(self.ticks.get() + 1);
        match &self.frames {
            Some(frames) => frames.run_frame().tasks,
            None => 0,
        }
    }

    /// Renders waiting for the next tick.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.frames.as_ref().map_or(0, |f| f.pending())
    }

    fn mount_with(&self, definition: &Definition, element: &Element) -> Result<(), Error> {
        let mounted = (definition.mount)(element, &self.services)?;
        self.instances.borrow_mut().insert(element.id(), mounted);
        Ok(())
    }
}

/// Elements below `node` in tree order, not entering shadow trees.
fn collect_elements(node: &Node, out: &mut Vec<Element>) {
    for child in node.children() {
        if let Some(element) = child.as_element() {
            out.push(element);
        }
        collect_elements(&child, out);
    }
}
