#![forbid(unsafe_code)]

//! Named reactive property with write hooks.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Hook<T> = dyn Fn(&T);

struct PropInner<T> {
    name: &'static str,
    value: RefCell<T>,
    version: Cell<u64>,
    hooks: RefCell<Vec<Weak<Hook<T>>>>,
}

/// A shared, named value that notifies its hooks on every write.
///
/// Clones share the same storage, so a hook registered through one clone
/// sees writes made through another.
pub struct Prop<T> {
    inner: Rc<PropInner<T>>,
}

impl<T> Clone for Prop<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Prop<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prop")
            .field("name", &self.inner.name)
            .field("value", &*self.inner.value.borrow())
            .field("version", &self.inner.version.get())
            .finish()
    }
}

impl<T: Clone + 'static> Prop<T> {
    /// Create a property with an initial value. The initial value does not
    /// count as a write.
    pub fn new(name: &'static str, value: T) -> Self {
        Self {
            inner: Rc::new(PropInner {
                name,
                value: RefCell::new(value),
                version: Cell::new(0),
                hooks: RefCell::new(Vec::new()),
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Borrow the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.inner.value.borrow())
    }

    /// Store `value` and notify every hook.
    pub fn set(&self, value: T) {
        let snapshot = value.clone();
        *self.inner.value.borrow_mut() = value;
        self.written(&snapshot);
    }

    /// Mutate in place and notify every hook.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let snapshot = {
            let mut value = self.inner.value.borrow_mut();
            f(&mut *value);
            value.clone()
        };
        self.written(&snapshot);
    }

    /// Number of writes since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Register a hook that receives the written value.
    pub fn subscribe(&self, hook: impl Fn(&T) + 'static) -> Subscription {
        let strong: Rc<Hook<T>> = Rc::new(hook);
        self.inner.hooks.borrow_mut().push(Rc::downgrade(&strong));
        Subscription::new(strong)
    }

    /// Live hooks. Dead weak entries are counted until the next write.
    #[must_use]
    pub fn hook_count(&self) -> usize {
        self.inner
            .hooks
            .borrow()
            .iter()
            .filter(|h| h.strong_count() > 0)
            .count()
    }

    fn written(&self, value: &T) {
        self.inner.version.set(self.inner.version.get() + 1);
        let live: Vec<Rc<Hook<T>>> = {
            let mut hooks = self.inner.hooks.borrow_mut();
            hooks.retain(|h| h.strong_count() > 0);
            hooks.iter().filter_map(Weak::upgrade).collect()
        };
        tracing::trace!(
            prop = self.inner.name,
            version = self.inner.version.get(),
            hooks = live.len(),
            "prop written"
        );
        for hook in live {
            hook(value);
        }
    }
}

impl<T: Clone + Default + 'static> Prop<T> {
    /// Property initialized with `T::default()`.
    pub fn with_default(name: &'static str) -> Self {
        Self::new(name, T::default())
    }
}

/// RAII guard for a registered hook. Dropping it detaches the hook.
#[must_use = "dropping a subscription detaches its hook immediately"]
pub struct Subscription {
    _guard: Box<dyn Any>,
}

impl Subscription {
    fn new<T: 'static>(strong: Rc<Hook<T>>) -> Self {
        Self {
            _guard: Box::new(strong),
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

/// Registration point for "run this whenever the property is written".
///
/// The component layer never touches property storage; it only names the
/// property and attaches a callback.
pub trait WriteHooks {
    /// Property name, used in diagnostics.
    fn name(&self) -> &str;

    /// Attach `hook`, run after every write.
    fn on_write(&self, hook: Rc<dyn Fn()>) -> Subscription;
}

impl<T: Clone + 'static> WriteHooks for Prop<T> {
    fn name(&self) -> &str {
        self.inner.name
    }

    fn on_write(&self, hook: Rc<dyn Fn()>) -> Subscription {
        self.subscribe(move |_| hook())
    }
}
