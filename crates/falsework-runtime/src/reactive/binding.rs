#![forbid(unsafe_code)]

//! Derived views over [`Prop`] values and per-instance subscription scopes.
//!
//! A [`Binding<T>`] encapsulates one or more props plus a transform, making
//! it easy to derive display values (a score from two counters, a label
//! from a count) that templates read on every render.
//!
//! # Usage
//!
//! ```
//! use falsework_runtime::reactive::{Prop, bind_mapped2};
//!
//! let up = Prop::new("up", 3_i64);
//! let down = Prop::new("down", 1_i64);
//! let score = bind_mapped2(&up, &down, |u, d| u - d);
//! assert_eq!(score.get(), 2);
//!
//! down.set(5);
//! assert_eq!(score.get(), -2);
//! ```
//!
//! # Invariants
//!
//! 1. `Binding::get()` always returns the current (not stale) value.
//! 2. A binding's transform is applied on every `get()` call (no caching).
//! 3. Bindings are `Clone` and share their sources.
//! 4. A [`BindingScope`] releases every held subscription when dropped or
//!    cleared; afterwards none of its hooks fire.
//!
//! # Failure Modes
//!
//! - Transform panic: propagates to the caller of `get()`.
//! - Source prop dropped while binding alive: binding still works (the
//!   binding keeps the shared storage alive).

use std::rc::Rc;

use super::prop::{Prop, Subscription, WriteHooks};

// ---------------------------------------------------------------------------
// Binding<T>: one-way read binding
// ---------------------------------------------------------------------------

/// A read-only binding with an optional transform.
///
/// Evaluates lazily on each `get()` call.
pub struct Binding<T> {
    eval: Rc<dyn Fn() -> T>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            eval: Rc::clone(&self.eval),
        }
    }
}

impl<T: std::fmt::Debug + 'static> std::fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("value", &self.get())
            .finish()
    }
}

impl<T: 'static> Binding<T> {
    /// Create a binding that evaluates `f` on each `get()` call.
    pub fn new(f: impl Fn() -> T + 'static) -> Self {
        Self { eval: Rc::new(f) }
    }

    /// Get the current bound value.
    #[must_use]
    pub fn get(&self) -> T {
        (self.eval)()
    }

    /// Apply a further transform, returning a new `Binding`.
    pub fn then<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Binding<U> {
        Binding {
            eval: Rc::new(move || f((self.eval)())),
        }
    }
}

/// Direct binding to a prop (identity transform).
pub fn bind_prop<T: Clone + 'static>(source: &Prop<T>) -> Binding<T> {
    let src = source.clone();
    Binding {
        eval: Rc::new(move || src.get()),
    }
}

/// Mapped binding: `source` value transformed by `map`.
pub fn bind_mapped<S: Clone + 'static, T: 'static>(
    source: &Prop<S>,
    map: impl Fn(&S) -> T + 'static,
) -> Binding<T> {
    let src = source.clone();
    Binding {
        eval: Rc::new(move || src.with(|v| map(v))),
    }
}

/// Binding over two props combined by `map`.
pub fn bind_mapped2<S1: Clone + 'static, S2: Clone + 'static, T: 'static>(
    s1: &Prop<S1>,
    s2: &Prop<S2>,
    map: impl Fn(&S1, &S2) -> T + 'static,
) -> Binding<T> {
    let src1 = s1.clone();
    let src2 = s2.clone();
    Binding {
        eval: Rc::new(move || src1.with(|v1| src2.with(|v2| map(v1, v2)))),
    }
}

// ---------------------------------------------------------------------------
// BindingScope: lifecycle management
// ---------------------------------------------------------------------------

/// Collects the subscriptions of one component instance.
///
/// When the scope is dropped, all held subscriptions are released,
/// disconnecting the instance from its props.
///
/// # Invariants
///
/// 1. After drop or `clear()`, no hook registered through this scope fires.
/// 2. `clear()` leaves the scope reusable.
/// 3. `binding_count()` is always accurate.
pub struct BindingScope {
    subscriptions: Vec<Subscription>,
}

impl BindingScope {
    /// Create an empty binding scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }

    /// Keep `sub` alive until the scope is dropped or cleared.
    pub fn hold(&mut self, sub: Subscription) {
        self.subscriptions.push(sub);
    }

    /// Subscribe to a prop's written values within this scope.
    pub fn subscribe<T: Clone + 'static>(
        &mut self,
        source: &Prop<T>,
        callback: impl Fn(&T) + 'static,
    ) -> &mut Self {
        let sub = source.subscribe(callback);
        self.subscriptions.push(sub);
        self
    }

    /// Attach an on-write hook to any [`WriteHooks`] source within this
    /// scope.
    pub fn on_write(&mut self, source: &dyn WriteHooks, hook: Rc<dyn Fn()>) -> &mut Self {
        let sub = source.on_write(hook);
        self.subscriptions.push(sub);
        self
    }

    /// Number of subscriptions held.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether the scope holds no subscriptions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release all subscriptions immediately (scope becomes empty but reusable).
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}

impl Default for BindingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BindingScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingScope")
            .field("binding_count", &self.subscriptions.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
