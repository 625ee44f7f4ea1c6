#![forbid(unsafe_code)]

//! Reactive properties for Falsework components.
//!
//! This module provides the write-hook primitives a component's state is
//! built from:
//!
//! - [`Prop`]: a named, shared, version-tracked value that notifies its
//!   hooks on every write.
//! - [`Subscription`]: RAII guard that detaches a hook on drop.
//! - [`WriteHooks`]: the registration point the component layer relies on,
//!   taking a property name and an on-write callback.
//! - [`Binding`]: a read-only view derived from one or more props.
//! - [`BindingScope`]: holds every subscription of one component instance
//!   and releases them together.
//!
//! # Architecture
//!
//! `Prop<T>` uses `Rc` + `RefCell` for single-threaded shared ownership.
//! Hooks are stored as `Weak` function pointers and cleaned up lazily
//! during notification; the strong side lives in the [`Subscription`].
//!
//! # Invariants
//!
//! 1. Version increments exactly once per write.
//! 2. Hooks are notified in registration order.
//! 3. Every write notifies, including a write of an equal value.
//!    Coalescing is the scheduler's job, not the property's.
//! 4. Dropping a [`Subscription`] removes the hook before the next write.
//! 5. Hooks run after the new value is stored, so a hook reading the
//!    property observes the written value.

pub mod binding;
pub mod prop;

pub use binding::{Binding, BindingScope, bind_mapped, bind_mapped2, bind_prop};
pub use prop::{Prop, Subscription, WriteHooks};
