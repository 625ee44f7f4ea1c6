#![forbid(unsafe_code)]

//! Runtime services for Falsework components.
//!
//! - [`reactive`]: properties with write hooks, derived bindings, and
//!   per-instance subscription scopes.
//! - [`scheduler`]: frame and immediate task scheduling.
//! - [`render`]: the template content model and the idempotent patch
//!   renderer.
//! - [`config`]: host settings from defaults, TOML and the environment.

pub mod config;
pub mod reactive;
pub mod render;
pub mod scheduler;

pub use config::{ConfigError, HostConfig, SCHEDULING_ENV, Scheduling};
pub use reactive::{Binding, BindingScope, Prop, Subscription, WriteHooks};
pub use render::{Markup, PatchRenderer, PatchStats, Renderer};
pub use scheduler::{FrameReport, FrameScheduler, ImmediateScheduler, Scheduler, Task};
