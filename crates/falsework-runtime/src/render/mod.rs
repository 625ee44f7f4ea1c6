#![forbid(unsafe_code)]

//! Template content and the engine that writes it into the tree.
//!
//! Templates produce [`Markup`]; a [`Renderer`] makes a container's
//! children reflect it. [`PatchRenderer`] is idempotent: rendering the
//! same content twice leaves the second pass with nothing to do.

pub mod markup;
pub mod patch;

pub use markup::{ElementMarkup, Markup, html};
pub use patch::{PatchRenderer, PatchStats, Renderer};
