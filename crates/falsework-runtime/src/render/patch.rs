#![forbid(unsafe_code)]

//! Index-based patching of a container's children against [`Markup`].
//!
//! Children are compared position by position after fragments are
//! flattened:
//!
//! | Existing | Wanted | Action |
//! |----------|--------|--------|
//! | element `<t>` | element `<t>` | sync attributes, recurse |
//! | text | text | update data when it differs |
//! | anything else | anything | replace with a fresh subtree |
//! | none | anything | append a fresh subtree |
//! | extra nodes | none | remove |
//!
//! Patching content that is already present performs no mutations, so
//! repeated renders of the same state leave the tree (and node identity)
//! untouched.

use std::fmt;

use falsework_dom::{DomError, Element, Node, NodeType};

use super::markup::{ElementMarkup, Markup};

/// Mutation counts for one render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchStats {
    /// Nodes built from scratch, descendants included.
    pub created: usize,
    /// Existing nodes swapped for a fresh subtree.
    pub replaced: usize,
    /// Surplus nodes detached.
    pub removed: usize,
    /// Attributes set or removed on kept elements.
    pub attributes: usize,
    /// Text nodes whose data changed.
    pub texts: usize,
}

impl PatchStats {
    /// Total number of tree mutations.
    #[must_use]
    pub fn mutations(&self) -> usize {
        self.created + self.replaced + self.removed + self.attributes + self.texts
    }

    /// Whether the render left the tree untouched.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.mutations() == 0
    }
}

impl fmt::Display for PatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created={} replaced={} removed={} attributes={} texts={}",
            self.created, self.replaced, self.removed, self.attributes, self.texts
        )
    }
}

/// Writes content into a container node.
pub trait Renderer {
    /// Make the children of `target` reflect `content`.
    ///
    /// # Errors
    ///
    /// Propagates [`DomError`] when `target` cannot hold children.
    fn render(&self, target: &Node, content: &[Markup]) -> Result<PatchStats, DomError>;
}

/// The default [`Renderer`]: minimal in-place patching.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatchRenderer;

impl PatchRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for PatchRenderer {
    fn render(&self, target: &Node, content: &[Markup]) -> Result<PatchStats, DomError> {
        let mut stats = PatchStats::default();
        patch_children(target, content, &mut stats)?;
        tracing::trace!(target_node = ?target.id(), %stats, "patched");
        Ok(stats)
    }
}

fn patch_children(parent: &Node, content: &[Markup], stats: &mut PatchStats) -> Result<(), DomError> {
    let wanted = Markup::flatten(content);
    let existing = parent.children();

    for (index, item) in wanted.iter().enumerate() {
        match existing.get(index) {
            Some(node) => match (node.as_element(), item) {
                (Some(el), Markup::Element(m)) if el.local_name() == m.tag => {
                    patch_element(&el, m, stats)?;
                }
                (None, Markup::Text(data)) if node.node_type() == NodeType::Text => {
                    if node.text().as_deref() != Some(data.as_str()) {
                        node.set_text(data)?;
                        stats.texts += 1;
                    }
                }
                _ => {
                    let fresh = build(parent, item, stats)?;
                    parent.replace_child(&fresh, node)?;
                    stats.replaced += 1;
                }
            },
            None => {
                let fresh = build(parent, item, stats)?;
                parent.append_child(&fresh)?;
            }
        }
    }

    for surplus in existing.iter().skip(wanted.len()) {
        parent.remove_child(surplus)?;
        stats.removed += 1;
    }
    Ok(())
}

fn patch_element(el: &Element, wanted: &ElementMarkup, stats: &mut PatchStats) -> Result<(), DomError> {
    for (name, _) in el.attributes() {
        if !wanted.attrs.iter().any(|(n, _)| *n == name) {
            el.remove_attribute(&name);
            stats.attributes += 1;
        }
    }
    for (name, value) in &wanted.attrs {
        if el.get_attribute(name).as_deref() != Some(value.as_str()) {
            el.set_attribute(name, value);
            stats.attributes += 1;
        }
    }
    patch_children(el, &wanted.children, stats)
}

fn build(parent: &Node, item: &Markup, stats: &mut PatchStats) -> Result<Node, DomError> {
    let doc = parent.document();
    stats.created += 1;
    match item {
        Markup::Text(data) => Ok(doc.create_text(data.as_str())),
        Markup::Element(m) => {
            let el = doc.create_element(&m.tag);
            for (name, value) in &m.attrs {
                el.set_attribute(name, value);
            }
            for child in Markup::flatten(&m.children) {
                let node = build(&el, child, stats)?;
                el.append_child(&node)?;
            }
            Ok(el.as_node().clone())
        }
        // Flattened content never yields fragments.
        Markup::Fragment(_) => Ok(doc.create_text("")),
    }
}
