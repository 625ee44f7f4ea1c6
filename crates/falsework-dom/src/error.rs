#![forbid(unsafe_code)]

//! Errors raised by tree mutations.

use crate::node::NodeId;

/// Errors from document tree operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The child cannot be placed under the parent (wrong node kind, or the
    /// insertion would create a cycle).
    #[error("node {child:?} cannot be inserted into {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    /// The referenced node is not a child of the given parent.
    #[error("node {child:?} is not a child of {parent:?}")]
    NotFound { parent: NodeId, child: NodeId },
    /// The node belongs to another document.
    #[error("node {child:?} belongs to a different document")]
    WrongDocument { child: NodeId },
    /// The element already hosts a shadow root.
    #[error("<{tag}> already hosts a shadow root")]
    ShadowRootExists { tag: String },
    /// The element's tag cannot host a shadow root.
    #[error("<{tag}> cannot host a shadow root")]
    ShadowRootUnsupported { tag: String },
    /// A text operation was applied to a node that is not a text node.
    #[error("node {0:?} is not a text node")]
    NotText(NodeId),
}
