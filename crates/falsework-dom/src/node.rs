#![forbid(unsafe_code)]

//! Arena-backed document tree and the handles that address it.
//!
//! A [`Document`] owns every node it creates. Handles ([`Node`], [`Element`],
//! [`ShadowRoot`]) are cheap clones of the document handle plus a [`NodeId`];
//! they stay valid for the lifetime of the document even after the node is
//! detached. The arena never reclaims slots: a detached subtree keeps its
//! storage until the document itself is dropped.
//!
//! # Invariants
//!
//! 1. A node has at most one parent, and a parent lists each child once.
//! 2. Shadow roots are never children of another node; they are reachable
//!    only through their host's `shadow` slot.
//! 3. An element hosts at most one shadow root.
//! 4. The window node is not part of the tree. Event paths visit it after
//!    the document node.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Invalid insertion | Non-container parent, cycle, or shadow root child | [`DomError::HierarchyRequest`] |
//! | Foreign child | `remove_child` / `replace_child` on a non-child | [`DomError::NotFound`] |
//! | Foreign document | Any tree mutation given a node of another document | [`DomError::WrongDocument`] |
//! | Second shadow root | `attach_shadow` on an existing host | [`DomError::ShadowRootExists`] |
//! | Invalid shadow host | `attach_shadow` on a tag outside [`SHADOW_HOSTS`] without a hyphen | [`DomError::ShadowRootUnsupported`] |

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use crate::error::DomError;
use crate::event::{Callback, Event, Listener, ListenerId, ListenerOptions};
use crate::selector::{SelectorError, SelectorList};

/// Elements that never have a closing tag when serialized.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Built-in tags that may host a shadow root. Custom element names (any
/// tag with a hyphen) may as well.
pub const SHADOW_HOSTS: &[&str] = &[
    "article", "aside", "blockquote", "body", "div", "footer", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "main", "nav", "p", "section", "span",
];

/// Elements whose text children are serialized without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Index of a node inside its document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw arena index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Visibility of a shadow root from outside its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowMode {
    /// `Element::shadow_root()` returns `None`.
    #[default]
    Closed,
    /// `Element::shadow_root()` returns the root.
    Open,
}

/// Options for [`Element::attach_shadow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShadowRootInit {
    pub mode: ShadowMode,
}

impl ShadowRootInit {
    #[must_use]
    pub const fn closed() -> Self {
        Self {
            mode: ShadowMode::Closed,
        }
    }

    #[must_use]
    pub const fn open() -> Self {
        Self {
            mode: ShadowMode::Open,
        }
    }
}

/// Public view of a node's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Window,
    Document,
    Element,
    Text,
    ShadowRoot,
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Window,
    Document,
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    ShadowRoot {
        host: NodeId,
        mode: ShadowMode,
    },
}

pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) shadow: Option<NodeId>,
    pub(crate) listeners: Vec<Listener>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            shadow: None,
            listeners: Vec::new(),
        }
    }
}

pub(crate) struct Tree {
    nodes: Vec<NodeData>,
    pub(crate) window: NodeId,
    pub(crate) document: NodeId,
}

impl Tree {
    fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            window: NodeId(0),
            document: NodeId(0),
        };
        tree.window = tree.alloc(NodeKind::Window);
        tree.document = tree.alloc(NodeKind::Document);
        tree
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(kind));
        id
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    pub(crate) fn node_type(&self, id: NodeId) -> NodeType {
        match self.get(id).kind {
            NodeKind::Window => NodeType::Window,
            NodeKind::Document => NodeType::Document,
            NodeKind::Element { .. } => NodeType::Element,
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::ShadowRoot { .. } => NodeType::ShadowRoot,
        }
    }

    pub(crate) fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.get(id).kind {
            NodeKind::Element { tag, .. } => Some(tag.as_str()),
            _ => None,
        }
    }

    pub(crate) fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.get(id).kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Parent if it is an element. Stops at shadow roots and the document.
    pub(crate) fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)
            .parent
            .filter(|p| matches!(self.get(*p).kind, NodeKind::Element { .. }))
    }

    pub(crate) fn element_siblings(&self, id: NodeId) -> Vec<NodeId> {
        match self.get(id).parent {
            Some(parent) => self
                .get(parent)
                .children
                .iter()
                .copied()
                .filter(|c| matches!(self.get(*c).kind, NodeKind::Element { .. }))
                .collect(),
            None => vec![id],
        }
    }

    /// Topmost node reachable through parent links (no shadow crossing).
    pub(crate) fn root_of(&self, mut id: NodeId) -> NodeId {
        while let Some(parent) = self.get(id).parent {
            id = parent;
        }
        id
    }

    /// Whether `ancestor` is `node` or one of its ancestors, following
    /// shadow roots into their hosts.
    pub(crate) fn is_shadow_including_inclusive_ancestor(
        &self,
        ancestor: NodeId,
        node: NodeId,
    ) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = match self.get(id).kind {
                NodeKind::ShadowRoot { host, .. } => Some(host),
                _ => self.get(id).parent,
            };
        }
        false
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.get(id).parent;
        }
        false
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let parent_ok = matches!(
            self.get(parent).kind,
            NodeKind::Document | NodeKind::Element { .. } | NodeKind::ShadowRoot { .. }
        );
        let child_ok = matches!(
            self.get(child).kind,
            NodeKind::Element { .. } | NodeKind::Text(_)
        );
        if !parent_ok || !child_ok || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.get_mut(child).parent.take() {
            self.get_mut(parent).children.retain(|c| *c != child);
        }
    }

    fn text_content(&self, id: NodeId, out: &mut String) {
        match &self.get(id).kind {
            NodeKind::Text(data) => out.push_str(data),
            NodeKind::Window => {}
            _ => {
                for child in &self.get(id).children {
                    self.text_content(*child, out);
                }
            }
        }
    }

    fn serialize(&self, id: NodeId, out: &mut String) {
        match &self.get(id).kind {
            NodeKind::Text(data) => {
                let raw = self
                    .get(id)
                    .parent
                    .and_then(|parent| self.tag(parent))
                    .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
                if raw {
                    out.push_str(data);
                } else {
                    out.push_str(&v_htmlescape::escape(data).to_string());
                }
            }
            NodeKind::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&v_htmlescape::escape(value).to_string());
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                self.serialize_children(id, out);
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            NodeKind::Document | NodeKind::ShadowRoot { .. } => self.serialize_children(id, out),
            NodeKind::Window => {}
        }
    }

    fn serialize_children(&self, id: NodeId, out: &mut String) {
        for child in &self.get(id).children {
            self.serialize(*child, out);
        }
    }

    /// Descendants of `root` in tree order, excluding `root` and never
    /// entering shadow roots.
    pub(crate) fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.get(root).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.get(id).children.iter().rev().copied());
        }
        out
    }
}

/// Shared handle to a document arena.
///
/// Cloning is cheap; clones address the same tree.
#[derive(Clone)]
pub struct Document {
    tree: Rc<RefCell<Tree>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.tree.borrow().nodes.len())
            .finish()
    }
}

impl Document {
    /// Create an empty document with its window.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: Rc::new(RefCell::new(Tree::new())),
        }
    }

    /// Reject nodes allocated by another document before indexing with them.
    fn check_owner(&self, node: &Node) -> Result<(), DomError> {
        if *self == node.doc {
            Ok(())
        } else {
            Err(DomError::WrongDocument { child: node.id })
        }
    }

    pub(crate) fn tree(&self) -> std::cell::Ref<'_, Tree> {
        self.tree.borrow()
    }

    pub(crate) fn tree_mut(&self) -> std::cell::RefMut<'_, Tree> {
        self.tree.borrow_mut()
    }

    /// The window: the shared broadcast target above the document.
    #[must_use]
    pub fn window(&self) -> Node {
        let id = self.tree().window;
        self.node(id)
    }

    /// The document node itself.
    #[must_use]
    pub fn root(&self) -> Node {
        let id = self.tree().document;
        self.node(id)
    }

    /// Handle for an existing node id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Node {
        Node {
            doc: self.clone(),
            id,
        }
    }

    /// Element handle for `id`, if the node is an element.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<Element> {
        self.node(id).as_element()
    }

    /// Create a detached element. The tag is stored lowercase.
    pub fn create_element(&self, tag: &str) -> Element {
        let id = self.tree_mut().alloc(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        });
        Element(self.node(id))
    }

    /// Create a detached text node.
    pub fn create_text(&self, data: impl Into<String>) -> Node {
        let id = self.tree_mut().alloc(NodeKind::Text(data.into()));
        self.node(id)
    }

    /// Number of nodes ever allocated in this document, detached ones
    /// included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.tree().nodes.len()
    }
}

/// Handle to any node in a [`Document`].
#[derive(Clone)]
pub struct Node {
    doc: Document,
    id: NodeId,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.doc == other.doc
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.doc.tree();
        match &tree.get(self.id).kind {
            NodeKind::Element { tag, .. } => write!(f, "Node(<{tag}> {:?})", self.id),
            NodeKind::Text(data) => write!(f, "Node(#text {data:?})"),
            other => write!(f, "Node({:?} {:?})", NodeTypeName(other), self.id),
        }
    }
}

struct NodeTypeName<'a>(&'a NodeKind);

impl fmt::Debug for NodeTypeName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            NodeKind::Window => "#window",
            NodeKind::Document => "#document",
            NodeKind::ShadowRoot { .. } => "#shadow-root",
            NodeKind::Element { .. } => "element",
            NodeKind::Text(_) => "#text",
        };
        f.write_str(name)
    }
}

impl Node {
    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.doc.tree().node_type(self.id)
    }

    #[must_use]
    pub fn as_element(&self) -> Option<Element> {
        (self.node_type() == NodeType::Element).then(|| Element(self.clone()))
    }

    #[must_use]
    pub fn as_shadow_root(&self) -> Option<ShadowRoot> {
        (self.node_type() == NodeType::ShadowRoot).then(|| ShadowRoot(self.clone()))
    }

    #[must_use]
    pub fn parent(&self) -> Option<Node> {
        let parent = self.doc.tree().get(self.id).parent;
        parent.map(|id| self.doc.node(id))
    }

    #[must_use]
    pub fn children(&self) -> Vec<Node> {
        let ids = self.doc.tree().get(self.id).children.clone();
        ids.into_iter().map(|id| self.doc.node(id)).collect()
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.doc.tree().get(self.id).children.len()
    }

    /// Data of a text node; `None` for every other kind.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        match &self.doc.tree().get(self.id).kind {
            NodeKind::Text(data) => Some(data.clone()),
            _ => None,
        }
    }

    /// Replace the data of a text node.
    ///
    /// # Errors
    ///
    /// [`DomError::NotText`] when the node is not a text node.
    pub fn set_text(&self, data: &str) -> Result<(), DomError> {
        let mut tree = self.doc.tree_mut();
        match &mut tree.get_mut(self.id).kind {
            NodeKind::Text(current) => {
                data.clone_into(current);
                Ok(())
            }
            _ => Err(DomError::NotText(self.id)),
        }
    }

    /// Concatenated text of this node and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.doc.tree().text_content(self.id, &mut out);
        out
    }

    /// Serialize this node (elements include their own tag).
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.doc.tree().serialize(self.id, &mut out);
        out
    }

    /// Serialize the children of this node.
    #[must_use]
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        self.doc.tree().serialize_children(self.id, &mut out);
        out
    }

    /// Append `child`, detaching it from any previous parent.
    ///
    /// # Errors
    ///
    /// [`DomError::HierarchyRequest`] for invalid kinds or cycles,
    /// [`DomError::WrongDocument`] when `child` is foreign.
    pub fn append_child(&self, child: &Node) -> Result<(), DomError> {
        self.insert_before(child, None)
    }

    /// Insert `child` before `reference` (append when `None`).
    ///
    /// # Errors
    ///
    /// [`DomError::HierarchyRequest`] for invalid kinds or cycles,
    /// [`DomError::NotFound`] when `reference` is not a child of `self`,
    /// [`DomError::WrongDocument`] when either node is foreign.
    pub fn insert_before(&self, child: &Node, reference: Option<&Node>) -> Result<(), DomError> {
        self.doc.check_owner(child)?;
        if let Some(reference) = reference {
            self.doc.check_owner(reference)?;
        }
        let mut tree = self.doc.tree_mut();
        tree.check_insert(self.id, child.id)?;
        if let Some(reference) = reference
            && tree.get(reference.id).parent != Some(self.id)
        {
            return Err(DomError::NotFound {
                parent: self.id,
                child: reference.id,
            });
        }
        tree.detach(child.id);
        let children = &tree.get(self.id).children;
        let position = reference
            .and_then(|r| children.iter().position(|c| *c == r.id))
            .unwrap_or(children.len());
        tree.get_mut(self.id).children.insert(position, child.id);
        tree.get_mut(child.id).parent = Some(self.id);
        Ok(())
    }

    /// Detach `child` from this node.
    ///
    /// # Errors
    ///
    /// [`DomError::NotFound`] when `child` is not a child of `self`,
    /// [`DomError::WrongDocument`] when it is foreign.
    pub fn remove_child(&self, child: &Node) -> Result<(), DomError> {
        self.doc.check_owner(child)?;
        let mut tree = self.doc.tree_mut();
        if tree.get(child.id).parent != Some(self.id) {
            return Err(DomError::NotFound {
                parent: self.id,
                child: child.id,
            });
        }
        tree.detach(child.id);
        Ok(())
    }

    /// Put `new` where `old` currently is. Replacing a child with itself
    /// leaves the tree unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`Node::insert_before`] plus [`DomError::NotFound`] for `old`.
    pub fn replace_child(&self, new: &Node, old: &Node) -> Result<(), DomError> {
        if new == old {
            self.doc.check_owner(old)?;
            if self.doc.tree().get(old.id).parent != Some(self.id) {
                return Err(DomError::NotFound {
                    parent: self.id,
                    child: old.id,
                });
            }
            return Ok(());
        }
        self.insert_before(new, Some(old))?;
        self.remove_child(old)
    }

    /// Detach this node from its parent, if any.
    pub fn remove(&self) {
        self.doc.tree_mut().detach(self.id);
    }

    /// Remove all children and insert a single text node (none when empty).
    pub fn set_text_content(&self, data: &str) {
        let children = self.doc.tree().get(self.id).children.clone();
        {
            let mut tree = self.doc.tree_mut();
            for child in children {
                tree.detach(child);
            }
        }
        if !data.is_empty() {
            let text = self.doc.create_text(data);
            // Containers always accept text children; windows and text nodes
            // silently keep no children.
            let _ = self.append_child(&text);
        }
    }

    /// Register an event listener on this node.
    pub fn add_event_listener(
        &self,
        event_type: &str,
        options: ListenerOptions,
        callback: impl Fn(&Event) + 'static,
    ) -> ListenerId {
        self.add_listener_rc(event_type, options, Rc::new(callback))
    }

    pub(crate) fn add_listener_rc(
        &self,
        event_type: &str,
        options: ListenerOptions,
        callback: Callback,
    ) -> ListenerId {
        let listener = Listener::new(event_type, options, callback);
        let id = listener.id;
        self.doc.tree_mut().get_mut(self.id).listeners.push(listener);
        id
    }

    /// Remove a listener. Returns whether it was registered here.
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        let mut tree = self.doc.tree_mut();
        let listeners = &mut tree.get_mut(self.id).listeners;
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        listeners.len() != before
    }

    /// Number of listeners registered on this node.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.doc.tree().get(self.id).listeners.len()
    }

    /// Dispatch `event` with this node as the target.
    ///
    /// Returns `false` when a listener called `prevent_default`.
    pub fn dispatch_event(&self, event: &Event) -> bool {
        self.doc.dispatch(self.id, event)
    }

    /// First descendant element matching `selectors` (tree order, same
    /// tree scope).
    #[must_use]
    pub fn query_selector(&self, selectors: &SelectorList) -> Option<Element> {
        let tree = self.doc.tree();
        tree.descendants(self.id)
            .into_iter()
            .find(|id| selectors.matches_in(&tree, *id))
            .map(|id| Element(self.doc.node(id)))
    }

    /// All descendant elements matching `selectors` in tree order.
    #[must_use]
    pub fn query_selector_all(&self, selectors: &SelectorList) -> Vec<Element> {
        let tree = self.doc.tree();
        tree.descendants(self.id)
            .into_iter()
            .filter(|id| selectors.matches_in(&tree, *id))
            .map(|id| Element(self.doc.node(id)))
            .collect()
    }
}

/// Handle to an element node.
#[derive(Clone, PartialEq, Eq)]
pub struct Element(Node);

impl Deref for Element {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.0
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl Element {
    /// The generic node handle.
    #[must_use]
    pub fn as_node(&self) -> &Node {
        &self.0
    }

    /// Lowercase tag, e.g. `click-counter`.
    #[must_use]
    pub fn local_name(&self) -> String {
        self.doc
            .tree()
            .tag(self.id)
            .map(str::to_owned)
            .unwrap_or_default()
    }

    /// Uppercase tag, e.g. `CLICK-COUNTER`.
    #[must_use]
    pub fn tag_name(&self) -> String {
        self.local_name().to_ascii_uppercase()
    }

    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.doc.tree().attribute(self.id, name).map(str::to_owned)
    }

    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.doc.tree().attribute(self.id, name).is_some()
    }

    /// Set an attribute, keeping the position of an existing one.
    pub fn set_attribute(&self, name: &str, value: &str) {
        let mut tree = self.doc.tree_mut();
        if let NodeKind::Element { attrs, .. } = &mut tree.get_mut(self.id).kind {
            let name = name.to_ascii_lowercase();
            match attrs.iter_mut().find(|(k, _)| *k == name) {
                Some((_, current)) => value.clone_into(current),
                None => attrs.push((name, value.to_owned())),
            }
        }
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attribute(&self, name: &str) -> bool {
        let mut tree = self.doc.tree_mut();
        if let NodeKind::Element { attrs, .. } = &mut tree.get_mut(self.id).kind {
            let before = attrs.len();
            attrs.retain(|(k, _)| k != name);
            return attrs.len() != before;
        }
        false
    }

    /// Attributes in insertion order.
    #[must_use]
    pub fn attributes(&self) -> Vec<(String, String)> {
        match &self.doc.tree().get(self.id).kind {
            NodeKind::Element { attrs, .. } => attrs.clone(),
            _ => Vec::new(),
        }
    }

    #[must_use]
    pub fn class_list(&self) -> Vec<String> {
        self.get_attribute("class")
            .map(|c| c.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.doc
            .tree()
            .attribute(self.id, "class")
            .is_some_and(|c| c.split_whitespace().any(|token| token == class))
    }

    #[must_use]
    pub fn parent_element(&self) -> Option<Element> {
        let parent = self.doc.tree().parent_element(self.id);
        parent.map(|id| Element(self.doc.node(id)))
    }

    /// Parse `selectors` and test this element against them.
    ///
    /// # Errors
    ///
    /// [`SelectorError`] when `selectors` is malformed.
    pub fn matches(&self, selectors: &str) -> Result<bool, SelectorError> {
        let list = SelectorList::parse(selectors)?;
        Ok(self.matches_list(&list))
    }

    /// Test this element against a parsed selector list.
    #[must_use]
    pub fn matches_list(&self, selectors: &SelectorList) -> bool {
        selectors.matches_in(&self.doc.tree(), self.id)
    }

    /// Nearest inclusive ancestor (inside the same tree scope) matching
    /// `selectors`.
    #[must_use]
    pub fn closest(&self, selectors: &SelectorList) -> Option<Element> {
        let tree = self.doc.tree();
        let mut cursor = Some(self.id);
        while let Some(id) = cursor {
            if selectors.matches_in(&tree, id) {
                return Some(Element(self.doc.node(id)));
            }
            cursor = tree.parent_element(id);
        }
        None
    }

    /// Attach a shadow root to this element.
    ///
    /// # Errors
    ///
    /// [`DomError::ShadowRootUnsupported`] when the tag cannot host one,
    /// [`DomError::ShadowRootExists`] when one is already attached.
    pub fn attach_shadow(&self, init: ShadowRootInit) -> Result<ShadowRoot, DomError> {
        let mut tree = self.doc.tree_mut();
        let tag = tree.tag(self.id).unwrap_or_default();
        if !tag.contains('-') && !SHADOW_HOSTS.contains(&tag) {
            return Err(DomError::ShadowRootUnsupported {
                tag: tag.to_owned(),
            });
        }
        if tree.get(self.id).shadow.is_some() {
            let tag = tree.tag(self.id).unwrap_or_default().to_owned();
            return Err(DomError::ShadowRootExists { tag });
        }
        let root = tree.alloc(NodeKind::ShadowRoot {
            host: self.id,
            mode: init.mode,
        });
        tree.get_mut(self.id).shadow = Some(root);
        drop(tree);
        tracing::trace!(host = ?self.id, mode = ?init.mode, "attached shadow root");
        Ok(ShadowRoot(self.doc.node(root)))
    }

    /// The shadow root, visible only when it was attached in open mode.
    #[must_use]
    pub fn shadow_root(&self) -> Option<ShadowRoot> {
        let tree = self.doc.tree();
        let root = tree.get(self.id).shadow?;
        match tree.get(root).kind {
            NodeKind::ShadowRoot {
                mode: ShadowMode::Open,
                ..
            } => Some(ShadowRoot(self.doc.node(root))),
            _ => None,
        }
    }

    /// Whether a shadow root (open or closed) is attached.
    #[must_use]
    pub fn has_shadow_root(&self) -> bool {
        self.doc.tree().get(self.id).shadow.is_some()
    }

    /// Dispatch a bubbling, composed `click`.
    pub fn click(&self) -> bool {
        self.dispatch_event(&Event::click())
    }
}

/// Handle to a shadow root.
#[derive(Clone, PartialEq, Eq)]
pub struct ShadowRoot(Node);

impl Deref for ShadowRoot {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.0
    }
}

impl fmt::Debug for ShadowRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl ShadowRoot {
    #[must_use]
    pub fn as_node(&self) -> &Node {
        &self.0
    }

    #[must_use]
    pub fn mode(&self) -> ShadowMode {
        match self.doc.tree().get(self.id).kind {
            NodeKind::ShadowRoot { mode, .. } => mode,
            _ => ShadowMode::Closed,
        }
    }

    #[must_use]
    pub fn host(&self) -> Element {
        let host = match self.doc.tree().get(self.id).kind {
            NodeKind::ShadowRoot { host, .. } => host,
            _ => self.id,
        };
        Element(self.doc.node(host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_serialize() {
        let doc = Document::new();
        let p = doc.create_element("P");
        p.set_attribute("class", "intro");
        p.append_child(&doc.create_text("hi")).unwrap();
        doc.root().append_child(&p).unwrap();
        assert_eq!(doc.root().inner_html(), r#"<p class="intro">hi</p>"#);
        assert_eq!(p.local_name(), "p");
        assert_eq!(p.tag_name(), "P");
    }

    #[test]
    fn append_moves_between_parents() {
        let doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let child = doc.create_element("span");
        a.append_child(&child).unwrap();
        b.append_child(&child).unwrap();
        assert_eq!(a.child_count(), 0);
        assert_eq!(b.child_count(), 1);
        assert_eq!(child.parent().unwrap(), *b.as_node());
    }

    #[test]
    fn cycles_are_rejected() {
        let doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        outer.append_child(&inner).unwrap();
        let err = inner.append_child(&outer).unwrap_err();
        assert!(matches!(err, DomError::HierarchyRequest { .. }));
    }

    #[test]
    fn text_nodes_cannot_have_children() {
        let doc = Document::new();
        let text = doc.create_text("x");
        let span = doc.create_element("span");
        assert!(text.append_child(&span).is_err());
    }

    #[test]
    fn insert_before_reference() {
        let doc = Document::new();
        let list = doc.create_element("ul");
        let first = doc.create_element("li");
        let second = doc.create_element("li");
        list.append_child(&second).unwrap();
        list.insert_before(&first, Some(&second)).unwrap();
        let ids: Vec<_> = list.children().iter().map(Node::id).collect();
        assert_eq!(ids, vec![first.id(), second.id()]);
    }

    #[test]
    fn replace_child_keeps_position() {
        let doc = Document::new();
        let parent = doc.create_element("div");
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        let c = doc.create_element("i");
        parent.append_child(&a).unwrap();
        parent.append_child(&b).unwrap();
        parent.replace_child(&c, &a).unwrap();
        assert_eq!(parent.inner_html(), "<i></i><b></b>");
        assert!(a.parent().is_none());
    }

    #[test]
    fn remove_child_of_other_parent_fails() {
        let doc = Document::new();
        let parent = doc.create_element("div");
        let stranger = doc.create_element("span");
        assert!(matches!(
            parent.remove_child(&stranger),
            Err(DomError::NotFound { .. })
        ));
    }

    #[test]
    fn attributes_keep_order_and_update_in_place() {
        let doc = Document::new();
        let el = doc.create_element("button");
        el.set_attribute("class", "a");
        el.set_attribute("type", "button");
        el.set_attribute("class", "b");
        assert_eq!(
            el.attributes(),
            vec![
                ("class".to_owned(), "b".to_owned()),
                ("type".to_owned(), "button".to_owned())
            ]
        );
        assert!(el.remove_attribute("type"));
        assert!(!el.has_attribute("type"));
    }

    #[test]
    fn shadow_root_visibility_follows_mode() {
        let doc = Document::new();
        let closed = doc.create_element("x-closed");
        let root = closed.attach_shadow(ShadowRootInit::closed()).unwrap();
        assert!(closed.shadow_root().is_none());
        assert!(closed.has_shadow_root());
        assert_eq!(root.host(), closed);

        let open = doc.create_element("x-open");
        open.attach_shadow(ShadowRootInit::open()).unwrap();
        assert_eq!(open.shadow_root().unwrap().mode(), ShadowMode::Open);
    }

    #[test]
    fn second_shadow_root_is_rejected() {
        let doc = Document::new();
        let host = doc.create_element("x-host");
        host.attach_shadow(ShadowRootInit::default()).unwrap();
        let err = host.attach_shadow(ShadowRootInit::open()).unwrap_err();
        assert_eq!(
            err,
            DomError::ShadowRootExists {
                tag: "x-host".into()
            }
        );
    }

    #[test]
    fn shadow_content_is_not_serialized_with_host() {
        let doc = Document::new();
        let host = doc.create_element("x-host");
        let root = host.attach_shadow(ShadowRootInit::open()).unwrap();
        root.append_child(&doc.create_text("secret")).unwrap();
        assert_eq!(host.to_html(), "<x-host></x-host>");
        assert_eq!(root.inner_html(), "secret");
    }

    #[test]
    fn set_text_content_replaces_children() {
        let doc = Document::new();
        let p = doc.create_element("p");
        p.append_child(&doc.create_element("b")).unwrap();
        p.set_text_content("plain");
        assert_eq!(p.inner_html(), "plain");
        p.set_text_content("");
        assert_eq!(p.child_count(), 0);
    }

    #[test]
    fn foreign_nodes_are_rejected_by_every_mutation() {
        let doc = Document::new();
        let other = Document::new();
        for _ in 0..8 {
            other.create_element("div");
        }
        let stranger = other.create_element("span");
        let parent = doc.create_element("div");
        let child = doc.create_element("b");
        parent.append_child(&child).unwrap();

        let wrong = DomError::WrongDocument {
            child: stranger.id(),
        };
        assert_eq!(doc.root().append_child(&stranger), Err(wrong.clone()));
        assert_eq!(parent.insert_before(&stranger, Some(&child)), Err(wrong.clone()));
        assert_eq!(parent.remove_child(&stranger), Err(wrong.clone()));
        assert_eq!(parent.replace_child(&stranger, &child), Err(wrong.clone()));
        assert_eq!(parent.replace_child(&child, &stranger), Err(wrong));
        assert_eq!(parent.inner_html(), "<b></b>");
        assert!(stranger.parent().is_none());
    }

    #[test]
    fn replacing_a_child_with_itself_keeps_it() {
        let doc = Document::new();
        let parent = doc.create_element("div");
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        parent.append_child(&a).unwrap();
        parent.append_child(&b).unwrap();
        parent.replace_child(&a, &a).unwrap();
        assert_eq!(parent.inner_html(), "<a></a><b></b>");
        assert_eq!(a.parent().unwrap(), *parent.as_node());

        let loose = doc.create_element("i");
        assert!(matches!(
            parent.replace_child(&loose, &loose),
            Err(DomError::NotFound { .. })
        ));
    }

    #[test]
    fn style_and_script_text_is_not_escaped() {
        let doc = Document::new();
        let style = doc.create_element("style");
        style.set_text_content("a > b { content: \"&\" }");
        assert_eq!(style.to_html(), "<style>a > b { content: \"&\" }</style>");
        let script = doc.create_element("script");
        script.set_text_content("if (a < b) {}");
        assert_eq!(script.to_html(), "<script>if (a < b) {}</script>");
        let p = doc.create_element("p");
        p.set_text_content("a > b");
        assert_eq!(p.to_html(), "<p>a &gt; b</p>");
    }

    #[test]
    fn detached_nodes_keep_their_slots() {
        let doc = Document::new();
        let before = doc.node_count();
        let list = doc.create_element("ul");
        for _ in 0..3 {
            let item = doc.create_element("li");
            list.append_child(&item).unwrap();
            item.remove();
        }
        assert_eq!(doc.node_count(), before + 4);
        assert_eq!(list.id().index(), before);
        assert_eq!(list.child_count(), 0);
    }

    #[test]
    fn only_valid_hosts_accept_a_shadow_root() {
        let doc = Document::new();
        for tag in ["div", "section", "x-widget"] {
            assert!(doc.create_element(tag).attach_shadow(ShadowRootInit::open()).is_ok());
        }
        let input = doc.create_element("input");
        assert_eq!(
            input.attach_shadow(ShadowRootInit::open()).unwrap_err(),
            DomError::ShadowRootUnsupported {
                tag: "input".into()
            }
        );
        assert!(!input.has_shadow_root());
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let doc = Document::new();
        let input = doc.create_element("input");
        input.set_attribute("value", "1");
        assert_eq!(input.to_html(), r#"<input value="1">"#);
    }
}
