//! Arena-backed JSON token tree.
//!
//! Nodes live in a single `Vec` owned by the [`Document`]. Children are held as
//! [`NodeId`] lists and every node keeps its parent as a `NodeId`, so upward
//! traversal needs no shared ownership and the tree cannot form cycles.
//!
//! # Example
//!
//! ```
//! use jtree_core::{ContainerFlavor, Document, NewNode, Value};
//!
//! let mut doc = Document::new();
//! let root = doc.add(None, NewNode::Object).unwrap();
//! let name = doc.add(Some(root), NewNode::Member("name".into())).unwrap();
//! doc.add(Some(name), NewNode::Value(Value::from("Alice"))).unwrap();
//!
//! let root = doc.root().unwrap();
//! assert_eq!(root.flavor(), Some(ContainerFlavor::Object));
//! assert_eq!(root.get("name").and_then(|n| n.as_value().cloned()), Some(Value::from("Alice")));
//! ```

use crate::error::ProtocolError;
use crate::value::{Value, ValueKind};
use std::fmt;

// ============================================================================
// Core Types
// ============================================================================

/// Largest number of nodes a single document can hold.
pub const MAX_NODES: usize = u32::MAX as usize;

/// Index into the document's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// The three kinds of multi-child container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerFlavor {
    /// Children are members.
    Object,
    Array,
    /// Named call such as `new Date(0)`.
    Constructor,
}

impl fmt::Display for ContainerFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerFlavor::Object => f.write_str("object"),
            ContainerFlavor::Array => f.write_str("array"),
            ContainerFlavor::Constructor => f.write_str("constructor"),
        }
    }
}

/// Type tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Container(ContainerFlavor),
    Member,
    Value(ValueKind),
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Container(flavor) => write!(f, "{flavor}"),
            NodeType::Member => f.write_str("member"),
            NodeType::Value(kind) => write!(f, "{kind}"),
        }
    }
}

/// Payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Container {
        flavor: ContainerFlavor,
        /// Set only for constructors.
        name: Option<String>,
        children: Vec<NodeId>,
    },
    /// One object property. `child` is set exactly once.
    Member { key: String, child: Option<NodeId> },
    Value(Value),
}

impl NodeKind {
    pub(crate) fn container(flavor: ContainerFlavor, name: Option<String>) -> Self {
        NodeKind::Container {
            flavor,
            name,
            children: Vec::new(),
        }
    }

    fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Container { flavor, .. } => NodeType::Container(*flavor),
            NodeKind::Member { .. } => NodeType::Member,
            NodeKind::Value(v) => NodeType::Value(v.kind()),
        }
    }
}

/// A node to insert with [`Document::add`].
#[derive(Debug, Clone, PartialEq)]
pub enum NewNode {
    Object,
    Array,
    Constructor(String),
    Member(String),
    Value(Value),
}

impl From<NewNode> for NodeKind {
    fn from(node: NewNode) -> Self {
        match node {
            NewNode::Object => NodeKind::container(ContainerFlavor::Object, None),
            NewNode::Array => NodeKind::container(ContainerFlavor::Array, None),
            NewNode::Constructor(name) => {
                NodeKind::container(ContainerFlavor::Constructor, Some(name))
            }
            NewNode::Member(key) => NodeKind::Member { key, child: None },
            NewNode::Value(v) => NodeKind::Value(v),
        }
    }
}

/// Internal node storage.
#[derive(Debug, Clone, PartialEq)]
struct NodeData {
    parent: Option<NodeId>,
    /// Index among the parent's children.
    position: usize,
    kind: NodeKind,
}

// ============================================================================
// Document
// ============================================================================

/// A JSON token tree whose root is a container.
///
/// Two documents compare equal when they were built from the same sequence of
/// insertions, i.e. when they are structurally identical.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: Option<NodeId>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// The root container, if one was written.
    pub fn root(&self) -> Option<Node<'_>> {
        self.root.map(|id| Node { doc: self, id })
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<Node<'_>> {
        if id.index() < self.nodes.len() {
            Some(Node { doc: self, id })
        } else {
            None
        }
    }

    /// Total number of nodes, members included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Maximum container nesting; an empty document has depth 0.
    pub fn depth(&self) -> usize {
        self.root().map_or(0, |root| root.depth())
    }

    /// Insert a node, enforcing the structural rules of the tree.
    ///
    /// - With `parent == None` the node becomes the root, which must be a
    ///   container and may only be set once.
    /// - Objects accept only members; arrays and constructors never accept members.
    /// - A member accepts a single non-member child.
    pub fn add(&mut self, parent: Option<NodeId>, node: NewNode) -> Result<NodeId, ProtocolError> {
        let kind = NodeKind::from(node);
        let is_member = matches!(kind, NodeKind::Member { .. });

        let Some(parent) = parent else {
            if self.root.is_some() {
                return Err(ProtocolError::DocumentComplete);
            }
            return match kind {
                NodeKind::Member { key, .. } => Err(ProtocolError::PropertyNameOutsideObject { key }),
                NodeKind::Value(_) => Err(ProtocolError::NotAContainer),
                kind => self.set_root(kind),
            };
        };

        let target = self
            .nodes
            .get(parent.index())
            .ok_or(ProtocolError::NotAContainer)?;
        match (&target.kind, &kind) {
            (NodeKind::Value(_), _) => return Err(ProtocolError::NotAContainer),
            (NodeKind::Container { flavor: ContainerFlavor::Object, .. }, _) if !is_member => {
                return Err(ProtocolError::MissingPropertyName)
            }
            (NodeKind::Container { flavor, .. }, NodeKind::Member { key, .. })
                if *flavor != ContainerFlavor::Object =>
            {
                return Err(ProtocolError::PropertyNameOutsideObject { key: key.clone() })
            }
            (NodeKind::Member { key, child: Some(_) }, _) => {
                return Err(ProtocolError::MemberOccupied { key: key.clone() })
            }
            (NodeKind::Member { .. }, NodeKind::Member { key, .. }) => {
                return Err(ProtocolError::PropertyNameOutsideObject { key: key.clone() })
            }
            _ => {}
        }

        self.attach(parent, kind)
    }

    pub(crate) fn set_root(&mut self, kind: NodeKind) -> Result<NodeId, ProtocolError> {
        let id = self.alloc(None, 0, kind)?;
        self.root = Some(id);
        Ok(id)
    }

    /// Append `kind` as the next child of `parent` without checking compatibility.
    pub(crate) fn attach(&mut self, parent: NodeId, kind: NodeKind) -> Result<NodeId, ProtocolError> {
        let position = match &self.nodes[parent.index()].kind {
            NodeKind::Container { children, .. } => children.len(),
            NodeKind::Member { .. } => 0,
            NodeKind::Value(_) => return Err(ProtocolError::NotAContainer),
        };
        let id = self.alloc(Some(parent), position, kind)?;
        match &mut self.nodes[parent.index()].kind {
            NodeKind::Container { children, .. } => children.push(id),
            NodeKind::Member { child, .. } => {
                debug_assert!(child.is_none(), "member already holds a value");
                *child = Some(id);
            }
            NodeKind::Value(_) => {}
        }
        Ok(id)
    }

    pub(crate) fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    fn alloc(
        &mut self,
        parent: Option<NodeId>,
        position: usize,
        kind: NodeKind,
    ) -> Result<NodeId, ProtocolError> {
        let index = u32::try_from(self.nodes.len())
            .ok()
            .filter(|_| self.nodes.len() < MAX_NODES)
            .ok_or(ProtocolError::TooManyNodes { limit: MAX_NODES })?;
        self.nodes.push(NodeData {
            parent,
            position,
            kind,
        });
        Ok(NodeId(index))
    }

    fn node_data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }
}

// ============================================================================
// Node (navigation handle)
// ============================================================================

/// A borrowed handle for navigating the tree.
#[derive(Clone, Copy)]
pub struct Node<'doc> {
    doc: &'doc Document,
    id: NodeId,
}

impl<'doc> Node<'doc> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'doc Document {
        self.doc
    }

    pub fn kind(&self) -> &'doc NodeKind {
        &self.doc.node_data(self.id).kind
    }

    pub fn node_type(&self) -> NodeType {
        self.kind().node_type()
    }

    /// Container flavor, or `None` for members and values.
    pub fn flavor(&self) -> Option<ContainerFlavor> {
        match self.kind() {
            NodeKind::Container { flavor, .. } => Some(*flavor),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        self.flavor().is_some()
    }

    pub fn parent(&self) -> Option<Node<'doc>> {
        self.doc
            .node_data(self.id)
            .parent
            .map(|id| Node { doc: self.doc, id })
    }

    /// Child handles: a container's children in order, or a member's single value.
    pub fn children(&self) -> impl Iterator<Item = Node<'doc>> + 'doc {
        let doc = self.doc;
        self.child_ids().iter().map(move |&id| Node { doc, id })
    }

    /// The child at `index`, in the order of [`children`](Self::children).
    pub fn child(&self, index: usize) -> Option<Node<'doc>> {
        self.child_ids()
            .get(index)
            .map(|&id| Node { doc: self.doc, id })
    }

    fn child_ids(&self) -> &'doc [NodeId] {
        match self.kind() {
            NodeKind::Container { children, .. } => children,
            NodeKind::Member { child, .. } => child.as_slice(),
            NodeKind::Value(_) => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.child_ids().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first_child(&self) -> Option<Node<'doc>> {
        self.children().next()
    }

    pub fn last_child(&self) -> Option<Node<'doc>> {
        self.child(self.len().checked_sub(1)?)
    }

    /// Index among the parent's children; 0 for the root.
    pub fn position(&self) -> usize {
        self.doc.node_data(self.id).position
    }

    pub fn next_sibling(&self) -> Option<Node<'doc>> {
        self.parent()?.child(self.position() + 1)
    }

    pub fn prev_sibling(&self) -> Option<Node<'doc>> {
        let before = self.position().checked_sub(1)?;
        self.parent()?.child(before)
    }

    /// Scalar payload of a value node.
    pub fn as_value(&self) -> Option<&'doc Value> {
        match self.kind() {
            NodeKind::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Property key of a member node.
    pub fn key(&self) -> Option<&'doc str> {
        match self.kind() {
            NodeKind::Member { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Name of a constructor node.
    pub fn name(&self) -> Option<&'doc str> {
        match self.kind() {
            NodeKind::Container { name, .. } => name.as_deref(),
            _ => None,
        }
    }

    /// The value held by a member node.
    pub fn value(&self) -> Option<Node<'doc>> {
        match self.kind() {
            NodeKind::Member { child, .. } => child.map(|id| Node { doc: self.doc, id }),
            _ => None,
        }
    }

    /// Value of the first member named `key`, if this is an object.
    pub fn get(&self, key: &str) -> Option<Node<'doc>> {
        if self.flavor() != Some(ContainerFlavor::Object) {
            return None;
        }
        self.children()
            .find(|member| member.key() == Some(key))
            .and_then(|member| member.value())
    }

    /// Container nesting below and including this node. Members do not count.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(*self, 0usize)];
        while let Some((node, above)) = stack.pop() {
            let here = if node.is_container() { above + 1 } else { above };
            max = max.max(here);
            stack.extend(node.children().map(|child| (child, here)));
        }
        max
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", self.kind())
            .finish()
    }
}
