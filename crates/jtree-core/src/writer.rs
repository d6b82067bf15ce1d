//! Event-driven writer that builds a [`Document`] in memory.
//!
//! The writer keeps a cursor on the node that receives the next child:
//!
//! - `Unset`: nothing is open. The first container becomes the root; a value
//!   written here is kept as a lone scalar.
//! - `InContainer(id)`: the next value or container is appended to `id`.
//! - `InMember(id)`: the next value or container becomes the member's only
//!   child. Attaching a value closes the member at once; attaching a container
//!   closes it when that container ends.
//!
//! Every protocol violation is an illegal transition of this state machine and
//! is rejected before the tree is touched.
//!
//! # Example
//!
//! ```
//! use jtree_core::{TreeWriter, Value};
//!
//! let mut w = TreeWriter::new();
//! w.begin_object().unwrap();
//! w.property_name("a").unwrap();
//! w.value(1).unwrap();
//! w.end().unwrap();
//!
//! let root = w.root().unwrap();
//! assert_eq!(root.get("a").and_then(|n| n.as_value().cloned()), Some(Value::Integer(1)));
//! ```

use crate::error::ProtocolError;
use crate::protocol::{Event, JsonSink};
use crate::settings::WriterSettings;
use crate::tree::{ContainerFlavor, Document, Node, NodeId, NodeKind};
use crate::value::Value;

/// Where the next event attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Unset,
    InContainer(NodeId),
    InMember(NodeId),
}

/// A finished document: a tree, or a lone scalar when no container was opened.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Tree(Document),
    Scalar(Value),
}

impl Token {
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Token::Tree(doc) => Some(doc),
            Token::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Token::Tree(_) => None,
            Token::Scalar(v) => Some(v),
        }
    }

    /// Root container of a tree token.
    pub fn root(&self) -> Option<Node<'_>> {
        self.as_document().and_then(Document::root)
    }

    /// Emit the events that rebuild this token.
    pub fn write_to<S: JsonSink + ?Sized>(&self, sink: &mut S) -> Result<(), ProtocolError> {
        match self {
            Token::Tree(doc) => match doc.root() {
                Some(root) => root.write_to(sink),
                None => Ok(()),
            },
            Token::Scalar(v) => sink.write_value(v.clone()),
        }
    }
}

/// Borrowed view of the writer's current result.
#[derive(Debug, Clone, Copy)]
pub enum TokenRef<'a> {
    Node(Node<'a>),
    Scalar(&'a Value),
}

/// Forward-only writer that materializes a JSON token tree.
#[derive(Debug, Default)]
pub struct TreeWriter {
    doc: Document,
    cursor: Cursor,
    scalar: Option<Value>,
    settings: WriterSettings,
}

impl TreeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: WriterSettings) -> Self {
        TreeWriter {
            settings,
            ..Self::default()
        }
    }

    /// Resume writing into `container`, an existing container of `doc`.
    pub fn with_container(doc: Document, container: NodeId) -> Result<Self, ProtocolError> {
        if !doc.get(container).is_some_and(|node| node.is_container()) {
            return Err(ProtocolError::NotAContainer);
        }
        Ok(TreeWriter {
            doc,
            cursor: Cursor::InContainer(container),
            ..Self::default()
        })
    }

    pub fn settings(&self) -> &WriterSettings {
        &self.settings
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    pub fn begin_object(&mut self) -> Result<(), ProtocolError> {
        self.begin(NodeKind::container(ContainerFlavor::Object, None))
    }

    pub fn begin_array(&mut self) -> Result<(), ProtocolError> {
        self.begin(NodeKind::container(ContainerFlavor::Array, None))
    }

    pub fn begin_constructor(&mut self, name: &str) -> Result<(), ProtocolError> {
        self.begin(NodeKind::container(
            ContainerFlavor::Constructor,
            Some(name.to_string()),
        ))
    }

    /// Close the innermost open container, whatever its flavor.
    pub fn end(&mut self) -> Result<(), ProtocolError> {
        self.close_container(None)
    }

    pub fn end_object(&mut self) -> Result<(), ProtocolError> {
        self.close_container(Some(ContainerFlavor::Object))
    }

    pub fn end_array(&mut self) -> Result<(), ProtocolError> {
        self.close_container(Some(ContainerFlavor::Array))
    }

    pub fn end_constructor(&mut self) -> Result<(), ProtocolError> {
        self.close_container(Some(ContainerFlavor::Constructor))
    }

    /// Start an object member; the next event supplies its value.
    pub fn property_name(&mut self, key: &str) -> Result<(), ProtocolError> {
        let object = match self.cursor {
            Cursor::InContainer(id) if self.flavor_of(id) == Some(ContainerFlavor::Object) => id,
            _ => {
                return self.reject(ProtocolError::PropertyNameOutsideObject {
                    key: key.to_string(),
                })
            }
        };
        self.reserve()?;
        let member = self.doc.attach(
            object,
            NodeKind::Member {
                key: key.to_string(),
                child: None,
            },
        )?;
        self.cursor = Cursor::InMember(member);
        Ok(())
    }

    /// Write a scalar of any kind that converts into [`Value`].
    pub fn value(&mut self, value: impl Into<Value>) -> Result<(), ProtocolError> {
        let value = match value.into() {
            Value::Date(d) => Value::Date(self.settings.date_time_zone_handling.apply(d)),
            v => v,
        };
        match self.attach_point()? {
            None => self.scalar = Some(value),
            Some(parent) => {
                self.reserve()?;
                self.doc.attach(parent, NodeKind::Value(value))?;
                if let Cursor::InMember(member) = self.cursor {
                    self.cursor = self.after_member(member);
                }
            }
        }
        Ok(())
    }

    pub fn write_null(&mut self) -> Result<(), ProtocolError> {
        self.value(Value::Null)
    }

    pub fn write_undefined(&mut self) -> Result<(), ProtocolError> {
        self.value(Value::Undefined)
    }

    /// Write pre-formatted JSON text as a value node.
    pub fn write_raw(&mut self, json: &str) -> Result<(), ProtocolError> {
        self.value(Value::raw(json))
    }

    pub fn write_comment(&mut self, text: &str) -> Result<(), ProtocolError> {
        self.value(Value::comment(text))
    }

    /// Copy a subtree of another document into this writer.
    pub fn write_node(&mut self, node: Node<'_>) -> Result<(), ProtocolError> {
        node.write_to(self)
    }

    // ------------------------------------------------------------------------
    // Results
    // ------------------------------------------------------------------------

    /// The root container, if one was opened.
    pub fn root(&self) -> Option<Node<'_>> {
        self.doc.root()
    }

    /// The lone scalar, if a value was written with no container open.
    pub fn scalar(&self) -> Option<&Value> {
        self.scalar.as_ref()
    }

    /// The root container if there is one, else the lone scalar.
    pub fn token(&self) -> Option<TokenRef<'_>> {
        match self.doc.root() {
            Some(root) => Some(TokenRef::Node(root)),
            None => self.scalar.as_ref().map(TokenRef::Scalar),
        }
    }

    /// Hand the built document to the caller.
    pub fn into_token(self) -> Option<Token> {
        if self.doc.root().is_some() {
            Some(Token::Tree(self.doc))
        } else {
            self.scalar.map(Token::Scalar)
        }
    }

    /// Number of open containers above the cursor.
    pub fn depth(&self) -> usize {
        let mut at = match self.cursor {
            Cursor::Unset => None,
            Cursor::InContainer(id) | Cursor::InMember(id) => Some(id),
        };
        let mut depth = 0;
        while let Some(id) = at {
            if matches!(self.doc.kind(id), NodeKind::Container { .. }) {
                depth += 1;
            }
            at = self.doc.parent(id);
        }
        depth
    }

    /// Whether a root was written and closed, or a lone scalar written.
    pub fn is_complete(&self) -> bool {
        self.cursor == Cursor::Unset && self.is_started()
    }

    /// Check that every container has been closed.
    pub fn close(&self) -> Result<(), ProtocolError> {
        match self.cursor {
            Cursor::Unset => Ok(()),
            _ => Err(ProtocolError::Incomplete { open: self.depth() }),
        }
    }

    /// Build a token from a complete event sequence.
    pub fn from_events(
        events: impl IntoIterator<Item = Event>,
    ) -> Result<Option<Token>, ProtocolError> {
        let mut writer = TreeWriter::new();
        for event in events {
            writer.write_event(event)?;
        }
        writer.close()?;
        Ok(writer.into_token())
    }

    // ------------------------------------------------------------------------
    // Cursor transitions
    // ------------------------------------------------------------------------

    fn begin(&mut self, kind: NodeKind) -> Result<(), ProtocolError> {
        let parent = self.attach_point()?;
        self.reserve()?;
        let id = match parent {
            None => self.doc.set_root(kind)?,
            Some(parent) => self.doc.attach(parent, kind)?,
        };
        tracing::trace!(node = ?id, parent = ?parent, "opened container");
        self.cursor = Cursor::InContainer(id);
        Ok(())
    }

    fn close_container(&mut self, expected: Option<ContainerFlavor>) -> Result<(), ProtocolError> {
        let id = match self.cursor {
            Cursor::Unset => return self.reject(ProtocolError::EndWithoutStart),
            Cursor::InMember(member) => {
                let key = self.key_of(member);
                return self.reject(ProtocolError::EndInsideMember { key });
            }
            Cursor::InContainer(id) => id,
        };
        if let (Some(expected), Some(found)) = (expected, self.flavor_of(id)) {
            if expected != found {
                return self.reject(ProtocolError::MismatchedEnd { expected, found });
            }
        }

        self.cursor = match self.doc.parent(id) {
            None => Cursor::Unset,
            Some(parent) => match self.doc.kind(parent) {
                // The member was waiting on this container; it closes with it.
                NodeKind::Member { .. } => self.after_member(parent),
                _ => Cursor::InContainer(parent),
            },
        };
        tracing::trace!(node = ?id, cursor = ?self.cursor, "closed container");
        Ok(())
    }

    /// Node that receives the next value or container; `None` at top level.
    fn attach_point(&self) -> Result<Option<NodeId>, ProtocolError> {
        match self.cursor {
            Cursor::Unset if self.is_started() => self.reject(ProtocolError::DocumentComplete),
            Cursor::Unset => Ok(None),
            Cursor::InContainer(id) if self.flavor_of(id) == Some(ContainerFlavor::Object) => {
                self.reject(ProtocolError::MissingPropertyName)
            }
            Cursor::InContainer(id) | Cursor::InMember(id) => Ok(Some(id)),
        }
    }

    /// Fails once the configured node limit is reached.
    fn reserve(&self) -> Result<(), ProtocolError> {
        match self.settings.max_nodes {
            Some(limit) if self.doc.len() >= limit => {
                self.reject(ProtocolError::TooManyNodes { limit })
            }
            _ => Ok(()),
        }
    }

    fn after_member(&self, member: NodeId) -> Cursor {
        match self.doc.parent(member) {
            Some(object) => Cursor::InContainer(object),
            None => Cursor::Unset,
        }
    }

    fn is_started(&self) -> bool {
        self.doc.root().is_some() || self.scalar.is_some()
    }

    fn flavor_of(&self, id: NodeId) -> Option<ContainerFlavor> {
        match self.doc.kind(id) {
            NodeKind::Container { flavor, .. } => Some(*flavor),
            _ => None,
        }
    }

    fn key_of(&self, member: NodeId) -> String {
        match self.doc.kind(member) {
            NodeKind::Member { key, .. } => key.clone(),
            _ => String::new(),
        }
    }

    fn reject<T>(&self, err: ProtocolError) -> Result<T, ProtocolError> {
        tracing::debug!(cursor = ?self.cursor, error = %err, "rejected write event");
        Err(err)
    }
}

impl JsonSink for TreeWriter {
    fn write_start_object(&mut self) -> Result<(), ProtocolError> {
        self.begin_object()
    }

    fn write_start_array(&mut self) -> Result<(), ProtocolError> {
        self.begin_array()
    }

    fn write_start_constructor(&mut self, name: &str) -> Result<(), ProtocolError> {
        self.begin_constructor(name)
    }

    fn write_property_name(&mut self, key: &str) -> Result<(), ProtocolError> {
        self.property_name(key)
    }

    fn write_value(&mut self, value: Value) -> Result<(), ProtocolError> {
        self.value(value)
    }

    fn write_end(&mut self, flavor: ContainerFlavor) -> Result<(), ProtocolError> {
        self.close_container(Some(flavor))
    }
}
