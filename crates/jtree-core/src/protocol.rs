//! The write-event vocabulary and the trait every event consumer implements.
//!
//! [`TreeWriter`](crate::TreeWriter) is the tree-building consumer; `Vec<Event>`
//! records events as they arrive. [`Node::write_to`] walks an existing tree and
//! emits the events that would rebuild it.

use crate::error::ProtocolError;
use crate::tree::{ContainerFlavor, Node, NodeKind};
use crate::value::Value;

/// One write event, owned.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StartObject,
    StartArray,
    StartConstructor(String),
    PropertyName(String),
    Value(Value),
    EndObject,
    EndArray,
    EndConstructor,
}

impl Event {
    /// The end event matching a container flavor.
    pub fn end_of(flavor: ContainerFlavor) -> Self {
        match flavor {
            ContainerFlavor::Object => Event::EndObject,
            ContainerFlavor::Array => Event::EndArray,
            ContainerFlavor::Constructor => Event::EndConstructor,
        }
    }
}

/// A consumer of write events.
pub trait JsonSink {
    fn write_start_object(&mut self) -> Result<(), ProtocolError>;

    fn write_start_array(&mut self) -> Result<(), ProtocolError>;

    fn write_start_constructor(&mut self, name: &str) -> Result<(), ProtocolError>;

    fn write_property_name(&mut self, key: &str) -> Result<(), ProtocolError>;

    fn write_value(&mut self, value: Value) -> Result<(), ProtocolError>;

    /// Close the innermost open container, which must be of `flavor`.
    fn write_end(&mut self, flavor: ContainerFlavor) -> Result<(), ProtocolError>;

    /// Dispatch an owned event to the matching method.
    fn write_event(&mut self, event: Event) -> Result<(), ProtocolError> {
        match event {
            Event::StartObject => self.write_start_object(),
            Event::StartArray => self.write_start_array(),
            Event::StartConstructor(name) => self.write_start_constructor(&name),
            Event::PropertyName(key) => self.write_property_name(&key),
            Event::Value(v) => self.write_value(v),
            Event::EndObject => self.write_end(ContainerFlavor::Object),
            Event::EndArray => self.write_end(ContainerFlavor::Array),
            Event::EndConstructor => self.write_end(ContainerFlavor::Constructor),
        }
    }
}

impl JsonSink for Vec<Event> {
    fn write_start_object(&mut self) -> Result<(), ProtocolError> {
        self.push(Event::StartObject);
        Ok(())
    }

    fn write_start_array(&mut self) -> Result<(), ProtocolError> {
        self.push(Event::StartArray);
        Ok(())
    }

    fn write_start_constructor(&mut self, name: &str) -> Result<(), ProtocolError> {
        self.push(Event::StartConstructor(name.to_string()));
        Ok(())
    }

    fn write_property_name(&mut self, key: &str) -> Result<(), ProtocolError> {
        self.push(Event::PropertyName(key.to_string()));
        Ok(())
    }

    fn write_value(&mut self, value: Value) -> Result<(), ProtocolError> {
        self.push(Event::Value(value));
        Ok(())
    }

    fn write_end(&mut self, flavor: ContainerFlavor) -> Result<(), ProtocolError> {
        self.push(Event::end_of(flavor));
        Ok(())
    }
}

impl Node<'_> {
    /// Emit this subtree as write events.
    ///
    /// A member is emitted as its property name followed by its value; a member
    /// that never received a value emits only the name. The walk keeps its own
    /// stack, so nesting depth is bounded by memory rather than the call stack.
    pub fn write_to<S: JsonSink + ?Sized>(&self, sink: &mut S) -> Result<(), ProtocolError> {
        // (node, index of the next child to visit)
        let mut stack = Vec::new();
        if open(*self, sink)? {
            stack.push((*self, 0usize));
        }
        while let Some(top) = stack.last_mut() {
            let (node, index) = *top;
            top.1 += 1;
            match node.child(index) {
                Some(child) => {
                    if open(child, sink)? {
                        stack.push((child, 0));
                    }
                }
                None => {
                    stack.pop();
                    if let Some(flavor) = node.flavor() {
                        sink.write_end(flavor)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// The events that rebuild this subtree.
    pub fn to_events(&self) -> Vec<Event> {
        let mut events = Vec::new();
        // Recording into a Vec cannot fail.
        let _ = self.write_to(&mut events);
        events
    }
}

/// Emit the opening event of `node`; `true` if it has children to visit.
fn open<S: JsonSink + ?Sized>(node: Node<'_>, sink: &mut S) -> Result<bool, ProtocolError> {
    match node.kind() {
        NodeKind::Value(v) => {
            sink.write_value(v.clone())?;
            Ok(false)
        }
        NodeKind::Member { key, .. } => {
            sink.write_property_name(key)?;
            Ok(true)
        }
        NodeKind::Container { flavor, name, .. } => {
            match flavor {
                ContainerFlavor::Object => sink.write_start_object()?,
                ContainerFlavor::Array => sink.write_start_array()?,
                ContainerFlavor::Constructor => {
                    sink.write_start_constructor(name.as_deref().unwrap_or_default())?
                }
            }
            Ok(true)
        }
    }
}
