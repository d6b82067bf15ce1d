//! # jtree-core
//!
//! Forward-only writer that builds an in-memory JSON **token tree** from a
//! sequence of write events, instead of emitting text.
//!
//! The tree has three node shapes: containers (object, array, constructor),
//! members (one object property wrapping exactly one value), and typed scalar
//! values. The writer keeps a cursor on the node receiving the next child and
//! closes members automatically once their value is attached.
//!
//! ## Quick start
//!
//! ```rust
//! use jtree_core::{TreeWriter, Value};
//!
//! // [ { "k": [1, 2] } ]
//! let mut w = TreeWriter::new();
//! w.begin_array().unwrap();
//! w.begin_object().unwrap();
//! w.property_name("k").unwrap();
//! w.begin_array().unwrap();
//! w.value(1).unwrap();
//! w.value(2).unwrap();
//! w.end().unwrap();
//! w.end().unwrap();
//! w.end().unwrap();
//!
//! let token = w.into_token().unwrap();
//! let json = jtree_core::to_json(&token).unwrap();
//! assert_eq!(json, serde_json::json!([{"k": [1, 2]}]));
//! ```
//!
//! ## Modules
//!
//! - [`writer`] — `TreeWriter`, the cursor state machine
//! - [`tree`] — arena `Document` and `Node` navigation handles
//! - [`value`] — scalar `Value` union and promotion rules
//! - [`protocol`] — `Event` vocabulary, `JsonSink` trait, tree replay
//! - [`ser`] — `Serialize` types → token tree
//! - [`convert`] — token tree ↔ `serde_json::Value`
//! - [`settings`] — writer configuration
//! - [`error`] — error types

pub mod convert;
pub mod error;
pub mod protocol;
pub mod ser;
pub mod settings;
pub mod tree;
pub mod value;
pub mod writer;

pub use convert::{from_json, to_json};
pub use error::{ProtocolError, TreeError};
pub use protocol::{Event, JsonSink};
pub use ser::{to_token, to_token_with_settings};
pub use settings::{DateTimeZoneHandling, WriterSettings};
pub use tree::{ContainerFlavor, Document, NewNode, Node, NodeId, NodeKind, NodeType, MAX_NODES};
pub use value::{DateTimeValue, Value, ValueKind};
pub use writer::{Cursor, Token, TokenRef, TreeWriter};
