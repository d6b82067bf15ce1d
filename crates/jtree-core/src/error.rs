//! Error types for tree construction and conversion.

use crate::tree::ContainerFlavor;
use thiserror::Error;

/// An event arrived in a context that would break the tree's structural invariants.
///
/// The writer rejects the event before touching the tree, so the document built
/// so far stays intact.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// `end` with no container open.
    #[error("end event with no open container")]
    EndWithoutStart,

    /// `end` while a property name still awaits its value.
    #[error("end event while property \"{key}\" has no value")]
    EndInsideMember { key: String },

    /// A typed end event closed a container of another flavor.
    #[error("expected end of {expected}, found end of {found}")]
    MismatchedEnd {
        expected: ContainerFlavor,
        found: ContainerFlavor,
    },

    /// Property names are only legal directly inside an object.
    #[error("property name \"{key}\" written outside of an object")]
    PropertyNameOutsideObject { key: String },

    /// A value or container was written directly into an object.
    #[error("value written into an object without a property name")]
    MissingPropertyName,

    /// The root container was closed, or a lone scalar written; nothing may follow.
    #[error("document is already complete")]
    DocumentComplete,

    /// A member already holds its single child.
    #[error("property \"{key}\" already has a value")]
    MemberOccupied { key: String },

    /// The node cannot hold children.
    #[error("node is not a container")]
    NotAContainer,

    /// The document reached its node limit.
    #[error("document exceeds the limit of {limit} nodes")]
    TooManyNodes { limit: usize },

    /// `close` with containers still open.
    #[error("document closed with {open} open container(s)")]
    Incomplete { open: usize },
}

/// Errors that can occur while building or converting a token tree.
#[derive(Error, Debug)]
pub enum TreeError {
    /// The event sequence was not well formed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Conversion to or from `serde_json::Value` failed.
    #[error("JSON conversion error: {0}")]
    Json(#[from] serde_json::Error),

    /// A map key serialized to something other than a string-like scalar.
    #[error("map key must be a string")]
    KeyMustBeString,

    /// The serialized value wrote no events at all.
    #[error("no value was written")]
    Empty,

    /// Error raised by a `Serialize` implementation.
    #[error("{0}")]
    Custom(String),
}

impl serde::ser::Error for TreeError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        TreeError::Custom(msg.to_string())
    }
}

/// Convenience alias used throughout jtree-core.
pub type Result<T> = std::result::Result<T, TreeError>;
