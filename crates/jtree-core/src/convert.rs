//! Token tree ↔ `serde_json::Value`.
//!
//! Trees implement `Serialize`, which is the hand-off point to any serde text
//! writer. Kinds JSON has no literal for are mapped as follows:
//!
//! - `Undefined` → `null`
//! - `Date` / `DateOffset` → RFC 3339 string
//! - `TimeSpan` → ISO 8601 duration string
//! - `Guid` / `Uri` → string
//! - `Bytes` → array of byte values
//! - `Raw` → the parsed JSON it holds, or the text as a string if it does not parse
//! - `Comment` → dropped from arrays and objects, `null` elsewhere
//! - constructor `new Date(1, 2)` → `{"Date": [1, 2]}`

use crate::error::Result;
use crate::ser::to_token;
use crate::tree::{ContainerFlavor, Document, Node, NodeKind};
use crate::value::Value;
use crate::writer::Token;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Convert a built token into a `serde_json::Value`.
pub fn to_json(token: &Token) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(token)?)
}

/// Build a token tree from a parsed JSON value.
///
/// Integers that fit `i64`/`u64` become `Integer`; every other number becomes `Float`.
pub fn from_json(value: &serde_json::Value) -> Result<Token> {
    to_token(value)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null | Value::Undefined | Value::Comment(_) => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => {
                if let Ok(i) = i64::try_from(*n) {
                    serializer.serialize_i64(i)
                } else if let Ok(u) = u64::try_from(*n) {
                    serializer.serialize_u64(u)
                } else {
                    serializer.serialize_i128(*n)
                }
            }
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.serialize_str(&d.to_rfc3339()),
            Value::DateOffset(d) => serializer.serialize_str(&d.to_rfc3339()),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::TimeSpan(t) => serializer.collect_str(t),
            Value::Guid(g) => serializer.collect_str(g),
            Value::Uri(u) => serializer.serialize_str(u.as_str()),
            Value::Raw(raw) => match serde_json::from_str::<serde_json::Value>(raw) {
                Ok(parsed) => parsed.serialize(serializer),
                Err(_) => serializer.serialize_str(raw),
            },
        }
    }
}

fn is_comment(node: Option<Node<'_>>) -> bool {
    matches!(
        node.and_then(|n| n.as_value()),
        Some(Value::Comment(_))
    )
}

/// Children of an array or constructor, comments dropped.
struct Elements<'a>(Node<'a>);

impl Serialize for Elements<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.children().filter(|c| !is_comment(Some(*c))))
    }
}

impl Serialize for Node<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.kind() {
            NodeKind::Value(v) => v.serialize(serializer),
            NodeKind::Member { .. } => match self.value() {
                Some(child) => child.serialize(serializer),
                None => serializer.serialize_unit(),
            },
            NodeKind::Container { flavor: ContainerFlavor::Object, .. } => {
                let members: Vec<Node<'_>> = self
                    .children()
                    .filter(|m| !is_comment(m.value()))
                    .collect();
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for member in members {
                    map.serialize_entry(member.key().unwrap_or_default(), &member.value())?;
                }
                map.end()
            }
            NodeKind::Container { flavor: ContainerFlavor::Array, .. } => {
                Elements(*self).serialize(serializer)
            }
            NodeKind::Container { flavor: ContainerFlavor::Constructor, name, .. } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(name.as_deref().unwrap_or_default(), &Elements(*self))?;
                map.end()
            }
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.root() {
            Some(root) => root.serialize(serializer),
            None => serializer.serialize_unit(),
        }
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Token::Tree(doc) => doc.serialize(serializer),
            Token::Scalar(v) => v.serialize(serializer),
        }
    }
}
