//! Scalar payloads stored in value nodes.
//!
//! Every primitive the writer accepts is promoted into one [`Value`] variant:
//! all integer widths become `Integer`, both float widths become `Float`, and
//! `char` becomes a one-character `String`. The promotion table lives in the
//! `From` impls at the bottom of this module.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, SecondsFormat, TimeDelta, Utc};
use std::fmt;
use url::Url;
use uuid::Uuid;

/// A date with the zone information it was written with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateTimeValue {
    Utc(DateTime<Utc>),
    Local(DateTime<Local>),
    /// Wall-clock time with no zone attached.
    Unspecified(NaiveDateTime),
}

impl DateTimeValue {
    /// Wall-clock time as written, ignoring the zone.
    pub fn naive(&self) -> NaiveDateTime {
        match self {
            DateTimeValue::Utc(dt) => dt.naive_utc(),
            DateTimeValue::Local(dt) => dt.naive_local(),
            DateTimeValue::Unspecified(naive) => *naive,
        }
    }

    /// RFC 3339 text; zoneless values omit the offset.
    pub fn to_rfc3339(&self) -> String {
        match self {
            DateTimeValue::Utc(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            DateTimeValue::Local(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, false),
            DateTimeValue::Unspecified(naive) => naive.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
        }
    }
}

/// Tag identifying which scalar a [`Value`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Undefined,
    Boolean,
    Integer,
    Float,
    String,
    Date,
    DateOffset,
    Bytes,
    TimeSpan,
    Guid,
    Uri,
    Raw,
    Comment,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Undefined => "undefined",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Date => "date",
            ValueKind::DateOffset => "date-offset",
            ValueKind::Bytes => "bytes",
            ValueKind::TimeSpan => "time-span",
            ValueKind::Guid => "guid",
            ValueKind::Uri => "uri",
            ValueKind::Raw => "raw",
            ValueKind::Comment => "comment",
        };
        f.write_str(name)
    }
}

/// A typed scalar held by a value node.
///
/// `Raw` (pass-through JSON text) and `Comment` are not data in the JSON model,
/// but they attach to the tree like any other value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Undefined,
    Boolean(bool),
    Integer(i128),
    Float(f64),
    String(String),
    Date(DateTimeValue),
    DateOffset(DateTime<FixedOffset>),
    Bytes(Vec<u8>),
    TimeSpan(TimeDelta),
    Guid(Uuid),
    Uri(Url),
    Raw(String),
    Comment(String),
}

impl Value {
    pub fn raw(json: impl Into<String>) -> Self {
        Value::Raw(json.into())
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Value::Comment(text.into())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Undefined => ValueKind::Undefined,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Date(_) => ValueKind::Date,
            Value::DateOffset(_) => ValueKind::DateOffset,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::TimeSpan(_) => ValueKind::TimeSpan,
            Value::Guid(_) => ValueKind::Guid,
            Value::Uri(_) => ValueKind::Uri,
            Value::Raw(_) => ValueKind::Raw,
            Value::Comment(_) => ValueKind::Comment,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer payload, if it fits in an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// Numeric payload widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Text payload of `String`, `Raw` and `Comment` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Raw(s) | Value::Comment(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Undefined => f.write_str("undefined"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Date(d) => f.write_str(&d.to_rfc3339()),
            Value::DateOffset(d) => f.write_str(&d.to_rfc3339()),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::TimeSpan(t) => write!(f, "{t}"),
            Value::Guid(g) => write!(f, "{g}"),
            Value::Uri(u) => write!(f, "{u}"),
            Value::Raw(s) => f.write_str(s),
            Value::Comment(s) => write!(f, "/*{s}*/"),
        }
    }
}

// ----------------------------------------------------------------------------
// Promotion rules
// ----------------------------------------------------------------------------

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Integer(n as i128)
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(f64::from(x))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::String(c.to_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Value::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<DateTimeValue> for Value {
    fn from(d: DateTimeValue) -> Self {
        Value::Date(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(DateTimeValue::Utc(d))
    }
}

impl From<DateTime<Local>> for Value {
    fn from(d: DateTime<Local>) -> Self {
        Value::Date(DateTimeValue::Local(d))
    }
}

impl From<NaiveDateTime> for Value {
    fn from(d: NaiveDateTime) -> Self {
        Value::Date(DateTimeValue::Unspecified(d))
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(d: DateTime<FixedOffset>) -> Self {
        Value::DateOffset(d)
    }
}

impl From<TimeDelta> for Value {
    fn from(t: TimeDelta) -> Self {
        Value::TimeSpan(t)
    }
}

impl From<Uuid> for Value {
    fn from(g: Uuid) -> Self {
        Value::Guid(g)
    }
}

impl From<Url> for Value {
    fn from(u: Url) -> Self {
        Value::Uri(u)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}
