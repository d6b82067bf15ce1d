//! Typed value → token tree, via `serde::Serializer`.
//!
//! `&mut TreeWriter` is a serde serializer, so any `Serialize` type can be
//! written straight into a tree:
//!
//! ```
//! use jtree_core::{to_token, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct User { name: &'static str, tags: Vec<&'static str> }
//!
//! let token = to_token(&User { name: "Alice", tags: vec!["rust"] }).unwrap();
//! let root = token.root().unwrap();
//! assert_eq!(root.get("name").and_then(|n| n.as_value().cloned()), Some(Value::from("Alice")));
//! ```
//!
//! Enum variants other than unit variants become a single-member object keyed
//! by the variant name, the same externally tagged layout `serde_json` uses.

use crate::error::{Result, TreeError};
use crate::settings::WriterSettings;
use crate::writer::{Token, TreeWriter};
use serde::ser::{self, Impossible, Serialize};

/// Serialize `value` into a token tree with default settings.
pub fn to_token<T: Serialize + ?Sized>(value: &T) -> Result<Token> {
    to_token_with_settings(value, WriterSettings::default())
}

pub fn to_token_with_settings<T: Serialize + ?Sized>(
    value: &T,
    settings: WriterSettings,
) -> Result<Token> {
    let mut writer = TreeWriter::with_settings(settings);
    value.serialize(&mut writer)?;
    writer.close()?;
    writer.into_token().ok_or(TreeError::Empty)
}

impl<'a> ser::Serializer for &'a mut TreeWriter {
    type Ok = ();
    type Error = TreeError;

    type SerializeSeq = Compound<'a>;
    type SerializeTuple = Compound<'a>;
    type SerializeTupleStruct = Compound<'a>;
    type SerializeTupleVariant = Compound<'a>;
    type SerializeMap = Compound<'a>;
    type SerializeStruct = Compound<'a>;
    type SerializeStructVariant = Compound<'a>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        Ok(self.value(v)?)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        Ok(self.value(v)?)
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        Ok(self.value(v)?)
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        Ok(self.value(v)?)
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        Ok(self.value(v)?)
    }

    fn serialize_i128(self, v: i128) -> Result<()> {
        Ok(self.value(v)?)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        Ok(self.value(v)?)
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        Ok(self.value(v)?)
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        Ok(self.value(v)?)
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        Ok(self.value(v)?)
    }

    fn serialize_u128(self, v: u128) -> Result<()> {
        let n = i128::try_from(v)
            .map_err(|_| TreeError::Custom(format!("integer {v} out of range")))?;
        Ok(self.value(n)?)
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        Ok(self.value(v)?)
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        Ok(self.value(v)?)
    }

    fn serialize_char(self, v: char) -> Result<()> {
        Ok(self.value(v)?)
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        Ok(self.value(v)?)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        Ok(self.value(v)?)
    }

    fn serialize_none(self) -> Result<()> {
        Ok(self.write_null()?)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        Ok(self.write_null()?)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        Ok(self.write_null()?)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        Ok(self.value(variant)?)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()> {
        self.begin_object()?;
        self.property_name(variant)?;
        value.serialize(&mut *self)?;
        Ok(self.end_object()?)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Compound<'a>> {
        self.begin_array()?;
        Ok(Compound::new(self, false))
    }

    fn serialize_tuple(self, len: usize) -> Result<Compound<'a>> {
        ser::Serializer::serialize_seq(self, Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<Compound<'a>> {
        ser::Serializer::serialize_seq(self, Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Compound<'a>> {
        self.begin_object()?;
        self.property_name(variant)?;
        self.begin_array()?;
        Ok(Compound::new(self, true))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Compound<'a>> {
        self.begin_object()?;
        Ok(Compound::new(self, false))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Compound<'a>> {
        ser::Serializer::serialize_map(self, Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Compound<'a>> {
        self.begin_object()?;
        self.property_name(variant)?;
        self.begin_object()?;
        Ok(Compound::new(self, true))
    }
}

/// State for sequences, maps and structs being serialized into the writer.
pub struct Compound<'a> {
    writer: &'a mut TreeWriter,
    /// Also close the object wrapping an enum variant.
    variant: bool,
}

impl<'a> Compound<'a> {
    fn new(writer: &'a mut TreeWriter, variant: bool) -> Self {
        Compound { writer, variant }
    }

    fn finish(self) -> Result<()> {
        self.writer.end()?;
        if self.variant {
            self.writer.end_object()?;
        }
        Ok(())
    }

    fn field<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        self.writer.property_name(key)?;
        value.serialize(&mut *self.writer)
    }
}

impl ser::SerializeSeq for Compound<'_> {
    type Ok = ();
    type Error = TreeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut *self.writer)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl ser::SerializeTuple for Compound<'_> {
    type Ok = ();
    type Error = TreeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut *self.writer)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for Compound<'_> {
    type Ok = ();
    type Error = TreeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut *self.writer)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for Compound<'_> {
    type Ok = ();
    type Error = TreeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut *self.writer)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl ser::SerializeMap for Compound<'_> {
    type Ok = ();
    type Error = TreeError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<()> {
        let key = key.serialize(MapKeySerializer)?;
        Ok(self.writer.property_name(&key)?)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut *self.writer)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl ser::SerializeStruct for Compound<'_> {
    type Ok = ();
    type Error = TreeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.field(key, value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for Compound<'_> {
    type Ok = ();
    type Error = TreeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.field(key, value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

// ----------------------------------------------------------------------------
// Map keys
// ----------------------------------------------------------------------------

/// Turns string-like map keys into property names; anything else is rejected.
struct MapKeySerializer;

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = TreeError;

    type SerializeSeq = Impossible<String, TreeError>;
    type SerializeTuple = Impossible<String, TreeError>;
    type SerializeTupleStruct = Impossible<String, TreeError>;
    type SerializeTupleVariant = Impossible<String, TreeError>;
    type SerializeMap = Impossible<String, TreeError>;
    type SerializeStruct = Impossible<String, TreeError>;
    type SerializeStructVariant = Impossible<String, TreeError>;

    fn serialize_bool(self, v: bool) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i128(self, v: i128) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u128(self, v: u128) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_f32(self, _v: f32) -> Result<String> {
        Err(TreeError::KeyMustBeString)
    }

    fn serialize_f64(self, _v: f64) -> Result<String> {
        Err(TreeError::KeyMustBeString)
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(TreeError::KeyMustBeString)
    }

    fn serialize_none(self) -> Result<String> {
        Err(TreeError::KeyMustBeString)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String> {
        Err(TreeError::KeyMustBeString)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(TreeError::KeyMustBeString)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String> {
        Err(TreeError::KeyMustBeString)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(TreeError::KeyMustBeString)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(TreeError::KeyMustBeString)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(TreeError::KeyMustBeString)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(TreeError::KeyMustBeString)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(TreeError::KeyMustBeString)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(TreeError::KeyMustBeString)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(TreeError::KeyMustBeString)
    }
}
