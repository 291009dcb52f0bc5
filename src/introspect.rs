//! Struct field metadata through serde
//!
//! [`parse_struct_fields`] drives a value's `Serialize` implementation with a
//! serializer that records, for each named field, its position, name
//! and serde data-model kind. Field values are never formatted.
//!
//! Kinds follow the serde data model, so a field's kind is whatever its
//! `Serialize` impl emits: a `chrono::DateTime` field reports
//! [`FieldKind::String`]. Fields skipped by `#[serde(skip_serializing_if)]`
//! are absent from the result.

use serde::Serialize;
use serde::ser::{self, Impossible};
use std::fmt;

use crate::errfmt::{OperationError, create_error, wrap_error};

const OPERATION: &str = "parse_struct_fields";

/// serde data-model kind of a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
    F32,
    F64,
    Char,
    String,
    Bytes,
    Option,
    Unit,
    Seq,
    Tuple,
    Map,
    Struct,
    Enum,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMetadata {
    pub kind: FieldKind,
    /// Ordinal position among the serialized fields
    pub index: usize,
    pub name: &'static str,
}

/// Describe each field of the struct `value`
///
/// Fails when `value` does not serialize as a struct with named fields.
pub fn parse_struct_fields<T: Serialize + ?Sized>(
    value: &T,
) -> Result<Vec<FieldMetadata>, OperationError> {
    value.serialize(FieldCollector).map_err(|e| match e {
        IntrospectError::NotStruct => create_error(
            OPERATION,
            format!("type [{}] is not a struct", std::any::type_name::<T>()),
        ),
        IntrospectError::Custom(message) => wrap_error(
            OPERATION,
            format!("serializing [{}] failed", std::any::type_name::<T>()),
            message,
        ),
    })
}

/// Describe the fields of `T` using its default value
pub fn parse_struct_fields_of<T: Serialize + Default>() -> Result<Vec<FieldMetadata>, OperationError>
{
    parse_struct_fields(&T::default())
}

#[derive(Debug)]
enum IntrospectError {
    NotStruct,
    Custom(String),
}

impl fmt::Display for IntrospectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntrospectError::NotStruct => f.write_str("value is not a struct"),
            IntrospectError::Custom(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for IntrospectError {}

impl ser::Error for IntrospectError {
    fn custom<M: fmt::Display>(msg: M) -> Self {
        IntrospectError::Custom(msg.to_string())
    }
}

/// Accepts only structs with named fields
struct FieldCollector;

type Rejected = Impossible<Vec<FieldMetadata>, IntrospectError>;

macro_rules! reject {
    ($($method:ident($($arg:ident: $ty:ty),*);)*) => {
        $(
            fn $method(self, $(_: $ty),*) -> Result<Self::Ok, Self::Error> {
                Err(IntrospectError::NotStruct)
            }
        )*
    };
}

impl ser::Serializer for FieldCollector {
    type Ok = Vec<FieldMetadata>;
    type Error = IntrospectError;
    type SerializeSeq = Rejected;
    type SerializeTuple = Rejected;
    type SerializeTupleStruct = Rejected;
    type SerializeTupleVariant = Rejected;
    type SerializeMap = Rejected;
    type SerializeStruct = FieldAccumulator;
    type SerializeStructVariant = Rejected;

    reject! {
        serialize_bool(v: bool);
        serialize_i8(v: i8);
        serialize_i16(v: i16);
        serialize_i32(v: i32);
        serialize_i64(v: i64);
        serialize_i128(v: i128);
        serialize_u8(v: u8);
        serialize_u16(v: u16);
        serialize_u32(v: u32);
        serialize_u64(v: u64);
        serialize_u128(v: u128);
        serialize_f32(v: f32);
        serialize_f64(v: f64);
        serialize_char(v: char);
        serialize_str(v: &str);
        serialize_bytes(v: &[u8]);
        serialize_none();
        serialize_unit();
        serialize_unit_struct(name: &'static str);
        serialize_unit_variant(name: &'static str, index: u32, variant: &'static str);
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _: &T) -> Result<Self::Ok, Self::Error> {
        Err(IntrospectError::NotStruct)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        _: &T,
    ) -> Result<Self::Ok, Self::Error> {
        Err(IntrospectError::NotStruct)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: &T,
    ) -> Result<Self::Ok, Self::Error> {
        Err(IntrospectError::NotStruct)
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Err(IntrospectError::NotStruct)
    }

    fn serialize_tuple(self, _: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Err(IntrospectError::NotStruct)
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Err(IntrospectError::NotStruct)
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Err(IntrospectError::NotStruct)
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Err(IntrospectError::NotStruct)
    }

    fn serialize_struct(
        self,
        _: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(FieldAccumulator {
            fields: Vec::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Err(IntrospectError::NotStruct)
    }
}

/// Collects the metadata of each serialized field
struct FieldAccumulator {
    fields: Vec<FieldMetadata>,
}

impl ser::SerializeStruct for FieldAccumulator {
    type Ok = Vec<FieldMetadata>;
    type Error = IntrospectError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        let kind = value.serialize(KindRecorder)?;
        self.fields.push(FieldMetadata {
            kind,
            index: self.fields.len(),
            name: key,
        });
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.fields)
    }
}

/// Reports the kind of a value without descending into it
struct KindRecorder;

/// Discards the elements of a compound value
struct KindSink(FieldKind);

macro_rules! kind_of {
    ($($method:ident($($ty:ty),*) => $kind:ident;)*) => {
        $(
            fn $method(self, $(_: $ty),*) -> Result<Self::Ok, Self::Error> {
                Ok(FieldKind::$kind)
            }
        )*
    };
}

impl ser::Serializer for KindRecorder {
    type Ok = FieldKind;
    type Error = IntrospectError;
    type SerializeSeq = KindSink;
    type SerializeTuple = KindSink;
    type SerializeTupleStruct = KindSink;
    type SerializeTupleVariant = KindSink;
    type SerializeMap = KindSink;
    type SerializeStruct = KindSink;
    type SerializeStructVariant = KindSink;

    kind_of! {
        serialize_bool(bool) => Bool;
        serialize_i8(i8) => I8;
        serialize_i16(i16) => I16;
        serialize_i32(i32) => I32;
        serialize_i64(i64) => I64;
        serialize_i128(i128) => I128;
        serialize_u8(u8) => U8;
        serialize_u16(u16) => U16;
        serialize_u32(u32) => U32;
        serialize_u64(u64) => U64;
        serialize_u128(u128) => U128;
        serialize_f32(f32) => F32;
        serialize_f64(f64) => F64;
        serialize_char(char) => Char;
        serialize_str(&str) => String;
        serialize_bytes(&[u8]) => Bytes;
        serialize_none() => Option;
        serialize_unit() => Unit;
        serialize_unit_struct(&'static str) => Struct;
        serialize_unit_variant(&'static str, u32, &'static str) => Enum;
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _: &T) -> Result<Self::Ok, Self::Error> {
        Ok(FieldKind::Option)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        _: &T,
    ) -> Result<Self::Ok, Self::Error> {
        Ok(FieldKind::Struct)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: &T,
    ) -> Result<Self::Ok, Self::Error> {
        Ok(FieldKind::Enum)
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Ok(KindSink(FieldKind::Seq))
    }

    fn serialize_tuple(self, _: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Ok(KindSink(FieldKind::Tuple))
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Ok(KindSink(FieldKind::Struct))
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Ok(KindSink(FieldKind::Enum))
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(KindSink(FieldKind::Map))
    }

    fn serialize_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(KindSink(FieldKind::Struct))
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Ok(KindSink(FieldKind::Enum))
    }
}

impl ser::SerializeSeq for KindSink {
    type Ok = FieldKind;
    type Error = IntrospectError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, _: &T) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.0)
    }
}

impl ser::SerializeTuple for KindSink {
    type Ok = FieldKind;
    type Error = IntrospectError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, _: &T) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.0)
    }
}

impl ser::SerializeTupleStruct for KindSink {
    type Ok = FieldKind;
    type Error = IntrospectError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _: &T) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.0)
    }
}

impl ser::SerializeTupleVariant for KindSink {
    type Ok = FieldKind;
    type Error = IntrospectError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _: &T) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.0)
    }
}

impl ser::SerializeMap for KindSink {
    type Ok = FieldKind;
    type Error = IntrospectError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, _: &T) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, _: &T) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.0)
    }
}

impl ser::SerializeStruct for KindSink {
    type Ok = FieldKind;
    type Error = IntrospectError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _: &'static str,
        _: &T,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.0)
    }
}

impl ser::SerializeStructVariant for KindSink {
    type Ok = FieldKind;
    type Error = IntrospectError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _: &'static str,
        _: &T,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Serialize, Default)]
    struct SampleRecord {
        bool_field: bool,
        float_field: f64,
        int_field: i64,
        string_field: String,
    }

    fn sample_metadata() -> Vec<FieldMetadata> {
        vec![
            FieldMetadata { kind: FieldKind::Bool, index: 0, name: "bool_field" },
            FieldMetadata { kind: FieldKind::F64, index: 1, name: "float_field" },
            FieldMetadata { kind: FieldKind::I64, index: 2, name: "int_field" },
            FieldMetadata { kind: FieldKind::String, index: 3, name: "string_field" },
        ]
    }

    #[test]
    fn test_value() {
        let fields = parse_struct_fields(&SampleRecord::default()).unwrap();
        assert_eq!(fields, sample_metadata());
    }

    #[test]
    fn test_reference() {
        let record = SampleRecord::default();
        let by_ref = &record;
        assert_eq!(parse_struct_fields(&by_ref).unwrap(), sample_metadata());
    }

    #[test]
    fn test_type_only() {
        assert_eq!(
            parse_struct_fields_of::<SampleRecord>().unwrap(),
            sample_metadata()
        );
    }

    #[test]
    fn test_non_struct_is_rejected() {
        let err = parse_struct_fields(&3.14_f64).unwrap_err();
        assert_eq!(err.to_string(), "parse_struct_fields:type [f64] is not a struct");

        assert!(parse_struct_fields(&vec![1, 2, 3]).is_err());
        assert!(parse_struct_fields("text").is_err());
    }

    #[test]
    fn test_compound_field_kinds() {
        #[derive(Serialize)]
        enum Shade {
            Light,
        }

        #[derive(Serialize)]
        struct Inner {
            value: u8,
        }

        #[derive(Serialize)]
        struct Outer {
            maybe: Option<u16>,
            tags: Vec<String>,
            pair: (i8, char),
            lookup: HashMap<String, u32>,
            inner: Inner,
            shade: Shade,
            blank: (),
        }

        let outer = Outer {
            maybe: None,
            tags: vec!["a".to_string()],
            pair: (1, 'x'),
            lookup: HashMap::new(),
            inner: Inner { value: 7 },
            shade: Shade::Light,
            blank: (),
        };

        let kinds: Vec<(FieldKind, &str)> = parse_struct_fields(&outer)
            .unwrap()
            .into_iter()
            .map(|f| (f.kind, f.name))
            .collect();

        assert_eq!(
            kinds,
            vec![
                (FieldKind::Option, "maybe"),
                (FieldKind::Seq, "tags"),
                (FieldKind::Tuple, "pair"),
                (FieldKind::Map, "lookup"),
                (FieldKind::Struct, "inner"),
                (FieldKind::Enum, "shade"),
                (FieldKind::Unit, "blank"),
            ]
        );
    }

    #[test]
    fn test_serde_rename_is_reported() {
        #[derive(Serialize)]
        struct Renamed {
            #[serde(rename = "firstName")]
            first_name: String,
        }

        let fields = parse_struct_fields(&Renamed {
            first_name: String::new(),
        })
        .unwrap();
        assert_eq!(fields[0].name, "firstName");
    }
}
