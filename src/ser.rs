//! Record serialization.
//!
//! Two directions live here:
//!
//! - [`write_value`] walks a [`Value`] and writes the canonical compact text:
//!   no whitespace, unquoted keys, double-quoted strings, `Undefined` array
//!   elements as empty slots.
//! - [`ValueSerializer`] is a serde `Serializer` that builds a [`Value`] from
//!   any `T: Serialize`. [`to_string`](crate::to_string) chains both.
//!
//! ## Canonical Form
//!
//! ```rust
//! use jsrs::parse;
//!
//! let text = "{me:[,\"me\",],you:[[\"Yep\"],,{here_it_is:42},,3,\"it`s\"]}";
//! assert_eq!(parse(text).unwrap().stringify(), text);
//! ```
//!
//! ## Building Values from Rust Types
//!
//! ```rust
//! use jsrs::to_value;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Birth { date: String, place: String }
//!
//! let birth = Birth { date: "1990-02-15".to_string(), place: "Rome".to_string() };
//! assert_eq!(
//!     to_value(&birth).unwrap().stringify(),
//!     "{date:\"1990-02-15\",place:\"Rome\"}"
//! );
//! ```

use crate::parser::is_valid_key;
use crate::{Error, RecordMap, Result, Value};
use serde::{ser, Serialize};
use std::fmt::{self, Write};

/// Writes the canonical text of `value` into `out`.
pub fn write_value<W: Write>(out: &mut W, value: &Value) -> fmt::Result {
    match value {
        Value::Undefined => out.write_str("undefined"),
        Value::Null => out.write_str("null"),
        Value::Bool(b) => out.write_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(out, *n),
        Value::String(s) => {
            out.write_char('"')?;
            out.write_str(s)?;
            out.write_char('"')
        }
        Value::Array(arr) => {
            out.write_char('[')?;
            for (i, element) in arr.iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                // undefined elements are elided: `[1,,2]`
                if !element.is_undefined() {
                    write_value(out, element)?;
                }
            }
            out.write_char(']')
        }
        Value::Object(obj) => {
            out.write_char('{')?;
            for (i, (key, value)) in obj.iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                out.write_str(key)?;
                out.write_char(':')?;
                write_value(out, value)?;
            }
            out.write_char('}')
        }
    }
}

/// Shortest digits that parse back to the same bits. Magnitudes of `1e21` and
/// up, or below `1e-6`, switch to exponent form (`1e+300`, `5e-7`) the way
/// JavaScript number text does; everything else is plain decimal.
#[inline]
fn write_number<W: Write>(out: &mut W, n: f64) -> fmt::Result {
    if n.is_nan() {
        out.write_str("NaN")
    } else if n.is_infinite() {
        out.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n != 0.0 && (n.abs() >= 1e21 || n.abs() < 1e-6) {
        let text = format!("{:e}", n);
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                write!(out, "{}e+{}", mantissa, exponent)
            }
            _ => out.write_str(&text),
        }
    } else {
        write!(out, "{}", n)
    }
}

/// A serde `Serializer` producing [`Value`] trees.
///
/// `None` becomes `Undefined`, unit becomes `Null`, integers become numbers,
/// structs and maps become objects in field order, unit variants become
/// strings and data-carrying variants become single-key objects.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: RecordMap,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

/// Rejects keys the parser would refuse or silently change, such as
/// `first name` (whitespace is stripped) or `a-b`.
fn check_key(key: &str) -> Result<()> {
    if is_valid_key(key) {
        Ok(())
    } else {
        Err(Error::custom(format!(
            "key {:?} must be non-empty ASCII alphanumerics or '_'",
            key
        )))
    }
}

fn wrap_variant(variant: Option<&'static str>, value: Value) -> Result<Value> {
    match variant {
        Some(name) => {
            check_key(name)?;
            let mut outer = RecordMap::with_capacity(1);
            outer.insert(name.to_string(), value);
            Ok(Value::Object(outer))
        }
        None => Ok(value),
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        self.serialize_f64(v as f64)
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        self.serialize_f64(v as f64)
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        self.serialize_f64(v as f64)
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        self.serialize_f64(v as f64)
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        self.serialize_f64(v as f64)
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        self.serialize_f64(v as f64)
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        self.serialize_f64(v as f64)
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Number(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(v.iter().map(|&b| Value::Number(b as f64)).collect())
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Undefined)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        wrap_variant(Some(variant), to_value(value)?)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0), None))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, Some(variant)))
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Result<Value> {
        wrap_variant(self.variant, Value::Array(self.vec))
    }
}

impl SerializeMap {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: RecordMap::with_capacity(capacity),
            current_key: None,
            variant,
        }
    }

    fn finish(self) -> Result<Value> {
        wrap_variant(self.variant, Value::Object(self.map))
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = match to_value(key)? {
            Value::String(s) => s,
            // non-negative integers only; `-1`, `2.5` and `NaN` would not read back
            Value::Number(n) if n >= 0.0 && n.fract() == 0.0 => format!("{}", n),
            other => {
                return Err(Error::custom(format!(
                    "map keys must be strings or non-negative integers, found {}",
                    other.stringify()
                )))
            }
        };
        check_key(&key)?;
        self.current_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        check_key(key)?;
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        check_key(key)?;
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    fn canonical(value: &Value) -> String {
        let mut out = String::new();
        write_value(&mut out, value).unwrap();
        out
    }

    #[test]
    fn test_scalars() {
        assert_eq!(canonical(&Value::Undefined), "undefined");
        assert_eq!(canonical(&Value::Null), "null");
        assert_eq!(canonical(&Value::Bool(true)), "true");
        assert_eq!(canonical(&Value::Bool(false)), "false");
        assert_eq!(canonical(&Value::String("test".into())), "\"test\"");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(canonical(&Value::Number(25.5)), "25.5");
        assert_eq!(canonical(&Value::Number(42.0)), "42");
        assert_eq!(canonical(&Value::Number(-0.125)), "-0.125");
        assert_eq!(canonical(&Value::Number(0.1 + 0.2)), "0.30000000000000004");
        assert_eq!(canonical(&Value::Number(f64::NAN)), "NaN");
        assert_eq!(canonical(&Value::Number(1e300)), "1e+300");
        assert_eq!(canonical(&Value::Number(-1.5e21)), "-1.5e+21");
        assert_eq!(canonical(&Value::Number(1e20)), "100000000000000000000");
        assert_eq!(canonical(&Value::Number(5e-7)), "5e-7");
        assert_eq!(canonical(&Value::Number(0.000001)), "0.000001");
        assert_eq!(canonical(&Value::Number(f64::MIN_POSITIVE)), "2.2250738585072014e-308");
        assert_eq!(canonical(&Value::Number(f64::INFINITY)), "Infinity");
        assert_eq!(canonical(&Value::Number(f64::NEG_INFINITY)), "-Infinity");
    }

    #[test]
    fn test_strings_are_not_escaped() {
        let value = Value::String("it`s a \\n 'quote'".into());
        assert_eq!(canonical(&value), "\"it`s a \\n 'quote'\"");
    }

    #[test]
    fn test_elided_array_elements() {
        let value = Value::Array(vec![
            Value::Undefined,
            Value::String("me".into()),
            Value::Undefined,
        ]);
        assert_eq!(canonical(&value), "[,\"me\",]");
        assert_eq!(canonical(&Value::Array(vec![])), "[]");
    }

    #[test]
    fn test_object_keeps_insertion_order() {
        let mut map = RecordMap::new();
        map.insert("test3".into(), Value::String("test".into()));
        map.insert("arr".into(), Value::Array(vec![Value::Number(25.5), Value::Bool(true)]));
        map.insert("gone".into(), Value::Undefined);
        assert_eq!(
            canonical(&Value::Object(map)),
            "{test3:\"test\",arr:[25.5,true],gone:undefined}"
        );
    }

    #[derive(Serialize)]
    struct Address {
        country: String,
        zip: String,
        floor: Option<u8>,
    }

    #[derive(Serialize)]
    enum Shape {
        Empty,
        Circle(f64),
        Rect { w: u32, h: u32 },
        Pair(u8, u8),
    }

    #[test]
    fn test_value_serializer_structs() {
        let address = Address {
            country: "Ukraine".into(),
            zip: "03056".into(),
            floor: None,
        };
        let value = to_value(&address).unwrap();
        assert_eq!(
            value.stringify(),
            "{country:\"Ukraine\",zip:\"03056\",floor:undefined}"
        );
    }

    #[test]
    fn test_value_serializer_enums() {
        assert_eq!(to_value(&Shape::Empty).unwrap().stringify(), "\"Empty\"");
        assert_eq!(to_value(&Shape::Circle(1.5)).unwrap().stringify(), "{Circle:1.5}");
        assert_eq!(
            to_value(&Shape::Rect { w: 2, h: 3 }).unwrap().stringify(),
            "{Rect:{w:2,h:3}}"
        );
        assert_eq!(to_value(&Shape::Pair(1, 2)).unwrap().stringify(), "{Pair:[1,2]}");
    }

    #[test]
    fn test_value_serializer_maps() {
        let mut map = BTreeMap::new();
        map.insert(2, "two");
        map.insert(1, "one");
        assert_eq!(to_value(&map).unwrap().stringify(), "{1:\"one\",2:\"two\"}");

        let mut bad = BTreeMap::new();
        bad.insert(vec![1], 1);
        assert!(to_value(&bad).is_err());
    }

    struct FloatKeys(Vec<(f64, i32)>);

    impl Serialize for FloatKeys {
        fn serialize<S: ser::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
            serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
        }
    }

    #[test]
    fn test_keys_that_would_not_read_back() {
        for key in ["first name", "a-b", "", "x.y", "tab\t"] {
            let mut map = BTreeMap::new();
            map.insert(key, 1);
            let err = to_value(&map).unwrap_err();
            assert!(err.to_string().contains("key"), "accepted {:?}", key);
        }

        for key in [-1.0, -0.0, 2.5, f64::INFINITY, f64::NAN] {
            assert!(to_value(&FloatKeys(vec![(key, 1)])).is_err(), "accepted {}", key);
        }
        assert_eq!(
            to_value(&FloatKeys(vec![(0.0, 1), (1e20, 2)])).unwrap().stringify(),
            "{0:1,100000000000000000000:2}"
        );

        let mut fine = BTreeMap::new();
        fine.insert("first_name", 1);
        fine.insert("Name2", 2);
        assert_eq!(to_value(&fine).unwrap().stringify(), "{Name2:2,first_name:1}");
    }

    #[test]
    fn test_renamed_fields_are_checked() {
        #[derive(Serialize)]
        struct Renamed {
            #[serde(rename = "full name")]
            name: String,
        }

        #[derive(Serialize)]
        enum Tagged {
            #[serde(rename = "with-dash")]
            Dashed(u8),
        }

        assert!(to_value(&Renamed { name: "x".into() }).is_err());
        assert!(to_value(&Tagged::Dashed(1)).is_err());
    }
}
