//! Dynamic value representation for records.
//!
//! This module provides the [`Value`] enum, a closed tagged union over the seven
//! record variants, and [`ValueType`], its fieldless discriminant.
//!
//! ## Creating Values
//!
//! ```rust
//! use jsrs::{record, Value};
//!
//! let undefined = Value::Undefined;
//! let number = Value::from(25.5);
//! let text = Value::from("test");
//!
//! let obj = record!({
//!     arr: [25.5, true],
//!     test1: 25.5
//! });
//! assert_eq!(obj.stringify(), "{arr:[25.5,true],test1:25.5}");
//! ```
//!
//! ## Reading Values
//!
//! Accessors never fail. Asking for the wrong variant yields that accessor's
//! default, and indexing a missing slot yields `Undefined`:
//!
//! ```rust
//! use jsrs::{parse, Value};
//!
//! let value = parse("{me:[,\"me\",]}").unwrap();
//! assert_eq!(value["me"][1].as_str(), "me");
//! assert!(value["me"][0].is_undefined());
//! assert!(value["you"][7].is_undefined());
//! assert_eq!(value.as_number(), 0.0);
//! ```

use crate::{Error, RecordMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

static UNDEFINED: Value = Value::Undefined;

/// The variant tag of a [`Value`].
///
/// Declaration order doubles as the cross-variant ordering used by
/// `Value`'s `PartialOrd`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueType {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ValueType::Undefined => "undefined",
            ValueType::Null => "null",
            ValueType::Boolean => "boolean",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Array => "array",
            ValueType::Object => "object",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed or programmatically built record.
///
/// Nested values are owned by their container. Equality is structural, with
/// object key order ignored; see the `PartialOrd` impl for ordering.
///
/// # Examples
///
/// ```rust
/// use jsrs::{Value, ValueType};
///
/// let value = Value::from(vec![Value::from(25.5), Value::from(true)]);
/// assert_eq!(value.value_type(), ValueType::Array);
/// assert_eq!(value.stringify(), "[25.5,true]");
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(RecordMap),
}

impl Value {
    /// Returns the variant tag of this value.
    #[inline]
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Value::Undefined => ValueType::Undefined,
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Boolean,
            Value::Number(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns the boolean, or `false` for any other variant.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            _ => false,
        }
    }

    /// Returns the number, or `0.0` for any other variant.
    #[inline]
    #[must_use]
    pub fn as_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            _ => 0.0,
        }
    }

    /// Returns the string contents, or `""` for any other variant.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Value::String(s) => s,
            _ => "",
        }
    }

    /// Returns the array elements, or an empty slice for any other variant.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> &[Value] {
        match self {
            Value::Array(arr) => arr,
            _ => &[],
        }
    }

    /// Returns the object entries in stored order, or a fresh empty map for any
    /// other variant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsrs::parse;
    ///
    /// let value = parse("{b:1,a:2}").unwrap();
    /// let keys: Vec<_> = value.as_object().keys().cloned().collect();
    /// assert_eq!(keys, vec!["b", "a"]);
    /// assert!(parse("[]").unwrap().as_object().is_empty());
    /// ```
    #[must_use]
    pub fn as_object(&self) -> Cow<'_, RecordMap> {
        match self {
            Value::Object(obj) => Cow::Borrowed(obj),
            _ => Cow::Owned(RecordMap::new()),
        }
    }

    /// Looks up an array element by position or an object member by key.
    ///
    /// Returns `Undefined` for a wrong variant, an index out of range or a
    /// missing key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsrs::parse;
    ///
    /// let value = parse("{arr:[25.5,true]}").unwrap();
    /// assert_eq!(value.at("arr").at(0).as_number(), 25.5);
    /// assert!(value.at("arr").at(2).is_undefined());
    /// assert!(value.at(0).is_undefined());
    /// ```
    #[must_use]
    pub fn at<I: ValueIndex>(&self, index: I) -> &Value {
        index.index_into(self).unwrap_or(&UNDEFINED)
    }

    /// Like [`Value::at`], but distinguishes a miss from a stored `Undefined`.
    #[must_use]
    pub fn get<I: ValueIndex>(&self, index: I) -> Option<&Value> {
        index.index_into(self)
    }

    /// Returns the canonical compact text of this value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsrs::Value;
    ///
    /// assert_eq!(Value::Undefined.stringify(), "undefined");
    /// assert_eq!(Value::Null.stringify(), "null");
    /// assert_eq!(Value::from(25.5).stringify(), "25.5");
    /// assert_eq!(Value::from("test").stringify(), "\"test\"");
    /// ```
    #[must_use]
    pub fn stringify(&self) -> String {
        self.to_string()
    }
}

/// Types usable with [`Value::at`], [`Value::get`] and `value[..]`.
pub trait ValueIndex {
    fn index_into<'v>(&self, value: &'v Value) -> Option<&'v Value>;
}

impl ValueIndex for usize {
    fn index_into<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        match value {
            Value::Array(arr) => arr.get(*self),
            _ => None,
        }
    }
}

impl ValueIndex for str {
    fn index_into<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        match value {
            Value::Object(obj) => obj.get(self),
            _ => None,
        }
    }
}

impl ValueIndex for String {
    fn index_into<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        self.as_str().index_into(value)
    }
}

impl<T: ValueIndex + ?Sized> ValueIndex for &T {
    fn index_into<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        (**self).index_into(value)
    }
}

impl<I: ValueIndex> std::ops::Index<I> for Value {
    type Output = Value;

    fn index(&self, index: I) -> &Value {
        self.at(index)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::ser::write_value(f, self)
    }
}

impl FromStr for Value {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        crate::parse(s)
    }
}

/// Scalars of the same variant compare naturally; arrays and objects compare
/// by their canonical text, so `["10"] < ["9"]`. Values of different variants
/// are ordered by [`ValueType`]. `NaN` numbers are unordered.
///
/// Unequal containers can share a text: `[undefined]` and `[]` both print as
/// `[]`. Those fall back to comparing length and then element by element.
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => {
                Some(Ordering::Equal)
            }
            (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => a.partial_cmp(b),
            (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
                if self == other {
                    return Some(Ordering::Equal);
                }
                match self.stringify().cmp(&other.stringify()) {
                    Ordering::Equal => structural_cmp(self, other),
                    ordering => Some(ordering),
                }
            }
            _ => self.value_type().partial_cmp(&other.value_type()),
        }
    }
}

/// Tie-break for unequal containers with the same canonical text. Only `NaN`
/// somewhere inside leaves them unordered.
fn structural_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Array(a), Value::Array(b)) => {
            if a.len() != b.len() {
                return Some(a.len().cmp(&b.len()));
            }
            for (x, y) in a.iter().zip(b) {
                match x.partial_cmp(y)? {
                    Ordering::Equal => {}
                    ordering => return Some(ordering),
                }
            }
            None
        }
        (Value::Object(a), Value::Object(b)) => {
            if a.len() != b.len() {
                return Some(a.len().cmp(&b.len()));
            }
            for ((ka, va), (kb, vb)) in a.iter().zip(b.iter()) {
                match ka.cmp(kb) {
                    Ordering::Equal => {}
                    ordering => return Some(ordering),
                }
                match va.partial_cmp(vb)? {
                    Ordering::Equal => {}
                    ordering => return Some(ordering),
                }
            }
            None
        }
        _ => left.partial_cmp(right),
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Undefined => serializer.serialize_none(),
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid record value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(value as f64))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Value::Number(value as f64))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Number(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Undefined)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = RecordMap::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    values.insert(key, value);
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

fn mismatch(expected: ValueType, value: &Value) -> Error {
    Error::custom(format!(
        "expected {}, found {}",
        expected,
        value.value_type()
    ))
}

impl TryFrom<Value> for f64 {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Number(n) => Ok(n),
            other => Err(mismatch(ValueType::Number, &other)),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch(ValueType::Boolean, &other)),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(mismatch(ValueType::String, &other)),
        }
    }
}

impl TryFrom<Value> for Vec<Value> {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Array(arr) => Ok(arr),
            other => Err(mismatch(ValueType::Array, &other)),
        }
    }
}

impl TryFrom<Value> for RecordMap {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Object(obj) => Ok(obj),
            other => Err(mismatch(ValueType::Object, &other)),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(value as f64)
                }
            }
        )*
    };
}

from_number!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

/// `None` becomes `Undefined`, the same as through serde.
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Undefined, Into::into)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<RecordMap> for Value {
    fn from(value: RecordMap) -> Self {
        Value::Object(value)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Value::Object(iter.into_iter().collect())
    }
}
