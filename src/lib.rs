//! # jsrs
//!
//! A parser and serializer for Record Serialization, a JavaScript-flavoured
//! superset of JSON text.
//!
//! ## What It Accepts
//!
//! - **Unquoted keys**: `{name: 'Marcus'}`
//! - **Both quote styles**: `'single'` and `"double"` strings, content kept verbatim
//! - **Comments**: `// line` and `/* block */`, stripped before parsing
//! - **`undefined`**, alongside `null`
//! - **Elided array elements**: `[1,,3]` and `[,"me",]`
//! - **Ordered objects**: keys keep their insertion order
//!
//! ## Quick Start
//!
//! ```rust
//! use jsrs::{parse, ValueType};
//!
//! let text = r#"{
//!     name: 'Marcus Aurelius', // emperor
//!     passport: "AE127095",
//!     children: [, "Faustina",],
//! }"#;
//!
//! let value = parse(text).unwrap();
//! assert_eq!(value.value_type(), ValueType::Object);
//! assert_eq!(value["name"].as_str(), "Marcus Aurelius");
//! assert!(value["children"][0].is_undefined());
//! assert_eq!(
//!     value.stringify(),
//!     "{name:\"Marcus Aurelius\",passport:\"AE127095\",children:[,\"Faustina\",]}"
//! );
//! ```
//!
//! ### Rust Types
//!
//! Any serde type converts to and from records:
//!
//! ```rust
//! use jsrs::{from_str, to_string};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Point { x: i32, y: i32, label: Option<String> }
//!
//! let point = Point { x: 1, y: -2, label: None };
//! let text = to_string(&point).unwrap();
//! assert_eq!(text, "{x:1,y:-2,label:undefined}");
//!
//! let back: Point = from_str("{ y: -2, x: 1 /* no label */ }").unwrap();
//! assert_eq!(back, point);
//! ```
//!
//! ### Metadata
//!
//! [`Metadata`] decodes compact positional records against a key layout; see
//! the [`metadata`] module.
//!
//! ## Errors
//!
//! Parse errors carry a byte position in the normalized text (whitespace and
//! comments removed) and a kind:
//!
//! ```rust
//! use jsrs::{parse, ErrorKind};
//!
//! let err = parse("{n:}").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::ObjectValue);
//! assert_eq!(err.position(), Some(3));
//! ```
//!
//! Parse failures are also reported through the `log` facade at debug level.
//!
//! ## Examples
//!
//! `demos/records.rs` walks through parsing, building and metadata decoding.
//! Run it with: `cargo run --example records`

pub mod de;
pub mod error;
pub mod macros;
pub mod map;
pub mod metadata;
pub mod normalize;
pub mod options;
pub mod parser;
pub mod ser;
pub mod value;

pub use de::ValueDeserializer;
pub use error::{Error, ErrorKind, Result};
pub use map::RecordMap;
pub use metadata::Metadata;
pub use normalize::normalize;
pub use options::ParseOptions;
pub use parser::Parser;
pub use ser::ValueSerializer;
pub use value::{Value, ValueIndex, ValueType};

use log::{debug, trace};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Parses record text into a [`Value`].
///
/// # Examples
///
/// ```rust
/// use jsrs::parse;
///
/// let value = parse("[25.5, true, 'it`s', undefined, null]").unwrap();
/// assert_eq!(value.stringify(), "[25.5,true,\"it`s\",,null]");
/// ```
///
/// # Errors
///
/// Returns the first syntax error found, or `UnexpectedEnd` if the text is
/// empty once whitespace and comments are removed.
pub fn parse(text: &str) -> Result<Value> {
    parse_with_options(text, &ParseOptions::default())
}

/// Parses record text with custom options.
///
/// # Errors
///
/// Same as [`parse`], plus `DepthLimitExceeded` past `options.max_depth`.
pub fn parse_with_options(text: &str, options: &ParseOptions) -> Result<Value> {
    let normalized = normalize(text);
    trace!(
        "parsing record: {} bytes, {} after normalization",
        text.len(),
        normalized.len()
    );

    Parser::new(&normalized, options)
        .parse_document()
        .map_err(|err| {
            debug!("record parse failed: {}", err);
            err
        })
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// # Examples
///
/// ```rust
/// use jsrs::to_value;
/// use std::collections::BTreeMap;
///
/// let mut scores = BTreeMap::new();
/// scores.insert("b", 2);
/// scores.insert("a", 1);
/// assert_eq!(to_value(&scores).unwrap().stringify(), "{a:1,b:2}");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be represented, e.g. a map with
/// non-string, non-numeric keys.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Serialize any `T: Serialize` to canonical record text.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    Ok(to_value(value)?.stringify())
}

/// Serialize any `T: Serialize` to a writer as canonical record text.
///
/// # Examples
///
/// ```rust
/// use jsrs::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &vec![Some(1), None, Some(3)]).unwrap();
/// assert_eq!(buffer, b"[1,,3]");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string(value)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from a [`Value`].
///
/// # Errors
///
/// Returns an error if the value does not have the shape `T` expects.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    de::from_value(value)
}

/// Deserialize an instance of type `T` from record text.
///
/// # Examples
///
/// ```rust
/// use jsrs::from_str;
///
/// let numbers: Vec<Option<u8>> = from_str("[1,,3]").unwrap();
/// assert_eq!(numbers, vec![Some(1), None, Some(3)]);
/// ```
///
/// # Errors
///
/// Returns a parse error with its position, or a data error if the record
/// does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(parse(s)?)
}

/// Deserialize an instance of type `T` from bytes of record text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not valid record text,
/// or cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}

/// Deserialize an instance of type `T` from an I/O stream of record text.
///
/// The whole stream is read before parsing starts.
///
/// # Examples
///
/// ```rust
/// use jsrs::from_reader;
/// use std::io::Cursor;
///
/// let flags: Vec<bool> = from_reader(Cursor::new(b"[true, false]")).unwrap();
/// assert_eq!(flags, vec![true, false]);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input is not valid record text, or
/// the data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}
