//! Record metadata: positional data records decoded against a key layout.
//!
//! A metadata record is an object whose keys, in order, name the fields of a
//! compact data record. The data record is just an array of values, one per
//! field. A field whose metadata value is itself an object describes a nested
//! layout, and the matching data slot is a nested array.
//!
//! ```rust
//! use jsrs::Metadata;
//!
//! let meta = Metadata::parse("{name:'string',born:{date:'string',place:'string'}}").unwrap();
//! let person = meta.decode_str("['Marcus Aurelius',['121-04-26','Rome']]").unwrap();
//! assert_eq!(
//!     person.stringify(),
//!     "{name:\"Marcus Aurelius\",born:{date:\"121-04-26\",place:\"Rome\"}}"
//! );
//!
//! let data = meta.encode(&person).unwrap();
//! assert_eq!(data.stringify(), "[\"Marcus Aurelius\",[\"121-04-26\",\"Rome\"]]");
//! ```
//!
//! Short data arrays are fine; fields without a slot decode as `Undefined`.

use crate::{parse, Error, RecordMap, Result, Value};
use log::debug;

/// An ordered field layout read from a metadata record.
#[derive(Clone, Debug, PartialEq)]
pub struct Metadata {
    fields: Vec<Field>,
}

#[derive(Clone, Debug, PartialEq)]
struct Field {
    name: String,
    nested: Option<Metadata>,
}

fn mismatch(msg: String) -> Error {
    debug!("metadata mismatch: {}", msg);
    Error::metadata(msg)
}

impl Metadata {
    /// Builds a layout from a metadata record, which must be an object.
    pub fn new(record: Value) -> Result<Self> {
        match record {
            Value::Object(map) => {
                let fields = map
                    .into_iter()
                    .map(|(name, value)| -> Result<Field> {
                        let nested = match value {
                            Value::Object(_) => Some(Metadata::new(value)?),
                            _ => None,
                        };
                        Ok(Field { name, nested })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Metadata { fields })
            }
            other => Err(mismatch(format!(
                "metadata record must be an object, found {}",
                other.value_type()
            ))),
        }
    }

    /// Parses record text and builds a layout from it.
    pub fn parse(text: &str) -> Result<Self> {
        Metadata::new(parse(text)?)
    }

    /// Field names in layout order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Turns a data array into an object keyed by this layout.
    ///
    /// # Errors
    ///
    /// `Error::Metadata` if `data` is not an array, has more elements than the
    /// layout has fields, or holds something other than an array, `undefined`
    /// or `null` where a nested layout is expected.
    pub fn decode(&self, data: &Value) -> Result<Value> {
        let elements = match data {
            Value::Array(elements) => elements,
            other => {
                return Err(mismatch(format!(
                    "data record must be an array, found {}",
                    other.value_type()
                )))
            }
        };
        if elements.len() > self.fields.len() {
            return Err(mismatch(format!(
                "data record has {} elements but metadata declares {} fields",
                elements.len(),
                self.fields.len()
            )));
        }

        let mut map = RecordMap::with_capacity(self.fields.len());
        for (i, field) in self.fields.iter().enumerate() {
            let element = elements.get(i).unwrap_or(&Value::Undefined);
            let value = match (&field.nested, element) {
                (Some(layout), Value::Array(_)) => layout.decode(element)?,
                (Some(_), Value::Undefined | Value::Null) | (None, _) => element.clone(),
                (Some(_), other) => {
                    return Err(mismatch(format!(
                        "field '{}' has a nested layout but holds {}",
                        field.name,
                        other.value_type()
                    )))
                }
            };
            map.insert(field.name.clone(), value);
        }
        Ok(Value::Object(map))
    }

    /// Parses data record text and decodes it.
    pub fn decode_str(&self, text: &str) -> Result<Value> {
        self.decode(&parse(text)?)
    }

    /// Turns an object into a data array in layout order.
    ///
    /// Fields missing from the object are encoded as `Undefined`.
    ///
    /// # Errors
    ///
    /// `Error::Metadata` if `record` is not an object, has a key the layout
    /// does not name, or holds a non-object where a nested layout is expected.
    pub fn encode(&self, record: &Value) -> Result<Value> {
        let map = match record {
            Value::Object(map) => map,
            other => {
                return Err(mismatch(format!(
                    "record must be an object, found {}",
                    other.value_type()
                )))
            }
        };
        if let Some(extra) = map.keys().find(|key| !self.keys().any(|name| name == key.as_str())) {
            return Err(mismatch(format!("key '{}' is not described by the metadata", extra)));
        }

        let mut elements = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = map.get(&field.name).unwrap_or(&Value::Undefined);
            let element = match (&field.nested, value) {
                (Some(layout), Value::Object(_)) => layout.encode(value)?,
                (Some(_), Value::Undefined | Value::Null) | (None, _) => value.clone(),
                (Some(_), other) => {
                    return Err(mismatch(format!(
                        "field '{}' has a nested layout but holds {}",
                        field.name,
                        other.value_type()
                    )))
                }
            };
            elements.push(element);
        }
        Ok(Value::Array(elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_keys_follow_record_order() {
        let meta = Metadata::parse("{z:1,a:2,m:{x:1}}").unwrap();
        assert_eq!(meta.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        assert_eq!(meta.len(), 3);
        assert!(Metadata::parse("{}").unwrap().is_empty());
    }

    #[test]
    fn test_metadata_must_be_object() {
        let err = Metadata::parse("[1,2]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Metadata);
        assert_eq!(Metadata::parse("{a:").unwrap_err().kind(), ErrorKind::ObjectValue);
    }

    #[test]
    fn test_short_data_fills_undefined() {
        let meta = Metadata::parse("{a:1,b:1,c:1}").unwrap();
        let value = meta.decode_str("[1]").unwrap();
        assert_eq!(value.stringify(), "{a:1,b:undefined,c:undefined}");
    }

    #[test]
    fn test_elided_slot_stays_undefined() {
        let meta = Metadata::parse("{a:1,inner:{x:1,y:1},c:1}").unwrap();
        let value = meta.decode_str("[1,,3]").unwrap();
        assert!(value["inner"].is_undefined());
        assert_eq!(value["c"].as_number(), 3.0);
    }

    #[test]
    fn test_decode_errors() {
        let meta = Metadata::parse("{a:1,inner:{x:1}}").unwrap();
        assert_eq!(meta.decode_str("{a:1}").unwrap_err().kind(), ErrorKind::Metadata);
        assert_eq!(meta.decode_str("[1,[2],3]").unwrap_err().kind(), ErrorKind::Metadata);
        assert_eq!(meta.decode_str("[1,'x']").unwrap_err().kind(), ErrorKind::Metadata);
        assert_eq!(meta.decode_str("[1,[1,2]]").unwrap_err().kind(), ErrorKind::Metadata);
    }

    #[test]
    fn test_encode() {
        let meta = Metadata::parse("{a:1,inner:{x:1,y:1},c:1}").unwrap();
        let record = parse("{c:3,inner:{y:2}}").unwrap();
        assert_eq!(meta.encode(&record).unwrap().stringify(), "[,[,2],3]");

        assert!(meta.encode(&parse("{d:1}").unwrap()).is_err());
        assert!(meta.encode(&parse("{inner:[1]}").unwrap()).is_err());
        assert!(meta.encode(&parse("[1]").unwrap()).is_err());
    }
}
