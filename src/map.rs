//! Ordered map type for record objects.
//!
//! [`RecordMap`] wraps an [`IndexMap`] so that a single structure owns both the
//! key lookup table and the key order. Insertion order is what the serializer
//! writes, so `{b:1,a:2}` round-trips as `{b:1,a:2}`.
//!
//! Two properties matter for records:
//!
//! - Re-inserting an existing key replaces the value but keeps the key at its
//!   first position.
//! - Equality ignores order: `{a:1,b:2} == {b:2,a:1}`.
//!
//! ## Examples
//!
//! ```rust
//! use jsrs::{RecordMap, Value};
//!
//! let mut map = RecordMap::new();
//! map.insert("name".to_string(), Value::from("Marcus"));
//! map.insert("age".to_string(), Value::from(30));
//! map.insert("name".to_string(), Value::from("Aurelius"));
//!
//! let keys: Vec<_> = map.keys().cloned().collect();
//! assert_eq!(keys, vec!["name", "age"]);
//! assert_eq!(map.get("name").map(|v| v.as_str()), Some("Aurelius"));
//! ```

use crate::Value;
use indexmap::IndexMap;
use std::collections::HashMap;

/// An insertion-ordered map of keys to record values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordMap(IndexMap<String, Value>);

impl RecordMap {
    /// Creates an empty `RecordMap`.
    #[must_use]
    pub fn new() -> Self {
        RecordMap(IndexMap::new())
    }

    /// Creates an empty `RecordMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RecordMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned and the
    /// key keeps its first position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsrs::{RecordMap, Value};
    ///
    /// let mut map = RecordMap::new();
    /// assert!(map.insert("key".to_string(), Value::from(42)).is_none());
    /// assert!(map.insert("key".to_string(), Value::from(43)).is_some());
    /// ```
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the key-value pair stored at `index` in insertion order.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&String, &Value)> {
        self.0.get_index(index)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl From<HashMap<String, Value>> for RecordMap {
    fn from(map: HashMap<String, Value>) -> Self {
        RecordMap(map.into_iter().collect())
    }
}

impl From<RecordMap> for HashMap<String, Value> {
    fn from(map: RecordMap) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for RecordMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Collecting keeps the first position of a repeated key and its last value.
impl FromIterator<(String, Value)> for RecordMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        RecordMap(IndexMap::from_iter(iter))
    }
}
