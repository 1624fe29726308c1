//! Ordered map type for document mappings.
//!
//! This module provides [`ValueMap`], a wrapper around [`IndexMap`] that
//! maintains insertion order for mapping entries. Order is semantic here:
//! configuration files are written back in the order their entries were
//! declared or read, so a plain `HashMap` would scramble documents.
//!
//! ## Examples
//!
//! ```rust
//! use yamlish::{Key, Value, ValueMap};
//!
//! let mut map = ValueMap::new();
//! map.insert(Key::from("name"), Value::from("Alice"));
//! map.insert(Key::from("age"), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get_str("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use indexmap::IndexMap;

use crate::{Key, Value};

/// An ordered map of scalar keys to document values.
///
/// A thin wrapper around [`IndexMap`] that maintains insertion order,
/// which keeps written documents stable across load/save cycles.
///
/// # Examples
///
/// ```rust
/// use yamlish::{Key, Value, ValueMap};
///
/// let mut map = ValueMap::new();
/// map.insert(Key::from("first"), Value::from(1));
/// map.insert(Key::from("second"), Value::from(2));
///
/// let keys: Vec<String> = map.keys().map(|k| k.to_string()).collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValueMap(IndexMap<Key, Value>);

impl ValueMap {
    /// Creates an empty `ValueMap`.
    #[must_use]
    pub fn new() -> Self {
        ValueMap(IndexMap::new())
    }

    /// Creates an empty `ValueMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ValueMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned
    /// and the entry keeps its original position.
    pub fn insert(&mut self, key: Key, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the value under a string key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yamlish::{Key, Value, ValueMap};
    ///
    /// let mut map = ValueMap::new();
    /// map.insert(Key::from("key"), Value::from(42));
    /// assert_eq!(map.get_str("key").and_then(|v| v.as_i64()), Some(42));
    /// ```
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.0.get(&Key::String(key.to_string()))
    }

    /// Removes the entry under the key, preserving the order of the
    /// remaining entries.
    pub fn shift_remove(&mut self, key: &Key) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Returns `true` if the map contains the key.
    #[must_use]
    pub fn contains_key(&self, key: &Key) -> bool {
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
    pub fn keys(&self) -> indexmap::map::Keys<'_, Key, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, Key, Value> {
        self.0.values()
    }

    /// Returns an iterator over the entries of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.0.iter()
    }
}

impl Default for ValueMap {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoIterator for ValueMap {
    type Item = (Key, Value);
    type IntoIter = indexmap::map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueMap {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(Key, Value)> for ValueMap {
    fn from_iter<T: IntoIterator<Item = (Key, Value)>>(iter: T) -> Self {
        ValueMap(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::ValueMap;
    use crate::{Key, Value};

    #[test]
    fn preserves_insertion_order() {
        let mut map = ValueMap::new();
        map.insert(Key::from("z"), Value::from(1));
        map.insert(Key::from("a"), Value::from(2));
        map.insert(Key::from("m"), Value::from(3));

        let keys: Vec<String> = map.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn reinsert_keeps_position() {
        let mut map = ValueMap::new();
        map.insert(Key::from("a"), Value::from(1));
        map.insert(Key::from("b"), Value::from(2));
        assert_eq!(map.insert(Key::from("a"), Value::from(9)), Some(Value::from(1)));

        let keys: Vec<String> = map.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
