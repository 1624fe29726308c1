//! Dynamic value representation for document data.
//!
//! This module provides the [`Value`] enum which represents any value the
//! engine can decode. It is the interchange form between the character-level
//! codecs, converters, and typed schemas: readers produce `Value`s, writers
//! consume them, and [`FieldType`](crate::FieldType) implementations
//! materialize them into concrete Rust types.
//!
//! ## Core Types
//!
//! - [`Value`]: any document value (null, bool, number, char, string,
//!   sequence, mapping)
//! - [`Number`]: an integer or floating-point scalar
//! - [`Key`]: a hashable scalar usable as a mapping key
//!
//! ## Examples
//!
//! ```rust
//! use yamlish::{Number, Value};
//!
//! let value = Value::from(42);
//! assert!(value.is_number());
//! assert_eq!(value.as_i64(), Some(42));
//!
//! let text = Value::from("hello");
//! assert_eq!(text.as_str(), Some("hello"));
//! ```

use crate::ValueMap;

/// A dynamically-typed representation of any document value.
///
/// # Examples
///
/// ```rust
/// use yamlish::{Number, Value};
///
/// let null = Value::Null;
/// let num = Value::Number(Number::Integer(42));
/// let text = Value::String("hello".to_string());
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    Char(char),
    String(String),
    Sequence(Vec<Value>),
    Mapping(ValueMap),
}

/// An integer or floating-point numeric value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Returns `true` if this is an integer value.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Returns the value as an `i64` if it is an integer.
    #[inline]
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(value) => Some(*value),
            Number::Float(_) => None,
        }
    }

    /// Returns the value as an `f64`, widening integers.
    #[inline]
    #[must_use]
    pub const fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(value) => *value as f64,
            Number::Float(value) => *value,
        }
    }
}

impl Value {
    /// Returns `true` if the value is [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if the value is a number.
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns `true` if the value is a string.
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if the value is a sequence.
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    /// Returns `true` if the value is a mapping.
    #[must_use]
    pub const fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    /// Returns the boolean value, if this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as an `i64`, if this is an integer number.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(number) => number.as_i64(),
            _ => None,
        }
    }

    /// Returns the value as an `f64`, if this is any number.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(number.as_f64()),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the sequence elements, if this is a sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the mapping, if this is a mapping.
    #[must_use]
    pub const fn as_mapping(&self) -> Option<&ValueMap> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// A short name of the value's kind, used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(Number::Integer(_)) => "integer",
            Value::Number(Number::Float(_)) => "float",
            Value::Char(_) => "char",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Number::Integer(i64::from(value)))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::Integer(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::Float(value))
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Sequence(values)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Mapping(map)
    }
}

/// A scalar mapping key.
///
/// Only totally-parseable scalars can key a mapping. Floating-point keys
/// compare and hash by bit pattern, so `0.0` and `-0.0` are distinct keys
/// and a `NaN` key equals itself.
#[derive(Clone, Debug)]
pub enum Key {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Char(char),
    String(String),
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Bool(a), Key::Bool(b)) => a == b,
            (Key::Integer(a), Key::Integer(b)) => a == b,
            (Key::Float(a), Key::Float(b)) => a.to_bits() == b.to_bits(),
            (Key::Char(a), Key::Char(b)) => a == b,
            (Key::String(a), Key::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Key::Bool(value) => {
                state.write_u8(0);
                value.hash(state);
            }
            Key::Integer(value) => {
                state.write_u8(1);
                value.hash(state);
            }
            Key::Float(value) => {
                state.write_u8(2);
                value.to_bits().hash(state);
            }
            Key::Char(value) => {
                state.write_u8(3);
                value.hash(state);
            }
            Key::String(value) => {
                state.write_u8(4);
                value.hash(state);
            }
        }
    }
}

impl Key {
    /// Converts the key into its [`Value`] form.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Key::Bool(value) => Value::Bool(value),
            Key::Integer(value) => Value::Number(Number::Integer(value)),
            Key::Float(value) => Value::Number(Number::Float(value)),
            Key::Char(value) => Value::Char(value),
            Key::String(value) => Value::String(value),
        }
    }

    /// Builds a key from a scalar [`Value`].
    ///
    /// Containers and null are rejected with
    /// [`Error::UnsupportedKey`](crate::Error::UnsupportedKey).
    pub fn from_value(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(v) => Ok(Key::Bool(v)),
            Value::Number(Number::Integer(v)) => Ok(Key::Integer(v)),
            Value::Number(Number::Float(v)) => Ok(Key::Float(v)),
            Value::Char(v) => Ok(Key::Char(v)),
            Value::String(v) => Ok(Key::String(v)),
            other => Err(crate::Error::UnsupportedKey(other.kind_name())),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::String(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::String(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Integer(value)
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Bool(value) => write!(f, "{value}"),
            Key::Integer(value) => write!(f, "{value}"),
            Key::Float(value) => write!(f, "{value}"),
            Key::Char(value) => write!(f, "{value}"),
            Key::String(value) => write!(f, "{value}"),
        }
    }
}

static NULL: Value = Value::Null;

/// Indexing into anything but a mapping with the key present yields
/// [`Value::Null`].
impl std::ops::Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match self {
            Value::Mapping(map) => map.get_str(key).unwrap_or(&NULL),
            _ => &NULL,
        }
    }
}

/// Indexing into anything but a sequence, or past its end, yields
/// [`Value::Null`].
impl std::ops::Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        match self {
            Value::Sequence(values) => values.get(index).unwrap_or(&NULL),
            _ => &NULL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Key, Number, Value};

    #[test]
    fn accessors() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::from(42).as_i64(), Some(42));
        assert_eq!(Value::from(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
        assert_eq!(Value::from(7).kind_name(), "integer");
    }

    #[test]
    fn integer_widens_to_float() {
        assert_eq!(Number::Integer(3).as_f64(), 3.0);
    }

    #[test]
    fn float_keys_compare_by_bits() {
        assert_ne!(Key::Float(0.0), Key::Float(-0.0));
        assert_eq!(Key::Float(1.5), Key::Float(1.5));
    }

    #[test]
    fn container_keys_rejected() {
        assert!(Key::from_value(Value::Sequence(vec![])).is_err());
    }
}
