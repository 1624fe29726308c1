//! Explicit type descriptors and the traits connecting Rust types to the
//! marshalling engine.
//!
//! There is no runtime reflection here: every marshallable struct declares
//! its members up front as [`FieldDescriptor`]s, usually through the
//! [`schema!`](crate::schema!) macro. The engine walks descriptors to drive
//! parsing and writing, and the [`FieldType`] trait materializes decoded
//! [`Value`]s into concrete Rust types.
//!
//! ## Core pieces
//!
//! - [`TypeDescriptor`] / [`ScalarKind`]: the shape the engine should read
//!   or write
//! - [`FieldDescriptor`]: one member of a composite, with node-name
//!   overrides, fallback keys, comments, style, placeholder spec and the
//!   converter lookup id
//! - [`Schema`]: field registration plus by-name access, implemented by
//!   the `schema!` macro
//! - [`FieldType`]: `Value` materialization for any field type
//! - [`KeyType`]: the subset of field types usable as typed mapping keys

use std::collections::VecDeque;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::ser::StringStyle;
use crate::value::{Key, Number, Value};
use crate::ValueMap;

/// Field registration for a composite type.
pub type CompositeFields = fn() -> Vec<FieldDescriptor>;

/// The shape of a value as the engine should read or write it.
#[derive(Clone, Debug)]
pub enum TypeDescriptor {
    /// A single scalar.
    Scalar(ScalarKind),
    /// An ordered sequence of elements of one shape.
    Sequence(Box<TypeDescriptor>),
    /// Scalar keys mapped to values of one shape.
    Mapping(Box<TypeDescriptor>, Box<TypeDescriptor>),
    /// A struct with registered fields.
    Composite(CompositeFields),
    /// Shape guessed from the document.
    Dynamic,
}

/// The scalar kinds the engine can decode directly.
#[derive(Clone, Debug)]
pub enum ScalarKind {
    String,
    Char,
    Bool,
    Integer,
    Float,
    /// An enumeration resolved against its declared constants.
    Enum(&'static [&'static str]),
}

/// Where a field comment is placed relative to its entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommentAt {
    /// Own line(s) above the entry.
    Prepend,
    /// After the value, on the same line.
    SameLine,
    /// Own line(s) below the entry.
    Append,
}

/// A comment attached to a field.
#[derive(Clone, Debug)]
pub struct Comment {
    pub at: CommentAt,
    pub lines: Vec<String>,
}

impl Comment {
    /// Comment line(s) written above the entry.
    #[must_use]
    pub fn prepend(lines: &[&str]) -> Self {
        Comment {
            at: CommentAt::Prepend,
            lines: lines.iter().map(|line| (*line).to_string()).collect(),
        }
    }

    /// A comment written after the value on the same line.
    #[must_use]
    pub fn same_line(line: &str) -> Self {
        Comment {
            at: CommentAt::SameLine,
            lines: vec![line.to_string()],
        }
    }

    /// Comment line(s) written below the entry.
    #[must_use]
    pub fn append(lines: &[&str]) -> Self {
        Comment {
            at: CommentAt::Append,
            lines: lines.iter().map(|line| (*line).to_string()).collect(),
        }
    }
}

/// Placeholder tokens attached to a field.
#[derive(Clone, Debug)]
pub struct PlaceholderSpec {
    pub tokens: Vec<String>,
    /// Id of a replacer registered in [`Options`](crate::Options); the
    /// positional default is used when absent.
    pub replacer: Option<String>,
    pub wrap_with_braces: bool,
}

/// One registered member of a composite type.
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    /// The Rust member name; also the key used in collected mappings.
    pub name: &'static str,
    /// Fixed document key, bypassing name-style conversion.
    pub node_name: Option<String>,
    /// Alternate document keys matched on read, never written.
    pub fallback_keys: Vec<String>,
    pub kind: TypeDescriptor,
    /// Starting id for converter-registry lookup.
    pub type_id: &'static str,
    /// Read-only fields are written out but never assigned on read.
    pub writable: bool,
    pub style: Option<StringStyle>,
    pub comments: Vec<Comment>,
    /// Blank lines emitted before the entry.
    pub blank_lines_before: usize,
    pub placeholders: Option<PlaceholderSpec>,
}

impl FieldDescriptor {
    #[must_use]
    pub fn new(name: &'static str, kind: TypeDescriptor) -> Self {
        FieldDescriptor {
            name,
            node_name: None,
            fallback_keys: Vec::new(),
            kind,
            type_id: "",
            writable: true,
            style: None,
            comments: Vec::new(),
            blank_lines_before: 0,
            placeholders: None,
        }
    }

    /// Sets the converter lookup id. The `schema!` macro fills this from
    /// [`FieldType::type_id`]; override it to route the field through a
    /// converter registered under a custom id.
    #[must_use]
    pub fn with_type_id(mut self, type_id: &'static str) -> Self {
        self.type_id = type_id;
        self
    }

    /// Fixes the document key, bypassing name-style conversion.
    #[must_use]
    pub fn with_node_name(mut self, node_name: &str) -> Self {
        self.node_name = Some(node_name.to_string());
        self
    }

    /// Adds alternate document keys matched on read.
    #[must_use]
    pub fn with_fallback_keys(mut self, keys: &[&str]) -> Self {
        self.fallback_keys
            .extend(keys.iter().map(|key| (*key).to_string()));
        self
    }

    /// Marks the field read-only: written out, skipped on read.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    /// Sets the scalar style used when writing the field.
    #[must_use]
    pub fn with_style(mut self, style: StringStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Attaches a comment to the field.
    #[must_use]
    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comments.push(comment);
        self
    }

    /// Comment line(s) written above the entry.
    #[must_use]
    pub fn comment_prepend(self, lines: &[&str]) -> Self {
        self.with_comment(Comment::prepend(lines))
    }

    /// A comment written after the value on the same line.
    #[must_use]
    pub fn comment_same_line(self, line: &str) -> Self {
        self.with_comment(Comment::same_line(line))
    }

    /// Comment line(s) written below the entry.
    #[must_use]
    pub fn comment_append(self, lines: &[&str]) -> Self {
        self.with_comment(Comment::append(lines))
    }

    /// Emits blank lines before the entry.
    #[must_use]
    pub fn with_blank_lines(mut self, amount: usize) -> Self {
        self.blank_lines_before = amount;
        self
    }

    /// Registers placeholder tokens for the field. Tokens are wrapped in
    /// braces unless they already carry them.
    #[must_use]
    pub fn with_placeholders(mut self, tokens: &[&str]) -> Self {
        let replacer = self.placeholders.take().and_then(|spec| spec.replacer);
        self.placeholders = Some(PlaceholderSpec {
            tokens: tokens.iter().map(|token| (*token).to_string()).collect(),
            replacer,
            wrap_with_braces: true,
        });
        self
    }

    /// Routes the field's placeholders through a replacer registered under
    /// the given id.
    #[must_use]
    pub fn with_placeholder_replacer(mut self, id: &str) -> Self {
        if let Some(spec) = &mut self.placeholders {
            spec.replacer = Some(id.to_string());
        } else {
            self.placeholders = Some(PlaceholderSpec {
                tokens: Vec::new(),
                replacer: Some(id.to_string()),
                wrap_with_braces: true,
            });
        }
        self
    }
}

/// A type whose members are registered for marshalling.
///
/// Usually implemented through the [`schema!`](crate::schema!) macro.
pub trait Schema: Default {
    /// The registered members, in declaration order.
    fn fields() -> Vec<FieldDescriptor>;

    /// Reads one member as a [`Value`], `None` for unknown names.
    fn get_field(&self, name: &str) -> Option<Value>;

    /// Assigns one member from a decoded [`Value`].
    fn set_field(&mut self, name: &str, value: Value) -> Result<()>;
}

/// A Rust type that can appear as a field: it declares the document shape
/// to parse and materializes decoded values.
pub trait FieldType: Sized {
    /// The shape the engine reads or writes for this type.
    fn descriptor() -> TypeDescriptor;

    /// Stable id used to look up converters; built-in scalar and container
    /// ids (`string`, `char`, `bool`, `integer`, `float`, `sequence`,
    /// `mapping`) are terminal for chain resolution.
    fn type_id() -> &'static str;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self>;
}

/// A field type that can also key a typed mapping.
pub trait KeyType: FieldType {
    fn to_key(&self) -> Key;

    fn from_key(key: Key) -> Result<Self> {
        Self::from_value(key.into_value())
    }
}

/// Collects all members of a schema value into an ordered mapping keyed by
/// member name.
#[must_use]
pub fn collect<T: Schema>(value: &T) -> ValueMap {
    let fields = T::fields();
    let mut map = ValueMap::with_capacity(fields.len());
    for field in &fields {
        if let Some(member) = value.get_field(field.name) {
            map.insert(Key::String(field.name.to_string()), member);
        }
    }

    map
}

/// Assigns members of a schema value from a mapping keyed by member name.
pub fn apply<T: Schema>(target: &mut T, value: Value) -> Result<()> {
    let Value::Mapping(map) = value else {
        return Err(Error::type_mismatch("mapping", value.kind_name()));
    };
    for (key, member) in map {
        let Key::String(name) = key else {
            return Err(Error::UnsupportedKey("non-string member key"));
        };
        target.set_field(&name, member)?;
    }

    Ok(())
}

impl FieldType for bool {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Scalar(ScalarKind::Bool)
    }

    fn type_id() -> &'static str {
        "bool"
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(Error::type_mismatch("bool", other.kind_name())),
        }
    }
}

impl KeyType for bool {
    fn to_key(&self) -> Key {
        Key::Bool(*self)
    }
}

impl FieldType for char {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Scalar(ScalarKind::Char)
    }

    fn type_id() -> &'static str {
        "char"
    }

    fn to_value(&self) -> Value {
        Value::Char(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Char(v) => Ok(v),
            other => Err(Error::type_mismatch("char", other.kind_name())),
        }
    }
}

impl KeyType for char {
    fn to_key(&self) -> Key {
        Key::Char(*self)
    }
}

impl FieldType for String {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Scalar(ScalarKind::String)
    }

    fn type_id() -> &'static str {
        "string"
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(v) => Ok(v),
            Value::Char(v) => Ok(v.to_string()),
            other => Err(Error::type_mismatch("string", other.kind_name())),
        }
    }
}

impl KeyType for String {
    fn to_key(&self) -> Key {
        Key::String(self.clone())
    }
}

macro_rules! integer_field_type {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl FieldType for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::Scalar(ScalarKind::Integer)
                }

                fn type_id() -> &'static str {
                    "integer"
                }

                fn to_value(&self) -> Value {
                    Value::Number(Number::Integer(i64::from(*self)))
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::Number(Number::Integer(v)) => <$ty>::try_from(v)
                            .map_err(|_| Error::number_format($name, &v.to_string())),
                        other => Err(Error::type_mismatch($name, other.kind_name())),
                    }
                }
            }

            impl KeyType for $ty {
                fn to_key(&self) -> Key {
                    Key::Integer(i64::from(*self))
                }
            }
        )+
    };
}

integer_field_type! {
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
}

impl FieldType for i64 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Scalar(ScalarKind::Integer)
    }

    fn type_id() -> &'static str {
        "integer"
    }

    fn to_value(&self) -> Value {
        Value::Number(Number::Integer(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Number(Number::Integer(v)) => Ok(v),
            other => Err(Error::type_mismatch("i64", other.kind_name())),
        }
    }
}

impl KeyType for i64 {
    fn to_key(&self) -> Key {
        Key::Integer(*self)
    }
}

impl FieldType for f64 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Scalar(ScalarKind::Float)
    }

    fn type_id() -> &'static str {
        "float"
    }

    fn to_value(&self) -> Value {
        Value::Number(Number::Float(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Number(number) => Ok(number.as_f64()),
            other => Err(Error::type_mismatch("f64", other.kind_name())),
        }
    }
}

impl KeyType for f64 {
    fn to_key(&self) -> Key {
        Key::Float(*self)
    }
}

impl FieldType for f32 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Scalar(ScalarKind::Float)
    }

    fn type_id() -> &'static str {
        "float"
    }

    fn to_value(&self) -> Value {
        Value::Number(Number::Float(f64::from(*self)))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Number(number) => Ok(number.as_f64() as f32),
            other => Err(Error::type_mismatch("f32", other.kind_name())),
        }
    }
}

impl KeyType for f32 {
    fn to_key(&self) -> Key {
        Key::Float(f64::from(*self))
    }
}

impl<T: FieldType> FieldType for Option<T> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }

    fn type_id() -> &'static str {
        T::type_id()
    }

    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FieldType> FieldType for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Sequence(Box::new(T::descriptor()))
    }

    fn type_id() -> &'static str {
        "sequence"
    }

    fn to_value(&self) -> Value {
        Value::Sequence(self.iter().map(FieldType::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Sequence(values) => values.into_iter().map(T::from_value).collect(),
            other => Err(Error::type_mismatch("sequence", other.kind_name())),
        }
    }
}

impl<T: FieldType> FieldType for VecDeque<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Sequence(Box::new(T::descriptor()))
    }

    fn type_id() -> &'static str {
        "sequence"
    }

    fn to_value(&self) -> Value {
        Value::Sequence(self.iter().map(FieldType::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Sequence(values) => values.into_iter().map(T::from_value).collect(),
            other => Err(Error::type_mismatch("sequence", other.kind_name())),
        }
    }
}

impl<K: KeyType + std::hash::Hash + Eq, V: FieldType> FieldType for IndexMap<K, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Mapping(Box::new(K::descriptor()), Box::new(V::descriptor()))
    }

    fn type_id() -> &'static str {
        "mapping"
    }

    fn to_value(&self) -> Value {
        let mut map = ValueMap::with_capacity(self.len());
        for (key, value) in self {
            map.insert(key.to_key(), value.to_value());
        }
        Value::Mapping(map)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Mapping(map) => {
                let mut result = IndexMap::with_capacity(map.len());
                for (key, value) in map {
                    result.insert(K::from_key(key)?, V::from_value(value)?);
                }
                Ok(result)
            }
            other => Err(Error::type_mismatch("mapping", other.kind_name())),
        }
    }
}

impl FieldType for Value {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Dynamic
    }

    fn type_id() -> &'static str {
        "dynamic"
    }

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}
