//! JSON dialect entry points.
//!
//! The same schemas, converters, and placeholder metadata drive both
//! dialects; these functions only swap the syntax. Output is always
//! pretty-printed with the configured indent, keys are double-quoted, and
//! comments are written with `//` markers. On read, `//` comments are
//! skipped the same way `#` comments are in the default dialect.
//!
//! ## Examples
//!
//! ```rust
//! use yamlish::{json, schema};
//!
//! schema! {
//!     pub struct Point {
//!         pub x: i64 = 0,
//!         pub y: i64 = 0,
//!     }
//! }
//!
//! let text = json::to_string(&Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(text, "{\n  \"x\": 1,\n  \"y\": 2\n}\n");
//!
//! let point = json::from_str::<Point>(&text).unwrap().value;
//! assert_eq!(point, Point { x: 1, y: 2 });
//! ```

use crate::de::Reader;
use crate::ser::Writer;
use crate::{schema, Loaded, Options, Result, Schema, TypeDescriptor, Value};

/// Reads a schema value from a JSON document with default options.
///
/// # Errors
///
/// Returns an error when the document is malformed or a field cannot be
/// materialized.
pub fn from_str<T: Schema>(input: &str) -> Result<Loaded<T>> {
    from_str_with_options(input, &Options::default())
}

/// Reads a schema value from a JSON document.
///
/// # Errors
///
/// Returns an error when the document is malformed or a field cannot be
/// materialized.
pub fn from_str_with_options<T: Schema>(input: &str, options: &Options) -> Result<Loaded<T>> {
    crate::load_document(Reader::json(input, options), options)
}

/// Writes a schema value as a JSON document with default options.
///
/// # Errors
///
/// Returns an error when a field violates its declared style.
pub fn to_string<T: Schema>(value: &T) -> Result<String> {
    to_string_with_options(value, &Options::default())
}

/// Writes a schema value as a JSON document.
///
/// # Errors
///
/// Returns an error when a field violates its declared style.
pub fn to_string_with_options<T: Schema>(value: &T, options: &Options) -> Result<String> {
    let mut writer = Writer::json(options);
    writer.write_document(T::fields, &schema::collect(value))?;
    Ok(writer.into_string())
}

/// Parses a JSON document into a dynamic [`Value`] with default options.
///
/// # Errors
///
/// Returns an error when the document is malformed.
pub fn parse_value(input: &str) -> Result<Value> {
    parse_value_with_options(input, &Options::default())
}

/// Parses a JSON document into a dynamic [`Value`].
///
/// # Errors
///
/// Returns an error when the document is malformed.
pub fn parse_value_with_options(input: &str, options: &Options) -> Result<Value> {
    Reader::json(input, options).read_value(&TypeDescriptor::Dynamic)
}

/// Writes a dynamic [`Value`] as a JSON document with default options.
///
/// # Errors
///
/// Returns an error when the value cannot be rendered.
pub fn write_value(value: &Value) -> Result<String> {
    write_value_with_options(value, &Options::default())
}

/// Writes a dynamic [`Value`] as a JSON document.
///
/// # Errors
///
/// Returns an error when the value cannot be rendered.
pub fn write_value_with_options(value: &Value, options: &Options) -> Result<String> {
    let mut writer = Writer::json(options);
    writer.write_value(value)?;
    Ok(writer.into_string())
}
