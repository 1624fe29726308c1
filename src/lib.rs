//! # yamlish
//!
//! Declarative marshalling of Rust structs to and from a YAML-flavored
//! configuration dialect.
//!
//! Structs register their members once with the [`schema!`] macro:
//! defaults, document node names, comments, scalar styles, and placeholder
//! tokens all live next to the field they describe. Loading fills missing
//! keys from the defaults, and writing always produces a document that
//! reads back with the same meaning, comments included.
//!
//! ## Key Features
//!
//! - **Schema-driven**: no runtime reflection; fields are declared up
//!   front and drive both reading and writing
//! - **Comment-preserving output**: per-field comments and blank lines are
//!   written with the values they annotate
//! - **Round-trip safe**: quoting heuristics protect strings that would
//!   otherwise read back as numbers, booleans, or structure
//! - **Two dialects**: the default YAML-flavored syntax and a JSON dialect
//!   (see [`json`]) share schemas, converters, and placeholders
//! - **Placeholders**: fields can declare tokens like `{player}` that are
//!   substituted at display time, after the document is loaded
//!
//! ## Quick Start
//!
//! ```rust
//! use yamlish::{from_str, schema, to_string};
//!
//! schema! {
//!     pub struct ServerConfig {
//!         pub host: String = "localhost".to_string(),
//!         pub port: u16 = 25565,
//!         pub motd: Option<String> = None,
//!     }
//! }
//!
//! let text = to_string(&ServerConfig::default()).unwrap();
//! assert_eq!(text, "host: localhost\nport: 25565\nmotd: null\n");
//!
//! // Missing keys keep their defaults.
//! let loaded = from_str::<ServerConfig>("port: 19132").unwrap();
//! assert_eq!(loaded.value.port, 19132);
//! assert_eq!(loaded.value.host, "localhost");
//! ```
//!
//! ## Dynamic Values
//!
//! Documents with no schema parse into [`Value`], with scalar shapes
//! guessed from the text:
//!
//! ```rust
//! use yamlish::{parse_value, Value};
//!
//! let value = parse_value("a: 1\nlist:\n  - x\n").unwrap();
//! assert_eq!(value["a"], Value::from(1));
//! assert_eq!(value["list"][0], Value::from("x"));
//! ```
//!
//! ## Unknown Keys
//!
//! Keys that match no registered field are skipped with a warning instead
//! of failing the load. [`Loaded::backup_preferred`] reports that this
//! happened, so callers can keep a copy of the original file before
//! writing the parsed state back over it.

pub mod convert;
pub mod de;
pub mod error;
pub mod json;
mod macros;
pub mod map;
pub mod name_style;
pub mod options;
pub mod placeholders;
pub mod schema;
pub mod ser;
mod stream;
pub mod value;

pub use convert::Converter;
pub use de::Reader;
pub use error::{Error, Result};
pub use map::ValueMap;
pub use name_style::NameStyle;
pub use options::Options;
pub use placeholders::{DefaultPlaceholderReplacer, PlaceholderReplacer, Placeholders};
pub use schema::{
    Comment, CommentAt, CompositeFields, FieldDescriptor, FieldType, KeyType, PlaceholderSpec,
    ScalarKind, Schema, TypeDescriptor,
};
pub use ser::{StringStyle, Writer};
pub use value::{Key, Number, Value};

use std::io;
use std::sync::Arc;

/// The result of loading a document against a schema.
pub struct Loaded<T> {
    /// The materialized value.
    pub value: T,
    /// Set when the document carried keys that matched no registered
    /// field. Writing `value` back would drop them, so callers that care
    /// should back the original file up first.
    pub backup_preferred: bool,
    /// Placeholder associations rebuilt from the schema's field metadata,
    /// keyed by dotted member path.
    pub placeholders: Placeholders,
}

/// Reads a schema value from a document with default options.
///
/// # Examples
///
/// ```rust
/// use yamlish::{from_str, schema};
///
/// schema! {
///     pub struct Point {
///         pub x: i64 = 0,
///         pub y: i64 = 0,
///     }
/// }
///
/// let point = from_str::<Point>("x: 1\ny: 2\n").unwrap().value;
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the document is malformed or a field cannot be
/// materialized.
pub fn from_str<T: Schema>(input: &str) -> Result<Loaded<T>> {
    from_str_with_options(input, &Options::default())
}

/// Reads a schema value from a document.
///
/// # Errors
///
/// Returns an error if the document is malformed, a field cannot be
/// materialized, or a field references an unregistered placeholder
/// replacer.
pub fn from_str_with_options<T: Schema>(input: &str, options: &Options) -> Result<Loaded<T>> {
    load_document(de::Reader::new(input, options), options)
}

/// Reads a schema value from an I/O stream with default options.
///
/// # Errors
///
/// Returns an error if reading fails or the document cannot be loaded.
pub fn from_reader<R, T>(mut reader: R) -> Result<Loaded<T>>
where
    R: io::Read,
    T: Schema,
{
    let mut input = String::new();
    reader
        .read_to_string(&mut input)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&input)
}

/// Writes a schema value as a document with default options.
///
/// # Examples
///
/// ```rust
/// use yamlish::{schema, to_string};
///
/// schema! {
///     pub struct Point {
///         pub x: i64 = 0,
///         pub y: i64 = 0,
///     }
/// }
///
/// let text = to_string(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(text, "x: 1\ny: 2\n");
/// ```
///
/// # Errors
///
/// Returns an error if a field violates its declared style.
pub fn to_string<T: Schema>(value: &T) -> Result<String> {
    to_string_with_options(value, &Options::default())
}

/// Writes a schema value as a document.
///
/// # Errors
///
/// Returns an error if a field violates its declared style.
pub fn to_string_with_options<T: Schema>(value: &T, options: &Options) -> Result<String> {
    let mut writer = ser::Writer::new(options);
    writer.write_document(T::fields, &schema::collect(value))?;
    Ok(writer.into_string())
}

/// Writes a schema value to an I/O stream with default options.
///
/// # Errors
///
/// Returns an error if rendering or writing fails.
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: Schema,
{
    to_writer_with_options(writer, value, &Options::default())
}

/// Writes a schema value to an I/O stream.
///
/// # Errors
///
/// Returns an error if rendering or writing fails.
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: &Options) -> Result<()>
where
    W: io::Write,
    T: Schema,
{
    let text = to_string_with_options(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Parses a document into a dynamic [`Value`] with default options.
///
/// # Errors
///
/// Returns an error if the document is malformed.
pub fn parse_value(input: &str) -> Result<Value> {
    parse_value_with_options(input, &Options::default())
}

/// Parses a document into a dynamic [`Value`].
///
/// # Errors
///
/// Returns an error if the document is malformed.
pub fn parse_value_with_options(input: &str, options: &Options) -> Result<Value> {
    de::Reader::new(input, options).read_value(&TypeDescriptor::Dynamic)
}

/// Writes a dynamic [`Value`] as a document with default options.
///
/// # Examples
///
/// ```rust
/// use yamlish::{write_value, Value, ValueMap};
///
/// let mut map = ValueMap::new();
/// map.insert("answer".into(), Value::from(42));
/// assert_eq!(write_value(&Value::Mapping(map)).unwrap(), "answer: 42\n");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be rendered.
pub fn write_value(value: &Value) -> Result<String> {
    write_value_with_options(value, &Options::default())
}

/// Writes a dynamic [`Value`] as a document.
///
/// # Errors
///
/// Returns an error if the value cannot be rendered.
pub fn write_value_with_options(value: &Value, options: &Options) -> Result<String> {
    let mut writer = ser::Writer::new(options);
    writer.write_value(value)?;
    Ok(writer.into_string())
}

/// Reads a document through a prepared reader and builds the placeholder
/// table from the schema's field metadata.
pub(crate) fn load_document<T: Schema>(
    mut reader: de::Reader<'_>,
    options: &Options,
) -> Result<Loaded<T>> {
    let map = reader.read_document(T::fields)?;
    let backup_preferred = reader.backup_preferred();
    let mut value = T::default();
    schema::apply(&mut value, Value::Mapping(map))?;

    let mut placeholders = Placeholders::new();
    register_placeholders(&T::fields(), "", options, &mut placeholders)?;
    Ok(Loaded {
        value,
        backup_preferred,
        placeholders,
    })
}

fn register_placeholders(
    fields: &[FieldDescriptor],
    prefix: &str,
    options: &Options,
    table: &mut Placeholders,
) -> Result<()> {
    for field in fields {
        let path = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{prefix}.{}", field.name)
        };
        if let Some(spec) = &field.placeholders {
            let replacer: Arc<dyn PlaceholderReplacer> = match &spec.replacer {
                Some(id) => options
                    .replacer(id)
                    .ok_or_else(|| Error::UnknownReplacer(id.clone()))?,
                None => Arc::new(DefaultPlaceholderReplacer),
            };
            let tokens: Vec<&str> = spec.tokens.iter().map(String::as_str).collect();
            table.add(&path, replacer, &tokens, spec.wrap_with_braces);
        }
        if let Some(nested) = nested_composite(&field.kind) {
            register_placeholders(&nested(), &path, options, table)?;
        }
    }
    Ok(())
}

/// Finds the registered fields of a composite, looking through sequence
/// and mapping wrappers.
fn nested_composite(kind: &TypeDescriptor) -> Option<CompositeFields> {
    match kind {
        TypeDescriptor::Composite(fields) => Some(*fields),
        TypeDescriptor::Sequence(element) => nested_composite(element),
        TypeDescriptor::Mapping(_, value) => nested_composite(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    schema! {
        struct Server {
            host: String = "localhost".to_string(),
            port: u16 = 25565,
            motd: Option<String> = None,
        }
    }

    #[test]
    fn round_trip_through_text() {
        let config = Server {
            host: "example.org".to_string(),
            port: 19132,
            motd: Some("hi".to_string()),
        };
        let text = to_string(&config).unwrap();
        let back = from_str::<Server>(&text).unwrap().value;
        assert_eq!(back, config);
    }

    #[test]
    fn missing_keys_keep_defaults() {
        let loaded = from_str::<Server>("port: 1024\n").unwrap();
        assert_eq!(loaded.value.port, 1024);
        assert_eq!(loaded.value.host, "localhost");
        assert!(!loaded.backup_preferred);
    }

    #[test]
    fn unknown_keys_prefer_backup() {
        let loaded = from_str::<Server>("port: 1024\nlegacy-flag: yes\n").unwrap();
        assert!(loaded.backup_preferred);
        assert_eq!(loaded.value.port, 1024);
    }

    #[test]
    fn placeholders_come_from_field_metadata() {
        schema! {
            struct Messages {
                motd: String = "Hello {player}!".to_string()
                    => with_placeholders(&["player"]),
            }
        }

        let loaded = from_str::<Messages>("motd: 'Welcome {player}'\n").unwrap();
        let text = loaded
            .placeholders
            .replace_str("motd", &loaded.value.motd, &["Steve"])
            .unwrap();
        assert_eq!(text, "Welcome Steve");
    }

    #[test]
    fn nested_placeholder_paths_are_dotted() {
        schema! {
            struct Inner {
                motd: String = String::new() => with_placeholders(&["player"]),
            }
        }
        schema! {
            struct Outer {
                messages: Inner = Inner::default(),
            }
        }

        let loaded = from_str::<Outer>("messages:\n  motd: hi {player}\n").unwrap();
        assert!(loaded.placeholders.contains("messages.motd"));
        assert_eq!(loaded.value.messages.motd, "hi {player}");
    }

    #[test]
    fn unregistered_replacer_is_fatal() {
        schema! {
            struct Broken {
                motd: String = String::new()
                    => with_placeholders(&["player"]).with_placeholder_replacer("missing"),
            }
        }

        let result = from_str::<Broken>("motd: hi\n");
        assert!(matches!(result, Err(Error::UnknownReplacer(_))));
    }

    #[test]
    fn reader_and_writer_io() {
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &Server::default()).unwrap();
        let back = from_reader::<_, Server>(buffer.as_slice()).unwrap().value;
        assert_eq!(back, Server::default());
    }
}
