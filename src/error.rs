//! Error types for document marshalling.
//!
//! This module provides one [`Error`] enum covering every failure class:
//!
//! - **I/O errors**: reading from or writing to an underlying stream
//! - **Lexical errors**: mixed line endings, bad escapes, unterminated scalars
//! - **Structural errors**: unexpected markers, indentation violations
//! - **Value errors**: numbers that do not parse, unknown enum constants
//! - **Registry errors**: missing converters or placeholder associations
//!
//! All fallible operations in the crate return [`Result`], an alias for
//! `std::result::Result<T, Error>`.
//!
//! ## Examples
//!
//! ```rust
//! use yamlish::{parse_value, Error};
//!
//! let result = parse_value("text: \"unterminated");
//! assert!(matches!(result, Err(Error::UnexpectedEof(_))));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while reading or writing
/// a document.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The document mixes line ending conventions
    #[error("mixed line endings: caught {found} in a document using {expected}")]
    MixedLineEndings {
        found: &'static str,
        expected: &'static str,
    },

    /// A marker character that does not fit the construct being read
    #[error("unexpected character {found:?} while reading {context}")]
    UnexpectedMarker { found: char, context: &'static str },

    /// The input ended inside an unfinished construct
    #[error("unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),

    /// A node name ran into a line break before its `:`
    #[error("got a new line in a node name: {0:?}")]
    NewLineInNodeName(String),

    /// Unknown escape sequence in a quoted scalar
    #[error("invalid escape sequence: \\{0}")]
    InvalidEscape(char),

    /// A `\x`/`\u`/`\U` escape with bad hex digits or an invalid code point
    #[error("invalid hex escape: {0}")]
    InvalidHexEscape(String),

    /// A block scalar whose body is not indented past its node
    #[error("a block scalar must be indented past its node")]
    BlockScalarNotIndented,

    /// An explicit indentation indicator larger than the first line provides
    #[error("indentation indicator {indicator} exceeds the detected offset {offset}")]
    BlockScalarIndent { indicator: usize, offset: usize },

    /// Numeric text that does not parse as the requested kind
    #[error("invalid {kind} value: {text:?}")]
    NumberFormat { kind: &'static str, text: String },

    /// Enum text that matches none of the declared constants
    #[error("unknown enum value {value:?}, expected one of {expected:?}")]
    UnknownEnumValue {
        value: String,
        expected: &'static [&'static str],
    },

    /// Type mismatch while materializing a decoded value into a field
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A mapping key of a kind that cannot be totally parsed
    #[error("{0} is not supported as a mapping key")]
    UnsupportedKey(&'static str),

    /// A field name that the schema does not declare
    #[error("unknown field {0:?}")]
    UnknownField(String),

    /// No placeholder association registered under the given key
    #[error("no placeholders registered under {0:?}")]
    UnknownPlaceholder(String),

    /// A field references a placeholder replacer id that is not registered
    #[error("no placeholder replacer registered under {0:?}")]
    UnknownReplacer(String),

    /// A scalar style that forbids the value it was asked to write
    #[error("style violation: {0}")]
    StyleViolation(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an error for a marker character that does not belong where
    /// it was found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yamlish::Error;
    ///
    /// let err = Error::unexpected_marker('%', "a sequence entry");
    /// assert!(err.to_string().contains("'%'"));
    /// ```
    pub fn unexpected_marker(found: char, context: &'static str) -> Self {
        Error::UnexpectedMarker { found, context }
    }

    /// Creates a mixed-line-endings error.
    pub fn mixed_line_endings(found: &'static str, expected: &'static str) -> Self {
        Error::MixedLineEndings { found, expected }
    }

    /// Creates a type mismatch error when a decoded value cannot be
    /// materialized into the requested field type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yamlish::Error;
    ///
    /// let err = Error::type_mismatch("integer", "string");
    /// assert!(err.to_string().contains("expected integer"));
    /// ```
    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Error::TypeMismatch { expected, found }
    }

    /// Creates an error for numeric text that does not parse.
    pub fn number_format(kind: &'static str, text: &str) -> Self {
        Error::NumberFormat {
            kind,
            text: text.to_string(),
        }
    }

    /// Creates an error for an enum value outside the declared constants.
    pub fn unknown_enum_value(value: &str, expected: &'static [&'static str]) -> Self {
        Error::UnknownEnumValue {
            value: value.to_string(),
            expected,
        }
    }

    /// Creates an error for a field name the schema does not declare.
    pub fn unknown_field(name: &str) -> Self {
        Error::UnknownField(name.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yamlish::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for stream reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
