//! Bidirectional value converters and chain resolution.
//!
//! A [`Converter`] maps between a *document* representation (what is
//! actually parsed from or written to the file) and a *model*
//! representation (what the field's [`FieldType`](crate::FieldType)
//! materializes). Converters are registered in
//! [`Options`](crate::Options) under their model id and looked up by a
//! field's `type_id`.
//!
//! Chains form when a converter's document id itself has a registered
//! converter: resolution follows those links, stopping at a converter
//! that maps a type to itself, at a built-in terminal id, or after a
//! bounded number of hops. On read the resolved chain is applied
//! outermost-last (document converter first), on write outermost-first.
//!
//! ## Examples
//!
//! ```rust
//! use yamlish::{Converter, Error, Options, TypeDescriptor, ScalarKind, Value};
//!
//! /// Stores an empty string as null and vice versa.
//! struct EmptyAsNull;
//!
//! impl Converter for EmptyAsNull {
//!     fn model_id(&self) -> &'static str { "empty-as-null" }
//!     fn document_id(&self) -> &'static str { "string" }
//!     fn document_descriptor(&self) -> TypeDescriptor {
//!         TypeDescriptor::Scalar(ScalarKind::String)
//!     }
//!     fn deserialize(&self, value: Value) -> Result<Value, Error> {
//!         Ok(match value {
//!             Value::String(s) if s.trim().is_empty() => Value::Null,
//!             other => other,
//!         })
//!     }
//!     fn serialize(&self, value: Value) -> Result<Value, Error> {
//!         Ok(match value {
//!             Value::Null => Value::String(String::new()),
//!             other => other,
//!         })
//!     }
//! }
//!
//! let options = Options::new().with_converter(EmptyAsNull);
//! ```

use std::sync::Arc;

use crate::error::Result;
use crate::options::Options;
use crate::schema::TypeDescriptor;
use crate::value::Value;

/// Ids that terminate chain resolution: the engine can parse and write
/// these shapes directly.
const TERMINAL_IDS: &[&str] = &[
    "string", "char", "bool", "integer", "float", "sequence", "mapping", "dynamic",
];

/// Resolution follows at most this many converter links.
const MAX_CHAIN: usize = 8;

/// A pure bidirectional mapping between a document representation and a
/// model representation of a field.
pub trait Converter: Send + Sync {
    /// The id this converter is registered under.
    fn model_id(&self) -> &'static str;

    /// The id of the representation actually present in the document.
    fn document_id(&self) -> &'static str;

    /// The shape the engine should parse for this converter's input.
    fn document_descriptor(&self) -> TypeDescriptor;

    /// Document representation to model representation.
    fn deserialize(&self, value: Value) -> Result<Value>;

    /// Model representation to document representation.
    fn serialize(&self, value: Value) -> Result<Value>;
}

pub(crate) fn is_terminal(id: &str) -> bool {
    TERMINAL_IDS.contains(&id)
}

/// Resolves the converter chain for a field's type id.
///
/// The first element, when present, is the field's own converter; deeper
/// elements are reached through document-id links.
pub(crate) fn resolve_chain(options: &Options, type_id: &str) -> Vec<Arc<dyn Converter>> {
    let mut chain: Vec<Arc<dyn Converter>> = Vec::new();
    let mut id = type_id.to_string();
    while let Some(converter) = options.converter(&id) {
        let document_id = converter.document_id();
        let fixed_point = document_id == converter.model_id();
        chain.push(converter);
        if fixed_point || is_terminal(document_id) || chain.len() >= MAX_CHAIN {
            break;
        }
        id = document_id.to_string();
    }

    chain
}

/// The shape the engine should parse for a field once its chain is
/// resolved; falls back to the declared shape without converters.
pub(crate) fn document_shape(
    chain: &[Arc<dyn Converter>],
    declared: &TypeDescriptor,
) -> TypeDescriptor {
    chain
        .last()
        .map_or_else(|| declared.clone(), |converter| converter.document_descriptor())
}

/// Applies a resolved chain to a decoded document value, deepest converter
/// first.
pub(crate) fn deserialize_chain(chain: &[Arc<dyn Converter>], mut value: Value) -> Result<Value> {
    for converter in chain.iter().rev() {
        value = converter.deserialize(value)?;
    }

    Ok(value)
}

/// Applies a resolved chain to a model value, the field's converter first.
pub(crate) fn serialize_chain(chain: &[Arc<dyn Converter>], mut value: Value) -> Result<Value> {
    for converter in chain {
        value = converter.serialize(value)?;
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{deserialize_chain, resolve_chain, serialize_chain, Converter};
    use crate::schema::{ScalarKind, TypeDescriptor};
    use crate::{Options, Result, Value};

    struct Upper;

    impl Converter for Upper {
        fn model_id(&self) -> &'static str {
            "upper"
        }

        fn document_id(&self) -> &'static str {
            "string"
        }

        fn document_descriptor(&self) -> TypeDescriptor {
            TypeDescriptor::Scalar(ScalarKind::String)
        }

        fn deserialize(&self, value: Value) -> Result<Value> {
            match value {
                Value::String(s) => Ok(Value::String(s.to_uppercase())),
                other => Ok(other),
            }
        }

        fn serialize(&self, value: Value) -> Result<Value> {
            match value {
                Value::String(s) => Ok(Value::String(s.to_lowercase())),
                other => Ok(other),
            }
        }
    }

    struct StringToB;

    impl Converter for StringToB {
        fn model_id(&self) -> &'static str {
            "string"
        }

        fn document_id(&self) -> &'static str {
            "b"
        }

        fn document_descriptor(&self) -> TypeDescriptor {
            TypeDescriptor::Scalar(ScalarKind::String)
        }

        fn deserialize(&self, value: Value) -> Result<Value> {
            Ok(value)
        }

        fn serialize(&self, value: Value) -> Result<Value> {
            Ok(value)
        }
    }

    #[test]
    fn unregistered_id_resolves_empty() {
        let options = Options::new();
        assert!(resolve_chain(&options, "integer").is_empty());
    }

    #[test]
    fn terminal_document_id_stops_chain() {
        // "upper" reads a string; a converter registered under "string"
        // must not be pulled into the chain behind it.
        let options = Options::new().with_converter(Upper).with_converter(StringToB);
        let chain = resolve_chain(&options, "upper");
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].model_id(), "upper");
    }

    #[test]
    fn chain_applies_both_ways() {
        let options = Options::new().with_converter(Upper);
        let chain = resolve_chain(&options, "upper");
        assert_eq!(
            deserialize_chain(&chain, Value::from("abc")).unwrap(),
            Value::from("ABC")
        );
        assert_eq!(
            serialize_chain(&chain, Value::from("ABC")).unwrap(),
            Value::from("abc")
        );
    }
}
