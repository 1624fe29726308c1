//! Placeholder registry for late token substitution.
//!
//! Fields may declare placeholder tokens (`{player}`, `{time}`, ...).
//! After a load, every such field gets an association in a [`Placeholders`]
//! side table, keyed by the field's dotted path (`"messages.motd"`).
//! Callers can then substitute arguments into the loaded text at display
//! time without re-reading the document.
//!
//! The table is rebuilt from schema metadata on every load, so stale
//! associations cannot survive a re-read. Asking for a key that has no
//! association is a fatal [`Error::UnknownPlaceholder`].
//!
//! ## Examples
//!
//! ```rust
//! use yamlish::{DefaultPlaceholderReplacer, Placeholders};
//! use std::sync::Arc;
//!
//! let mut table = Placeholders::new();
//! table.add(
//!     "motd",
//!     Arc::new(DefaultPlaceholderReplacer),
//!     &["player", "{online}"],
//!     true,
//! );
//!
//! let text = table
//!     .replace_str("motd", "Hi {player}, {online} online", &["Steve", "7"])
//!     .unwrap();
//! assert_eq!(text, "Hi Steve, 7 online");
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::value::Value;

/// Substitutes arguments for placeholder tokens in loaded text.
pub trait PlaceholderReplacer: Send + Sync {
    /// Returns `value` with `placeholders` substituted by `args`.
    fn replace(&self, value: &str, placeholders: &[String], args: &[&str]) -> String;
}

/// Positional replacer: the n-th token is replaced by the n-th argument.
/// Tokens without a matching argument are left in place.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultPlaceholderReplacer;

impl PlaceholderReplacer for DefaultPlaceholderReplacer {
    fn replace(&self, value: &str, placeholders: &[String], args: &[&str]) -> String {
        let mut result = value.to_string();
        for (token, arg) in placeholders.iter().zip(args) {
            result = result.replace(token.as_str(), arg);
        }

        result
    }
}

struct Association {
    replacer: Arc<dyn PlaceholderReplacer>,
    placeholders: Vec<String>,
}

/// Side table of placeholder associations for one loaded document.
#[derive(Default)]
pub struct Placeholders {
    entries: HashMap<String, Association>,
}

impl Placeholders {
    #[must_use]
    pub fn new() -> Self {
        Placeholders {
            entries: HashMap::new(),
        }
    }

    /// Registers (or re-registers) an association under a key.
    ///
    /// Tokens are wrapped in braces unless they already carry them, or
    /// unless `wrap_with_braces` is false.
    pub fn add(
        &mut self,
        key: &str,
        replacer: Arc<dyn PlaceholderReplacer>,
        tokens: &[&str],
        wrap_with_braces: bool,
    ) {
        let placeholders = tokens
            .iter()
            .map(|token| {
                if wrap_with_braces && !(token.starts_with('{') && token.ends_with('}')) {
                    format!("{{{token}}}")
                } else {
                    (*token).to_string()
                }
            })
            .collect();
        self.entries.insert(
            key.to_string(),
            Association {
                replacer,
                placeholders,
            },
        );
    }

    /// Removes the association under a key.
    ///
    /// Unknown keys are fatal.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        self.entries
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| Error::UnknownPlaceholder(key.to_string()))
    }

    /// Returns `true` if an association exists under the key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The registered (brace-wrapped) tokens under a key.
    pub fn placeholders(&self, key: &str) -> Result<&[String]> {
        self.entries
            .get(key)
            .map(|association| association.placeholders.as_slice())
            .ok_or_else(|| Error::UnknownPlaceholder(key.to_string()))
    }

    /// Substitutes arguments into a loaded string under a key.
    pub fn replace_str(&self, key: &str, value: &str, args: &[&str]) -> Result<String> {
        let association = self
            .entries
            .get(key)
            .ok_or_else(|| Error::UnknownPlaceholder(key.to_string()))?;

        Ok(association
            .replacer
            .replace(value, &association.placeholders, args))
    }

    /// Substitutes arguments into a loaded value under a key.
    ///
    /// Strings are replaced directly; sequences are replaced element-wise,
    /// leaving non-string elements untouched.
    pub fn replace(&self, key: &str, value: &Value, args: &[&str]) -> Result<Value> {
        match value {
            Value::String(text) => Ok(Value::String(self.replace_str(key, text, args)?)),
            Value::Sequence(values) => {
                let mut result = Vec::with_capacity(values.len());
                for element in values {
                    match element {
                        Value::String(text) => {
                            result.push(Value::String(self.replace_str(key, text, args)?));
                        }
                        other => result.push(other.clone()),
                    }
                }
                Ok(Value::Sequence(result))
            }
            other => Ok(other.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{DefaultPlaceholderReplacer, Placeholders};
    use crate::Value;

    fn table_with(key: &str, tokens: &[&str]) -> Placeholders {
        let mut table = Placeholders::new();
        table.add(key, Arc::new(DefaultPlaceholderReplacer), tokens, true);
        table
    }

    #[test]
    fn wraps_bare_tokens() {
        let table = table_with("greeting", &["name", "{kept}"]);
        let tokens = table.placeholders("greeting").unwrap();
        assert_eq!(tokens, ["{name}", "{kept}"]);
    }

    #[test]
    fn positional_replacement() {
        let table = table_with("greeting", &["a", "b"]);
        let replaced = table
            .replace_str("greeting", "{a} and {b} and {a}", &["x", "y"])
            .unwrap();
        assert_eq!(replaced, "x and y and x");
    }

    #[test]
    fn extra_tokens_stay() {
        let table = table_with("greeting", &["a", "b"]);
        let replaced = table.replace_str("greeting", "{a} {b}", &["x"]).unwrap();
        assert_eq!(replaced, "x {b}");
    }

    #[test]
    fn sequence_replaced_element_wise() {
        let table = table_with("lines", &["who"]);
        let value = Value::Sequence(vec![
            Value::from("hi {who}"),
            Value::from(3),
            Value::from("bye {who}"),
        ]);
        let replaced = table.replace("lines", &value, &["Steve"]).unwrap();
        assert_eq!(
            replaced,
            Value::Sequence(vec![
                Value::from("hi Steve"),
                Value::from(3),
                Value::from("bye Steve"),
            ])
        );
    }

    #[test]
    fn unknown_key_is_fatal() {
        let mut table = Placeholders::new();
        assert!(table.remove("nope").is_err());
        assert!(table.replace_str("nope", "x", &[]).is_err());
    }
}
