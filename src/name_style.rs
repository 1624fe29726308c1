//! Naming convention conversion for node names.
//!
//! Model member names and document node names may follow different
//! conventions (a Rust field `max_players` is usually written to the
//! document as `max-players`). [`NameStyle`] enumerates the supported
//! conventions and converts between any two of them by pivoting through
//! `MACRO_CASE`.
//!
//! ## Examples
//!
//! ```rust
//! use yamlish::NameStyle;
//!
//! let node = NameStyle::Snake.convert("max_players", NameStyle::Kebab);
//! assert_eq!(node, "max-players");
//!
//! let field = NameStyle::Kebab.convert("max-players", NameStyle::Camel);
//! assert_eq!(field, "maxPlayers");
//! ```

/// A naming convention for member and node names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameStyle {
    /// `lower-kebab-case`
    Kebab,
    /// `camelCase`
    Camel,
    /// `PascalCase`
    Pascal,
    /// `lower_snake_case`
    Snake,
    /// `UPPER_MACRO_CASE`
    Macro,
    /// `UPPER-COBOL-CASE`
    Cobol,
}

impl NameStyle {
    /// Converts `name` from this style into `target`.
    ///
    /// Identical source and target styles return the input unchanged.
    #[must_use]
    pub fn convert(self, name: &str, target: NameStyle) -> String {
        if self == target {
            return name.to_string();
        }

        target.from_macro_case(&self.to_macro_case(name))
    }

    fn to_macro_case(self, name: &str) -> String {
        match self {
            NameStyle::Kebab => name.replace('-', "_").to_uppercase(),
            NameStyle::Camel | NameStyle::Pascal => split_camel_case(name),
            NameStyle::Snake => name.to_uppercase(),
            NameStyle::Macro => name.to_string(),
            NameStyle::Cobol => name.replace('-', "_"),
        }
    }

    fn from_macro_case(self, name: &str) -> String {
        match self {
            NameStyle::Kebab => name.replace('_', "-").to_lowercase(),
            NameStyle::Camel => to_camel_case(name, false),
            NameStyle::Pascal => to_camel_case(name, true),
            NameStyle::Snake => name.to_lowercase(),
            NameStyle::Macro => name.to_string(),
            NameStyle::Cobol => name.replace('_', "-"),
        }
    }
}

/// Inserts `_` at word boundaries of a camel-cased name and upper-cases it.
///
/// A boundary is a transition from a non-uppercase character to an
/// uppercase one, or from a non-digit to a digit.
fn split_camel_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    let mut previous = '\0';
    for ch in name.chars() {
        let boundary = (ch.is_uppercase() && previous != '\0' && !previous.is_uppercase())
            || (ch.is_ascii_digit() && previous != '\0' && !previous.is_ascii_digit());
        if boundary {
            result.push('_');
        }
        result.extend(ch.to_uppercase());
        previous = ch;
    }

    result
}

fn to_camel_case(name: &str, capitalize_first: bool) -> String {
    let mut result = String::with_capacity(name.len());
    let mut upper_next = capitalize_first;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = true;
            continue;
        }

        if upper_next {
            result.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            result.extend(ch.to_lowercase());
        }
    }

    result
}
