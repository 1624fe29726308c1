//! Configuration options for document marshalling.
//!
//! [`Options`] controls naming conventions, output formatting, lenient
//! numeric parsing, and carries the converter and placeholder-replacer
//! registries.
//!
//! ## Examples
//!
//! ```rust
//! use yamlish::{NameStyle, Options};
//!
//! // Defaults: snake_case fields written as kebab-case nodes,
//! // two-space indent, LF line separator.
//! let options = Options::new();
//!
//! // Custom configuration
//! let options = Options::new()
//!     .with_node_name_style(NameStyle::Camel)
//!     .with_safe_mode(true)
//!     .with_indent("    ");
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::convert::Converter;
use crate::name_style::NameStyle;
use crate::placeholders::PlaceholderReplacer;

/// Configuration for reading and writing documents.
///
/// Built with chained `with_*` methods; cloning is cheap (registries are
/// shared behind `Arc`s).
#[derive(Clone)]
pub struct Options {
    /// Naming convention of Rust member names.
    pub field_name_style: NameStyle,
    /// Naming convention of document node names.
    pub node_name_style: NameStyle,
    /// When enabled, unparseable numbers decode to zero with a warning
    /// instead of failing.
    pub safe_mode: bool,
    /// When enabled, non-ASCII characters are written literally instead of
    /// being escaped.
    pub allow_unicode: bool,
    /// Line separator for output.
    pub line_separator: String,
    /// One level of indentation.
    pub indent: String,
    /// Spaces between a comment marker and its text.
    pub comment_value_indent: usize,
    /// Warn (via `log`) when a document key matches no registered field.
    pub log_missing_fields: bool,
    converters: HashMap<String, Arc<dyn Converter>>,
    replacers: HashMap<String, Arc<dyn PlaceholderReplacer>>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            field_name_style: NameStyle::Snake,
            node_name_style: NameStyle::Kebab,
            safe_mode: false,
            allow_unicode: false,
            line_separator: "\n".to_string(),
            indent: "  ".to_string(),
            comment_value_indent: 1,
            log_missing_fields: true,
            converters: HashMap::new(),
            replacers: HashMap::new(),
        }
    }
}

impl Options {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the naming convention of Rust member names.
    #[must_use]
    pub fn with_field_name_style(mut self, style: NameStyle) -> Self {
        self.field_name_style = style;
        self
    }

    /// Sets the naming convention of document node names.
    #[must_use]
    pub fn with_node_name_style(mut self, style: NameStyle) -> Self {
        self.node_name_style = style;
        self
    }

    /// Enables or disables lenient numeric parsing (bad numbers decode to
    /// zero with a warning).
    #[must_use]
    pub fn with_safe_mode(mut self, safe_mode: bool) -> Self {
        self.safe_mode = safe_mode;
        self
    }

    /// Allows non-ASCII output to be written literally.
    #[must_use]
    pub fn with_allow_unicode(mut self, allow_unicode: bool) -> Self {
        self.allow_unicode = allow_unicode;
        self
    }

    /// Sets the output line separator.
    #[must_use]
    pub fn with_line_separator(mut self, separator: &str) -> Self {
        self.line_separator = separator.to_string();
        self
    }

    /// Sets one level of indentation (default two spaces).
    #[must_use]
    pub fn with_indent(mut self, indent: &str) -> Self {
        self.indent = indent.to_string();
        self
    }

    /// Sets the spaces between a comment marker and its text.
    #[must_use]
    pub fn with_comment_value_indent(mut self, indent: usize) -> Self {
        self.comment_value_indent = indent;
        self
    }

    /// Enables or disables warnings for unmatched document keys.
    #[must_use]
    pub fn with_log_missing_fields(mut self, log: bool) -> Self {
        self.log_missing_fields = log;
        self
    }

    /// Registers a converter under its model id.
    #[must_use]
    pub fn with_converter<C: Converter + 'static>(mut self, converter: C) -> Self {
        self.converters
            .insert(converter.model_id().to_string(), Arc::new(converter));
        self
    }

    /// Registers a placeholder replacer under an id that fields can
    /// reference.
    #[must_use]
    pub fn with_replacer<R: PlaceholderReplacer + 'static>(mut self, id: &str, replacer: R) -> Self {
        self.replacers.insert(id.to_string(), Arc::new(replacer));
        self
    }

    /// Looks up a registered converter.
    #[must_use]
    pub fn converter(&self, id: &str) -> Option<Arc<dyn Converter>> {
        self.converters.get(id).cloned()
    }

    /// Looks up a registered placeholder replacer.
    #[must_use]
    pub fn replacer(&self, id: &str) -> Option<Arc<dyn PlaceholderReplacer>> {
        self.replacers.get(id).cloned()
    }

    /// Converts a Rust member name into its document node name.
    #[must_use]
    pub fn to_node_name(&self, field_name: &str) -> String {
        self.field_name_style
            .convert(field_name, self.node_name_style)
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("field_name_style", &self.field_name_style)
            .field("node_name_style", &self.node_name_style)
            .field("safe_mode", &self.safe_mode)
            .field("allow_unicode", &self.allow_unicode)
            .field("line_separator", &self.line_separator)
            .field("indent", &self.indent)
            .field("comment_value_indent", &self.comment_value_indent)
            .field("log_missing_fields", &self.log_missing_fields)
            .field("converters", &self.converters.len())
            .field("replacers", &self.replacers.len())
            .finish()
    }
}
