//! Document writing.
//!
//! This module provides the [`Writer`], which renders [`Value`]s back
//! into document text, and [`StringStyle`], the per-field choice of how
//! string scalars are laid out.
//!
//! Written output is always readable back by the [`Reader`](crate::Reader)
//! with the same meaning: quoting heuristics protect strings that would
//! otherwise be guessed as numbers or structure, and the line breaks of
//! folded and quoted multiline styles are doubled so that read-side
//! folding restores them.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use yamlish::{write_value, Value};
//!
//! let mut map = yamlish::ValueMap::new();
//! map.insert("answer".into(), Value::from(42));
//! let text = write_value(&Value::Mapping(map)).unwrap();
//! assert_eq!(text, "answer: 42\n");
//! ```

use crate::convert;
use crate::de::parse_dynamic_number;
use crate::error::{Error, Result};
use crate::map::ValueMap;
use crate::options::Options;
use crate::schema::{CommentAt, CompositeFields, FieldDescriptor, TypeDescriptor};
use crate::value::{Key, Number, Value};

/// The output dialect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Syntax {
    Yaml,
    Json,
}

/// How a string scalar is laid out in the document.
///
/// The `Auto*` block variants pick their chomping indicator from the
/// value's trailing line breaks so the value survives a round trip; the
/// `Stripped` variants refuse values with trailing breaks instead of
/// silently losing them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StringStyle {
    /// Bare text. The value is written as-is, with no protection against
    /// text that parses as something else.
    NotQuoted,
    /// `'single quotes'` with `''` doubling.
    SingleQuoted,
    /// `"double quotes"` with escape sequences; line breaks become `\n`.
    DoubleQuoted,
    /// `"double quotes"` spanning lines; line break runs are doubled so
    /// folding on read restores them.
    DoubleQuotedMultiline,
    /// `>` block, chomping picked from the value.
    FoldedAutoClipped,
    /// `>-` block; trailing line breaks are a [`Error::StyleViolation`].
    FoldedStripped,
    /// `>` block keeping every trailing line break.
    FoldedAutoKept,
    /// `|` block, chomping picked from the value.
    LiteralAutoClipped,
    /// `|-` block; trailing line breaks are a [`Error::StyleViolation`].
    LiteralStripped,
    /// `|` block keeping every trailing line break.
    LiteralAutoKept,
}

impl StringStyle {
    fn is_block(self) -> bool {
        matches!(
            self,
            StringStyle::FoldedAutoClipped
                | StringStyle::FoldedStripped
                | StringStyle::FoldedAutoKept
                | StringStyle::LiteralAutoClipped
                | StringStyle::LiteralStripped
                | StringStyle::LiteralAutoKept
        )
    }

    fn is_folded(self) -> bool {
        matches!(
            self,
            StringStyle::FoldedAutoClipped | StringStyle::FoldedStripped | StringStyle::FoldedAutoKept
        )
    }
}

/// The document writer.
///
/// Renders one document into an owned string; retrieve it with
/// [`Writer::into_string`].
pub struct Writer<'a> {
    out: String,
    options: &'a Options,
    syntax: Syntax,
    current_indent: String,
    /// Set after a `- ` entry marker so the next entry continues on the
    /// same line.
    temp_disable_new_line: bool,
    /// Set after a node name; the next scalar gets a separating space.
    waiting_for_entry_value: bool,
}

impl<'a> Writer<'a> {
    /// Creates a writer for the default dialect.
    pub fn new(options: &'a Options) -> Self {
        Writer {
            out: String::new(),
            options,
            syntax: Syntax::Yaml,
            current_indent: String::new(),
            temp_disable_new_line: false,
            waiting_for_entry_value: false,
        }
    }

    /// Creates a writer for the JSON dialect.
    pub(crate) fn json(options: &'a Options) -> Self {
        Writer {
            syntax: Syntax::Json,
            ..Writer::new(options)
        }
    }

    /// The rendered document.
    #[must_use]
    pub fn into_string(self) -> String {
        self.out
    }

    /// Writes a whole document from a registered field list and the
    /// collected values, keyed by Rust member names.
    pub fn write_document(&mut self, fields: CompositeFields, values: &ValueMap) -> Result<()> {
        if self.syntax == Syntax::Json {
            self.out.push('{');
            self.indent_in();
            self.write_composite_entries(fields, values)?;
            self.indent_out();
            self.new_line();
            self.out.push('}');
        } else {
            self.write_composite_entries(fields, values)?;
        }
        self.out.push_str(&self.options.line_separator);
        Ok(())
    }

    /// Writes a dynamic value as a whole document.
    pub fn write_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Mapping(map) if self.syntax == Syntax::Yaml && !map.is_empty() => {
                self.write_mapping_entries(map, None, None)?;
            }
            Value::Sequence(items) if self.syntax == Syntax::Yaml && !items.is_empty() => {
                self.write_sequence_entries(items, None, None)?;
            }
            other => self.write_node(other, None, None)?,
        }
        self.out.push_str(&self.options.line_separator);
        Ok(())
    }

    // ---- layout helpers ----------------------------------------------

    fn new_line(&mut self) {
        if self.temp_disable_new_line {
            self.temp_disable_new_line = false;
            return;
        }
        if !self.out.is_empty() {
            self.out.push_str(&self.options.line_separator);
        }
        self.out.push_str(&self.current_indent);
    }

    fn indent_in(&mut self) {
        self.current_indent.push_str(&self.options.indent);
    }

    fn indent_out(&mut self) {
        let keep = self.current_indent.len() - self.options.indent.len();
        self.current_indent.truncate(keep);
    }

    fn entry_value_space(&mut self) {
        if self.waiting_for_entry_value {
            self.out.push(' ');
            self.waiting_for_entry_value = false;
        }
    }

    fn write_scalar_text(&mut self, text: &str) {
        self.entry_value_space();
        self.out.push_str(text);
    }

    fn comment_marker(&self) -> &'static str {
        match self.syntax {
            Syntax::Yaml => "#",
            Syntax::Json => "//",
        }
    }

    fn write_comment_text(&mut self, line: &str) {
        self.out.push_str(self.comment_marker());
        for _ in 0..self.options.comment_value_indent {
            self.out.push(' ');
        }
        self.out.push_str(line);
    }

    // ---- nodes -------------------------------------------------------

    fn write_node(
        &mut self,
        value: &Value,
        descriptor: Option<&TypeDescriptor>,
        style: Option<StringStyle>,
    ) -> Result<()> {
        match value {
            Value::Null => {
                self.write_scalar_text("null");
                Ok(())
            }
            Value::Bool(flag) => {
                self.write_scalar_text(if *flag { "true" } else { "false" });
                Ok(())
            }
            Value::Number(number) => {
                self.write_number(number);
                Ok(())
            }
            Value::Char(character) => self.write_string(&character.to_string(), style),
            Value::String(text) => self.write_string(text, style),
            Value::Sequence(items) => {
                let element = match descriptor {
                    Some(TypeDescriptor::Sequence(element)) => Some(element.as_ref()),
                    _ => None,
                };
                self.write_nested_sequence(items, element, style)
            }
            Value::Mapping(map) => match descriptor {
                Some(TypeDescriptor::Composite(fields)) => self.write_nested_composite(*fields, map),
                Some(TypeDescriptor::Mapping(_, value_desc)) => {
                    self.write_nested_mapping(map, Some(value_desc.as_ref()), style)
                }
                _ => self.write_nested_mapping(map, None, style),
            },
        }
    }

    fn write_number(&mut self, number: &Number) {
        let text = match number {
            Number::Integer(value) => value.to_string(),
            Number::Float(value) => {
                let mut text = value.to_string();
                // Bare integral floats keep a mark of their type so a
                // dynamic read does not turn them into integers.
                if value.is_finite() && !text.contains('.') && !text.contains(['e', 'E']) {
                    text.push_str(".0");
                }
                text
            }
        };
        self.write_scalar_text(&text);
    }

    // ---- composites --------------------------------------------------

    fn write_nested_composite(&mut self, fields: CompositeFields, values: &ValueMap) -> Result<()> {
        self.waiting_for_entry_value = false;
        if self.syntax == Syntax::Json {
            self.out.push_str(" {");
        }
        self.indent_in();
        self.write_composite_entries(fields, values)?;
        self.indent_out();
        if self.syntax == Syntax::Json {
            self.new_line();
            self.out.push('}');
        }
        Ok(())
    }

    fn write_composite_entries(&mut self, fields: CompositeFields, values: &ValueMap) -> Result<()> {
        let fields = fields();
        let present: Vec<(&FieldDescriptor, &Value)> = fields
            .iter()
            .filter_map(|field| values.get_str(field.name).map(|value| (field, value)))
            .collect();
        let last = present.len().saturating_sub(1);
        for (index, (field, value)) in present.into_iter().enumerate() {
            self.write_field_entry(field, value)?;
            if self.syntax == Syntax::Json && index < last {
                self.out.push(',');
            }
        }
        Ok(())
    }

    fn write_field_entry(&mut self, field: &FieldDescriptor, value: &Value) -> Result<()> {
        for _ in 0..field.blank_lines_before {
            self.out.push_str(&self.options.line_separator);
        }
        for comment in &field.comments {
            if comment.at == CommentAt::Prepend {
                for line in &comment.lines {
                    self.new_line();
                    self.write_comment_text(line);
                }
            }
        }

        self.new_line();
        let name = field
            .node_name
            .clone()
            .unwrap_or_else(|| self.options.to_node_name(field.name));
        self.write_key(&name);

        let chain = convert::resolve_chain(self.options, field.type_id);
        let document_value = convert::serialize_chain(&chain, value.clone())?;
        let shape = convert::document_shape(&chain, &field.kind);
        self.write_node(&document_value, Some(&shape), field.style)?;
        self.waiting_for_entry_value = false;

        for comment in &field.comments {
            match comment.at {
                CommentAt::SameLine => {
                    for line in &comment.lines {
                        self.out.push(' ');
                        self.write_comment_text(line);
                    }
                }
                CommentAt::Append => {
                    for line in &comment.lines {
                        self.new_line();
                        self.write_comment_text(line);
                    }
                }
                CommentAt::Prepend => {}
            }
        }
        Ok(())
    }

    // ---- mappings ----------------------------------------------------

    fn write_nested_mapping(
        &mut self,
        map: &ValueMap,
        value_desc: Option<&TypeDescriptor>,
        style: Option<StringStyle>,
    ) -> Result<()> {
        if map.is_empty() {
            self.write_scalar_text("{}");
            return Ok(());
        }
        if self.syntax == Syntax::Json {
            self.entry_value_space();
            self.out.push('{');
            self.indent_in();
            self.write_mapping_entries(map, value_desc, style)?;
            self.indent_out();
            self.new_line();
            self.out.push('}');
            return Ok(());
        }
        self.waiting_for_entry_value = false;
        self.indent_in();
        self.write_mapping_entries(map, value_desc, style)?;
        self.indent_out();
        Ok(())
    }

    /// Writes mapping entries at the current indent.
    fn write_mapping_entries(
        &mut self,
        map: &ValueMap,
        value_desc: Option<&TypeDescriptor>,
        style: Option<StringStyle>,
    ) -> Result<()> {
        let last = map.len().saturating_sub(1);
        for (index, (key, value)) in map.iter().enumerate() {
            self.new_line();
            self.write_key(&key.to_string());
            self.write_node(value, value_desc, style)?;
            self.waiting_for_entry_value = false;
            if self.syntax == Syntax::Json && index < last {
                self.out.push(',');
            }
        }
        Ok(())
    }

    /// Writes a node name and its `:`, quoting the name when bare text
    /// would not read back as the same key.
    fn write_key(&mut self, name: &str) {
        let quote = self.syntax == Syntax::Json
            || name.is_empty()
            || name.starts_with(['"', '\'', '#', ' '])
            || name.ends_with(' ')
            || name.contains(": ")
            || name.contains('\n');
        if quote {
            self.push_double_quoted(name, false);
        } else {
            self.out.push_str(name);
        }
        self.out.push(':');
        self.waiting_for_entry_value = true;
    }

    // ---- sequences ---------------------------------------------------

    fn write_nested_sequence(
        &mut self,
        items: &[Value],
        element: Option<&TypeDescriptor>,
        style: Option<StringStyle>,
    ) -> Result<()> {
        if items.is_empty() {
            self.write_scalar_text("[]");
            return Ok(());
        }
        if self.syntax == Syntax::Json {
            self.entry_value_space();
            self.out.push('[');
            self.indent_in();
            self.write_sequence_entries(items, element, style)?;
            self.indent_out();
            self.new_line();
            self.out.push(']');
            return Ok(());
        }
        self.waiting_for_entry_value = false;
        self.indent_in();
        self.write_sequence_entries(items, element, style)?;
        self.indent_out();
        Ok(())
    }

    /// Writes sequence entries at the current indent.
    fn write_sequence_entries(
        &mut self,
        items: &[Value],
        element: Option<&TypeDescriptor>,
        style: Option<StringStyle>,
    ) -> Result<()> {
        let last = items.len().saturating_sub(1);
        for (index, item) in items.iter().enumerate() {
            self.new_line();
            if self.syntax == Syntax::Yaml {
                self.out.push_str("- ");
                self.temp_disable_new_line = true;
            }
            self.write_node(item, element, style)?;
            self.temp_disable_new_line = false;
            if self.syntax == Syntax::Json && index < last {
                self.out.push(',');
            }
        }
        Ok(())
    }

    // ---- strings -----------------------------------------------------

    fn write_string(&mut self, text: &str, style: Option<StringStyle>) -> Result<()> {
        if self.syntax == Syntax::Json {
            self.entry_value_space();
            self.push_double_quoted(text, false);
            return Ok(());
        }
        let style = style.unwrap_or_else(|| self.default_style(text));
        if style.is_block() {
            return self.write_block_string(text, style);
        }
        self.entry_value_space();
        match style {
            StringStyle::NotQuoted => self.out.push_str(text),
            StringStyle::SingleQuoted => self.push_single_quoted(text),
            StringStyle::DoubleQuoted => self.push_double_quoted(text, false),
            StringStyle::DoubleQuotedMultiline => self.push_double_quoted(text, true),
            _ => unreachable!("block styles are handled above"),
        }
        Ok(())
    }

    /// Picks the lightest style that reads back as the same string.
    fn default_style(&self, text: &str) -> StringStyle {
        if text.is_empty() {
            return StringStyle::DoubleQuoted;
        }
        if text
            .chars()
            .any(|c| c.is_control() || (!c.is_ascii() && !self.options.allow_unicode))
        {
            return StringStyle::DoubleQuoted;
        }
        let first = text.chars().next().unwrap_or(' ');
        let needs_quotes = matches!(
            first,
            '-' | '[' | ']' | '{' | '}' | '"' | '\'' | '|' | '>' | '#' | '&' | '*' | '!' | '%'
                | '@' | '`' | ',' | ':'
        ) || text.starts_with(char::is_whitespace)
            || text.ends_with(char::is_whitespace)
            || text.ends_with(':')
            || text.contains(": ")
            || text.contains(" #")
            || parse_dynamic_number(text).is_some()
            || text.eq_ignore_ascii_case("null")
            || text.eq_ignore_ascii_case("true")
            || text.eq_ignore_ascii_case("false");
        if !needs_quotes {
            StringStyle::NotQuoted
        } else if text.contains('\'') {
            StringStyle::DoubleQuoted
        } else {
            StringStyle::SingleQuoted
        }
    }

    fn push_single_quoted(&mut self, text: &str) {
        self.out.push('\'');
        let mut breaks = 0usize;
        for character in text.chars() {
            if character == '\n' {
                breaks += 1;
                continue;
            }
            self.push_line_break_run(&mut breaks);
            if character == '\'' {
                self.out.push_str("''");
            } else {
                self.out.push(character);
            }
        }
        self.push_line_break_run(&mut breaks);
        self.out.push('\'');
    }

    fn push_double_quoted(&mut self, text: &str, multiline: bool) {
        self.out.push('"');
        let mut breaks = 0usize;
        for character in text.chars() {
            if multiline && character == '\n' {
                breaks += 1;
                continue;
            }
            self.push_line_break_run(&mut breaks);
            self.push_escaped(character);
        }
        self.push_line_break_run(&mut breaks);
        self.out.push('"');
    }

    /// Writes a run of n line breaks as n + 1 so read-side folding
    /// restores n.
    fn push_line_break_run(&mut self, breaks: &mut usize) {
        if *breaks == 0 {
            return;
        }
        for _ in 0..*breaks + 1 {
            self.out.push_str(&self.options.line_separator);
        }
        *breaks = 0;
    }

    fn push_escaped(&mut self, character: char) {
        match character {
            '\\' => self.out.push_str("\\\\"),
            '"' => self.out.push_str("\\\""),
            '\0' => self.out.push_str("\\0"),
            '\u{7}' => self.out.push_str("\\a"),
            '\u{8}' => self.out.push_str("\\b"),
            '\t' => self.out.push_str("\\t"),
            '\n' => self.out.push_str("\\n"),
            '\u{B}' => self.out.push_str("\\v"),
            '\u{C}' => self.out.push_str("\\f"),
            '\r' => self.out.push_str("\\r"),
            '\u{1B}' => self.out.push_str("\\e"),
            '\u{85}' => self.out.push_str("\\N"),
            '\u{A0}' => self.out.push_str("\\_"),
            '\u{2028}' => self.out.push_str("\\L"),
            '\u{2029}' => self.out.push_str("\\P"),
            c if (c as u32) < 0x20 || c == '\u{7F}' => {
                self.out.push_str(&format!("\\x{:02X}", c as u32));
            }
            c if !c.is_ascii() && !self.options.allow_unicode => {
                let code = c as u32;
                if code <= 0xFF {
                    self.out.push_str(&format!("\\x{code:02X}"));
                } else if code <= 0xFFFF {
                    self.out.push_str(&format!("\\u{code:04X}"));
                } else {
                    self.out.push_str(&format!("\\U{code:08X}"));
                }
            }
            c => self.out.push(c),
        }
    }

    // ---- block strings -----------------------------------------------

    fn write_block_string(&mut self, text: &str, style: StringStyle) -> Result<()> {
        let trailing = text.len() - text.trim_end_matches('\n').len();
        let body = &text[..text.len() - trailing];
        if body.is_empty() {
            // A block scalar cannot carry an empty body.
            self.entry_value_space();
            self.push_double_quoted(text, false);
            return Ok(());
        }
        if matches!(style, StringStyle::FoldedStripped | StringStyle::LiteralStripped)
            && trailing > 0
        {
            return Err(Error::StyleViolation(format!(
                "a stripped block scalar would lose {trailing} trailing line break(s)"
            )));
        }

        let chomp = match style {
            StringStyle::FoldedStripped | StringStyle::LiteralStripped => "-",
            StringStyle::FoldedAutoKept | StringStyle::LiteralAutoKept => {
                if trailing == 0 {
                    "-"
                } else {
                    "+"
                }
            }
            _ => match trailing {
                0 => "-",
                1 => "",
                _ => "+",
            },
        };

        self.entry_value_space();
        self.out.push(if style.is_folded() { '>' } else { '|' });
        self.out.push_str(chomp);

        let folded = style.is_folded();
        let mut breaks = 0usize;
        let mut started = false;
        for character in body.chars() {
            if character == '\n' {
                breaks += 1;
                continue;
            }
            if breaks > 0 || !started {
                let count = if !started {
                    1
                } else if folded {
                    breaks + 1
                } else {
                    breaks
                };
                for _ in 0..count {
                    self.out.push_str(&self.options.line_separator);
                }
                self.out.push_str(&self.current_indent);
                self.out.push_str(&self.options.indent);
                breaks = 0;
                started = true;
            }
            self.out.push(character);
        }
        // Breaks past the first trailing one become blank lines; the
        // entry separator written after this node supplies the first.
        for _ in 1..trailing.max(1) {
            self.out.push_str(&self.options.line_separator);
        }
        Ok(())
    }
}
