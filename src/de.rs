//! Document reading.
//!
//! This module provides the [`Reader`], a recursive-descent parser that
//! decodes a YAML-flavored configuration document into [`Value`]s, driven
//! by the [`TypeDescriptor`] of whatever it is asked to read.
//!
//! ## Overview
//!
//! - **Type-directed parsing**: the caller's descriptor decides whether a
//!   scalar, sequence, mapping, or registered composite is expected; with
//!   [`TypeDescriptor::Dynamic`] the shape is guessed from the text.
//! - **Single pass with pushback**: one character of pushback plus a
//!   bounded speculative recording cover every ambiguity in the dialect.
//! - **Indentation scoping**: block structures are delimited purely by
//!   the column of their first entry.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use yamlish::{parse_value, Value};
//!
//! let value = parse_value("answer: 42").unwrap();
//! assert_eq!(value["answer"], Value::from(42));
//! ```

use std::collections::HashMap;

use crate::convert;
use crate::error::{Error, Result};
use crate::map::ValueMap;
use crate::options::Options;
use crate::schema::{CompositeFields, ScalarKind, TypeDescriptor};
use crate::stream::{CharStream, EOF_CHAR, NEW_LINE};
use crate::value::{Key, Value};

/// Which comment marker the dialect uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CommentSyntax {
    /// `#` to end of line.
    Hash,
    /// `//` to end of line.
    SlashSlash,
}

/// How a block scalar treats its trailing line breaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Chomp {
    /// Keep one trailing line break when the body has any.
    Clip,
    /// Drop all trailing line breaks.
    Strip,
    /// Keep every trailing line break.
    Keep,
}

/// The document reader.
///
/// Decodes one document from a string. Created via [`Reader::new`]; the
/// high-level entry points in the crate root construct one per call.
pub struct Reader<'a> {
    stream: CharStream<'a>,
    options: &'a Options,
    comment_syntax: CommentSyntax,
    /// Column just past the current node's first name character; block
    /// scalar bodies must indent beyond it.
    node_indent: usize,
    /// Set when a sequence entry hands its first character to a mapping
    /// reader that would otherwise expect a line break.
    temp_restore_new_line: bool,
    start_of_file: bool,
    /// Depth of `[`/`{` collections; `,`, `]` and `}` only terminate
    /// plain scalars inside one.
    flow_depth: usize,
    backup_preferred: bool,
}

impl<'a> Reader<'a> {
    /// Creates a reader over a document in the default dialect.
    pub fn new(input: &'a str, options: &'a Options) -> Self {
        Reader {
            stream: CharStream::new(input),
            options,
            comment_syntax: CommentSyntax::Hash,
            node_indent: 0,
            temp_restore_new_line: false,
            start_of_file: true,
            flow_depth: 0,
            backup_preferred: false,
        }
    }

    /// Creates a reader over a JSON document.
    pub(crate) fn json(input: &'a str, options: &'a Options) -> Self {
        Reader {
            comment_syntax: CommentSyntax::SlashSlash,
            ..Reader::new(input, options)
        }
    }

    /// `true` once a document key matched none of the registered fields,
    /// suggesting the file predates the current schema.
    #[must_use]
    pub fn backup_preferred(&self) -> bool {
        self.backup_preferred
    }

    /// Reads a whole document against a registered field list.
    ///
    /// The returned mapping is keyed by the Rust member names, not the
    /// document node names.
    pub fn read_document(&mut self, fields: CompositeFields) -> Result<ValueMap> {
        match self.read_composite(fields)? {
            Value::Mapping(map) => Ok(map),
            other => Err(Error::type_mismatch("mapping", other.kind_name())),
        }
    }

    /// Reads one value of the described shape.
    pub fn read_value(&mut self, descriptor: &TypeDescriptor) -> Result<Value> {
        let restore_new_line = std::mem::take(&mut self.temp_restore_new_line);
        match descriptor {
            TypeDescriptor::Dynamic => {
                let mut marker = self.read_raw_skip_empty()?;
                while self.skip_comments(marker, false)? {
                    marker = self.read_raw_skip_empty_and_new_lines()?;
                }
                self.read_dynamic_by_marker(marker)
            }
            TypeDescriptor::Scalar(kind) => {
                let marker = self.read_raw_skip_empty()?;
                if self.null_skipped_by_marker(marker)? {
                    return Ok(Value::Null);
                }
                self.read_scalar_by_marker(kind, marker)
            }
            TypeDescriptor::Sequence(element) => {
                let marker = self.read_raw_skip_empty()?;
                self.read_sequence_by_marker(element, marker)
            }
            TypeDescriptor::Mapping(key, value) => {
                let restore = restore_new_line || self.start_of_file;
                let marker = if self.start_of_file {
                    self.read_raw_skip_empty_and_new_lines()?
                } else {
                    self.read_raw_skip_empty()?
                };
                self.read_mapping_by_marker(key, value, marker, restore)
            }
            TypeDescriptor::Composite(fields) => self.read_composite(*fields),
        }
    }

    /// Consumes one value of the described shape without keeping it.
    pub fn skip_value(&mut self, descriptor: &TypeDescriptor) -> Result<()> {
        match descriptor {
            // Shapes with registered fields are skipped by guess so that
            // their unknown keys do not trip the schema bookkeeping.
            TypeDescriptor::Composite(_) | TypeDescriptor::Dynamic => self.skip_dynamic(),
            // Malformed scalar text under a skipped node is not an error.
            TypeDescriptor::Scalar(_) => {
                let marker = self.read_raw_skip_empty()?;
                if self.null_skipped_by_marker(marker)? {
                    return Ok(());
                }
                self.read_string_from_marker(marker, false).map(|_| ())
            }
            other => self.read_value(other).map(|_| ()),
        }
    }

    fn skip_dynamic(&mut self) -> Result<()> {
        self.read_value(&TypeDescriptor::Dynamic).map(|_| ())
    }

    // ---- low level ---------------------------------------------------

    fn read_raw(&mut self) -> Result<char> {
        self.start_of_file = false;
        self.stream.read_raw()
    }

    fn is_end_marker(&self, character: char) -> bool {
        character == NEW_LINE || character == EOF_CHAR
    }

    /// Reads past spaces and tabs, stopping at line breaks.
    fn read_raw_skip_empty(&mut self) -> Result<char> {
        loop {
            let character = self.read_raw()?;
            if character == NEW_LINE || character == EOF_CHAR || !character.is_whitespace() {
                return Ok(character);
            }
        }
    }

    /// Reads past all whitespace, line breaks included.
    fn read_raw_skip_empty_and_new_lines(&mut self) -> Result<char> {
        loop {
            let character = self.read_raw()?;
            if !character.is_whitespace() {
                return Ok(character);
            }
        }
    }

    /// Consumes the next non-whitespace character when it matches,
    /// otherwise leaves it in the pushback slot.
    fn skip_char(&mut self, expected: char) -> Result<bool> {
        let marker = self.read_raw_skip_empty_and_new_lines()?;
        if marker == expected {
            return Ok(true);
        }
        self.stream.push_back();
        Ok(false)
    }

    /// When `marker` opens a comment, consumes it through the end of the
    /// line, leaves the next content character in the pushback slot, and
    /// returns `true`. Otherwise pushes `marker` back when `reuse` is set.
    fn skip_comments(&mut self, marker: char, reuse: bool) -> Result<bool> {
        let is_comment = match self.comment_syntax {
            CommentSyntax::Hash => marker == '#',
            CommentSyntax::SlashSlash => {
                if marker == '/' {
                    let next = self.read_raw()?;
                    if next == '/' {
                        true
                    } else {
                        self.stream.unread(next);
                        false
                    }
                } else {
                    false
                }
            }
        };
        if !is_comment {
            if reuse {
                self.stream.push_back();
            }
            return Ok(false);
        }

        loop {
            let character = self.read_raw()?;
            if self.is_end_marker(character) {
                break;
            }
        }
        self.read_raw_skip_empty_and_new_lines()?;
        self.stream.push_back();
        Ok(true)
    }

    fn indent_offset(&self) -> isize {
        self.stream.current_indent() as isize - self.node_indent as isize
    }

    // ---- node names --------------------------------------------------

    /// Reads the next node name, or `None` at the end of input.
    fn read_node_name(&mut self) -> Result<Option<String>> {
        let marker = self.read_raw_skip_empty_and_new_lines()?;
        if marker == EOF_CHAR {
            return Ok(None);
        }
        self.read_node_name_by_marker(marker)
    }

    fn read_node_name_by_marker(&mut self, mut marker: char) -> Result<Option<String>> {
        self.node_indent = self.stream.current_indent();
        while self.skip_comments(marker, false)? {
            marker = self.read_raw_skip_empty_and_new_lines()?;
            self.node_indent = self.stream.current_indent();
        }
        if marker == EOF_CHAR {
            return Ok(None);
        }
        self.read_string_from_marker(marker, true).map(Some)
    }

    // ---- strings -----------------------------------------------------

    /// Reads a scalar starting at `marker`. With `node_name` set the
    /// scalar is a key: plain text runs to a `:` followed by whitespace,
    /// quoted text must be followed by one, and line breaks are fatal.
    fn read_string_from_marker(&mut self, marker: char, node_name: bool) -> Result<String> {
        match marker {
            '"' => {
                let result = self.read_double_quoted()?;
                if node_name {
                    self.expect_name_colon()?;
                }
                Ok(result)
            }
            '\'' => {
                let result = self.read_single_quoted()?;
                if node_name {
                    self.expect_name_colon()?;
                }
                Ok(result)
            }
            '|' | '>' if !node_name => self.read_block_scalar_from_marker(marker),
            _ if node_name => self.read_plain_node_name(marker),
            _ => self.read_plain_scalar(marker),
        }
    }

    fn expect_name_colon(&mut self) -> Result<()> {
        let marker = self.read_raw_skip_empty()?;
        if marker != ':' {
            return Err(Error::unexpected_marker(marker, "a quoted node name"));
        }
        Ok(())
    }

    fn read_double_quoted(&mut self) -> Result<String> {
        let mut result = String::new();
        let mut new_line_count = 0usize;
        loop {
            let marker = self.read_raw()?;
            if marker == '"' {
                return Ok(result);
            }
            if marker == EOF_CHAR {
                return Err(Error::UnexpectedEof("a double-quoted scalar"));
            }
            if marker == NEW_LINE {
                new_line_count += 1;
                self.read_raw_skip_empty()?;
                self.stream.push_back();
                continue;
            }
            flush_folded_new_lines(&mut result, &mut new_line_count);
            if marker == '\\' {
                result.push(self.read_escape_char()?);
            } else {
                result.push(marker);
            }
        }
    }

    fn read_single_quoted(&mut self) -> Result<String> {
        let mut result = String::new();
        let mut new_line_count = 0usize;
        loop {
            let marker = self.read_raw()?;
            if marker == EOF_CHAR {
                return Err(Error::UnexpectedEof("a single-quoted scalar"));
            }
            if marker == '\'' {
                let next = self.read_raw()?;
                if next != '\'' {
                    // The closing quote; the follower belongs to whatever
                    // comes next.
                    self.stream.push_back();
                    return Ok(result);
                }
                flush_folded_new_lines(&mut result, &mut new_line_count);
                result.push('\'');
                continue;
            }
            if marker == NEW_LINE {
                new_line_count += 1;
                self.read_raw_skip_empty()?;
                self.stream.push_back();
                continue;
            }
            flush_folded_new_lines(&mut result, &mut new_line_count);
            result.push(marker);
        }
    }

    fn read_plain_node_name(&mut self, mut marker: char) -> Result<String> {
        let mut result = String::new();
        loop {
            if marker == EOF_CHAR {
                return Err(Error::UnexpectedEof("a node name"));
            }
            if marker == NEW_LINE {
                return Err(Error::NewLineInNodeName(result));
            }
            if marker == ':' {
                let next = self.read_raw()?;
                if next.is_whitespace() || next == EOF_CHAR {
                    // The separator stays put for the value reader, which
                    // needs to see a line break when the value is a block.
                    self.stream.push_back();
                    return Ok(result);
                }
                // A colon without trailing whitespace is part of the name.
                result.push(':');
                marker = next;
                continue;
            }
            result.push(marker);
            marker = self.read_raw()?;
        }
    }

    fn read_plain_scalar(&mut self, mut marker: char) -> Result<String> {
        let mut result = String::new();
        let mut spaces = String::new();
        loop {
            if self.is_end_marker(marker) {
                return Ok(result);
            }
            if self.flow_depth > 0 {
                if marker == ',' {
                    return Ok(result);
                }
                if marker == ']' || marker == '}' {
                    self.stream.push_back();
                    return Ok(result);
                }
            }
            if marker.is_whitespace() {
                let probe = self.read_raw()?;
                if self.skip_comments(probe, true)? {
                    // A comment ends the token; buffered spaces are not
                    // part of the value.
                    return Ok(result);
                }
                spaces.push(marker);
                marker = self.read_raw()?;
                continue;
            }
            if !spaces.is_empty() {
                result.push_str(&spaces);
                spaces.clear();
            }
            result.push(marker);
            marker = self.read_raw()?;
        }
    }

    fn read_escape_char(&mut self) -> Result<char> {
        let marker = self.read_raw()?;
        Ok(match marker {
            '0' => '\0',
            'a' => '\u{7}',
            'b' => '\u{8}',
            't' => '\t',
            'n' => '\n',
            'v' => '\u{B}',
            'f' => '\u{C}',
            'r' => '\r',
            'e' => '\u{1B}',
            ' ' => ' ',
            '"' => '"',
            '\\' => '\\',
            'N' => '\u{85}',
            '_' => '\u{A0}',
            'L' => '\u{2028}',
            'P' => '\u{2029}',
            'x' => self.read_hex_char(2)?,
            'u' => self.read_hex_char(4)?,
            'U' => self.read_hex_char(8)?,
            other => return Err(Error::InvalidEscape(other)),
        })
    }

    fn read_hex_char(&mut self, digits: usize) -> Result<char> {
        let mut text = String::with_capacity(digits);
        for _ in 0..digits {
            let character = self.read_raw()?;
            if self.is_end_marker(character) {
                return Err(Error::InvalidHexEscape(text));
            }
            text.push(character);
        }
        let code = u32::from_str_radix(&text, 16).map_err(|_| Error::InvalidHexEscape(text.clone()))?;
        char::from_u32(code).ok_or(Error::InvalidHexEscape(text))
    }

    // ---- block scalars -----------------------------------------------

    fn read_block_scalar_from_marker(&mut self, style_marker: char) -> Result<String> {
        let literal = style_marker == '|';
        let mut chomp = Chomp::Clip;
        let mut fixed = 0usize;
        loop {
            let character = self.read_raw()?;
            match character {
                '+' => chomp = Chomp::Keep,
                '-' => chomp = Chomp::Strip,
                '1'..='9' => fixed = character as usize - '0' as usize,
                NEW_LINE => break,
                EOF_CHAR => return Ok(String::new()),
                c if c.is_whitespace() => {}
                other => return Err(Error::unexpected_marker(other, "a block scalar header")),
            }
        }

        let mut result = String::new();
        let mut pending_new_lines = 0usize;
        let mut started = false;
        let mut marker = self.read_raw_skip_empty()?;
        loop {
            if marker == EOF_CHAR {
                break;
            }
            if marker == NEW_LINE {
                // Blank lines never end the block, whatever their indent.
                pending_new_lines += 1;
                marker = self.read_raw_skip_empty()?;
                continue;
            }
            let offset = self.indent_offset();
            if offset <= 0 {
                if !started {
                    return Err(Error::BlockScalarNotIndented);
                }
                break;
            }
            let offset = offset as usize;
            if fixed == 0 {
                fixed = offset;
            } else if !started && offset < fixed {
                return Err(Error::BlockScalarIndent {
                    indicator: fixed,
                    offset,
                });
            }
            if offset < fixed {
                break;
            }

            if started {
                if literal {
                    for _ in 0..pending_new_lines {
                        result.push(NEW_LINE);
                    }
                } else if pending_new_lines == 1 {
                    result.push(' ');
                } else {
                    for _ in 1..pending_new_lines {
                        result.push(NEW_LINE);
                    }
                }
            }
            pending_new_lines = 0;
            started = true;
            // Indentation past the fixed level is content.
            for _ in fixed..offset {
                result.push(' ');
            }
            result.push(marker);
            loop {
                marker = self.read_raw()?;
                if self.is_end_marker(marker) {
                    break;
                }
                result.push(marker);
            }
        }
        // A dedented character opens the next node.
        self.stream.push_back();

        let trailing = match chomp {
            Chomp::Strip => 0,
            Chomp::Clip => pending_new_lines.min(1),
            Chomp::Keep => pending_new_lines,
        };
        for _ in 0..trailing {
            result.push(NEW_LINE);
        }
        Ok(result)
    }

    // ---- null --------------------------------------------------------

    /// Consumes a `null` literal when one sits at `marker`, rewinding the
    /// stream when it does not.
    fn null_skipped_by_marker(&mut self, marker: char) -> Result<bool> {
        if marker != 'n' {
            return Ok(false);
        }
        self.stream.enable_seek();
        let matched =
            self.read_raw()? == 'u' && self.read_raw()? == 'l' && self.read_raw()? == 'l';
        if !matched {
            self.stream.rewind_seek();
            return Ok(false);
        }
        let boundary = self.read_raw()?;
        let bounded = boundary == EOF_CHAR
            || boundary.is_whitespace()
            || (self.flow_depth > 0 && matches!(boundary, ',' | ']' | '}'));
        if !bounded {
            self.stream.rewind_seek();
            return Ok(false);
        }
        self.stream.discard_seek();
        if matches!(boundary, ',' | ']' | '}') {
            self.stream.push_back();
        }
        Ok(true)
    }

    // ---- typed scalars -----------------------------------------------

    fn read_scalar_by_marker(&mut self, kind: &ScalarKind, marker: char) -> Result<Value> {
        match kind {
            ScalarKind::String => Ok(Value::String(self.read_string_from_marker(marker, false)?)),
            ScalarKind::Char => {
                let text = self.read_string_from_marker(marker, false)?;
                match text.chars().next() {
                    Some(character) => Ok(Value::Char(character)),
                    None => Err(Error::type_mismatch("char", "empty text")),
                }
            }
            ScalarKind::Bool => {
                let text = self.read_string_from_marker(marker, false)?;
                Ok(Value::Bool(text.eq_ignore_ascii_case("true")))
            }
            ScalarKind::Integer => {
                let text = self.read_string_from_marker(marker, false)?;
                self.parse_integer(&text)
            }
            ScalarKind::Float => {
                let text = self.read_string_from_marker(marker, false)?;
                self.parse_float(&text)
            }
            ScalarKind::Enum(constants) => {
                let text = self.read_string_from_marker(marker, false)?;
                resolve_enum_constant(&text, constants)
            }
        }
    }

    fn parse_integer(&self, text: &str) -> Result<Value> {
        match text.parse::<i64>() {
            Ok(value) => Ok(Value::from(value)),
            Err(_) if self.options.safe_mode => {
                log::warn!("cannot parse {text:?} as an integer, using 0");
                Ok(Value::from(0))
            }
            Err(_) => Err(Error::number_format("integer", text)),
        }
    }

    fn parse_float(&self, text: &str) -> Result<Value> {
        match text.parse::<f64>() {
            Ok(value) => Ok(Value::from(value)),
            Err(_) if self.options.safe_mode => {
                log::warn!("cannot parse {text:?} as a float, using 0");
                Ok(Value::from(0.0))
            }
            Err(_) => Err(Error::number_format("float", text)),
        }
    }

    // ---- dynamic -----------------------------------------------------

    /// Guesses the shape of the next value from its first characters.
    fn read_dynamic_by_marker(&mut self, marker: char) -> Result<Value> {
        match marker {
            EOF_CHAR => Ok(Value::Null),
            NEW_LINE => {
                let next = self.read_raw_skip_empty_and_new_lines()?;
                self.stream.push_back();
                if next == '-' {
                    self.read_sequence_by_marker(&TypeDescriptor::Dynamic, NEW_LINE)
                } else {
                    self.read_mapping_by_marker(
                        &TypeDescriptor::Dynamic,
                        &TypeDescriptor::Dynamic,
                        NEW_LINE,
                        false,
                    )
                }
            }
            '[' => self.read_sequence_by_marker(&TypeDescriptor::Dynamic, marker),
            '{' => self.read_mapping_by_marker(
                &TypeDescriptor::Dynamic,
                &TypeDescriptor::Dynamic,
                marker,
                false,
            ),
            '"' | '\'' | '|' | '>' => {
                Ok(Value::String(self.read_string_from_marker(marker, false)?))
            }
            '-' => {
                // Either a negative number or a block sequence entry.
                self.stream.enable_seek_from('-');
                self.stream.push_back();
                let first = self.read_raw_skip_empty()?;
                let text = self.read_string_from_marker(first, false)?;
                match parse_dynamic_number(&text) {
                    Some(number) => {
                        self.stream.discard_seek();
                        Ok(number)
                    }
                    None => {
                        self.stream.rewind_seek();
                        self.read_sequence_by_marker(&TypeDescriptor::Dynamic, NEW_LINE)
                    }
                }
            }
            _ => {
                if self.null_skipped_by_marker(marker)? {
                    return Ok(Value::Null);
                }
                self.stream.enable_seek_from(marker);
                let text = self.read_string_from_marker(marker, false)?;
                if text.ends_with(':') || text.contains(": ") {
                    // The token was really a node name; re-read as a mapping.
                    self.stream.rewind_seek();
                    return self.read_mapping_by_marker(
                        &TypeDescriptor::Dynamic,
                        &TypeDescriptor::Dynamic,
                        NEW_LINE,
                        false,
                    );
                }
                self.stream.discard_seek();
                match parse_dynamic_number(&text) {
                    Some(number) => Ok(number),
                    None => Ok(Value::String(text)),
                }
            }
        }
    }

    // ---- sequences ---------------------------------------------------

    fn read_sequence_by_marker(
        &mut self,
        element: &TypeDescriptor,
        marker: char,
    ) -> Result<Value> {
        match marker {
            '[' => {
                self.flow_depth += 1;
                let mut items = Vec::new();
                let mut next = self.read_raw_skip_empty_and_new_lines()?;
                while next != ']' {
                    if next == EOF_CHAR {
                        return Err(Error::UnexpectedEof("a flow sequence"));
                    }
                    self.stream.push_back();
                    items.push(self.read_value(element)?);
                    next = self.read_raw_skip_empty_and_new_lines()?;
                    if next == ',' {
                        next = self.read_raw_skip_empty_and_new_lines()?;
                    }
                }
                self.flow_depth -= 1;
                Ok(Value::Sequence(items))
            }
            NEW_LINE => {
                let mut next = self.read_raw_skip_empty_and_new_lines()?;
                while self.skip_comments(next, false)? {
                    next = self.read_raw_skip_empty_and_new_lines()?;
                }
                if next != '-' {
                    return Err(Error::unexpected_marker(next, "a block sequence"));
                }
                self.read_block_sequence(element)
            }
            '-' => self.read_block_sequence(element),
            other => {
                if self.null_skipped_by_marker(other)? {
                    return Ok(Value::Null);
                }
                Err(Error::unexpected_marker(other, "a sequence"))
            }
        }
    }

    /// Reads block sequence entries; the first `-` is already consumed.
    fn read_block_sequence(&mut self, element: &TypeDescriptor) -> Result<Value> {
        let correct_indent = self.stream.current_indent();
        let mut items = Vec::new();
        loop {
            self.node_indent = correct_indent;
            self.temp_restore_new_line = true;
            items.push(self.read_value(element)?);
            let next = self.read_raw_skip_empty_and_new_lines()?;
            if next != '-' || correct_indent != self.stream.current_indent() {
                self.stream.push_back();
                return Ok(Value::Sequence(items));
            }
        }
    }

    // ---- mappings ----------------------------------------------------

    /// Reads a mapping; with `restore_new_line` set, `marker` is the first
    /// character of the first key rather than a structural marker.
    fn read_mapping_by_marker(
        &mut self,
        key_desc: &TypeDescriptor,
        value_desc: &TypeDescriptor,
        mut marker: char,
        restore_new_line: bool,
    ) -> Result<Value> {
        let mut next;
        if restore_new_line && !matches!(marker, '{' | NEW_LINE | EOF_CHAR) {
            next = marker;
            marker = NEW_LINE;
        } else {
            match marker {
                '{' | NEW_LINE => next = self.read_raw_skip_empty_and_new_lines()?,
                EOF_CHAR => return Ok(Value::Mapping(ValueMap::new())),
                other => {
                    if self.null_skipped_by_marker(other)? {
                        return Ok(Value::Null);
                    }
                    return Err(Error::unexpected_marker(other, "a mapping"));
                }
            }
        }

        let mut map = ValueMap::new();
        if marker == '{' {
            self.flow_depth += 1;
            while next != '}' {
                if next == EOF_CHAR {
                    return Err(Error::UnexpectedEof("a flow mapping"));
                }
                let Some(name) = self.read_node_name_by_marker(next)? else {
                    return Err(Error::UnexpectedEof("a flow mapping"));
                };
                let (key, value) = self.read_mapping_entry(&name, key_desc, value_desc)?;
                map.insert(key, value);
                next = self.read_raw_skip_empty_and_new_lines()?;
                if next == ',' {
                    next = self.read_raw_skip_empty_and_new_lines()?;
                }
            }
            self.flow_depth -= 1;
            return Ok(Value::Mapping(map));
        }

        if next == EOF_CHAR {
            return Ok(Value::Mapping(map));
        }
        while self.skip_comments(next, false)? {
            next = self.read_raw_skip_empty_and_new_lines()?;
            if next == EOF_CHAR {
                return Ok(Value::Mapping(map));
            }
        }
        let correct_indent = self.stream.current_indent();
        loop {
            let Some(name) = self.read_node_name_by_marker(next)? else {
                break;
            };
            let (key, value) = self.read_mapping_entry(&name, key_desc, value_desc)?;
            map.insert(key, value);
            next = self.read_raw_skip_empty_and_new_lines()?;
            if next == EOF_CHAR {
                break;
            }
            while self.skip_comments(next, false)? {
                next = self.read_raw_skip_empty_and_new_lines()?;
            }
            if next == EOF_CHAR || correct_indent != self.stream.current_indent() {
                self.stream.push_back();
                break;
            }
        }
        Ok(Value::Mapping(map))
    }

    fn read_mapping_entry(
        &mut self,
        name: &str,
        key_desc: &TypeDescriptor,
        value_desc: &TypeDescriptor,
    ) -> Result<(Key, Value)> {
        let key = parse_key(name, key_desc)?;
        let value = self.read_value(value_desc)?;
        Ok((key, value))
    }

    // ---- composites --------------------------------------------------

    /// Reads a mapping against a registered field list, matching document
    /// keys to fields by node name and skipping keys that match nothing.
    fn read_composite(&mut self, fields_fn: CompositeFields) -> Result<Value> {
        let braced = self.skip_char('{')?;
        if braced {
            self.flow_depth += 1;
        }
        let fields = fields_fn();
        let mut lookup: HashMap<String, usize> = HashMap::new();
        for (index, field) in fields.iter().enumerate() {
            let node_name = field
                .node_name
                .clone()
                .unwrap_or_else(|| self.options.to_node_name(field.name));
            lookup.insert(node_name, index);
            for fallback in &field.fallback_keys {
                lookup.entry(fallback.clone()).or_insert(index);
            }
        }

        let mut result = ValueMap::with_capacity(fields.len());
        if !braced {
            // Leading comment lines may sit at any column; the expected
            // entry indent comes from the first key.
            let mut next = self.read_raw_skip_empty_and_new_lines()?;
            while self.skip_comments(next, false)? {
                next = self.read_raw_skip_empty_and_new_lines()?;
            }
            self.stream.push_back();
        }
        let correct_indent = self.stream.current_indent();
        loop {
            if self.skip_char('}')? {
                if braced {
                    self.flow_depth -= 1;
                }
                return Ok(Value::Mapping(result));
            }
            if !braced && correct_indent != self.stream.current_indent() {
                // Tolerate comment lines at a foreign indent; anything
                // else ends this composite.
                let character = self.read_raw()?;
                if self.skip_comments(character, true)? {
                    continue;
                }
                break;
            }
            let Some(node_name) = self.read_node_name()? else {
                break;
            };
            match lookup.get(node_name.as_str()).copied() {
                None => {
                    if self.options.log_missing_fields {
                        log::warn!("skipping node {node_name:?}: no field matches it");
                    }
                    self.backup_preferred = true;
                    self.skip_dynamic()?;
                }
                Some(index) => {
                    let field = &fields[index];
                    let chain = convert::resolve_chain(self.options, field.type_id);
                    let shape = convert::document_shape(&chain, &field.kind);
                    if field.writable {
                        let decoded = self.read_value(&shape)?;
                        let value = convert::deserialize_chain(&chain, decoded)?;
                        result.insert(Key::String(field.name.to_string()), value);
                    } else {
                        self.skip_value(&shape)?;
                    }
                }
            }
            self.skip_char(',')?;
        }
        if braced {
            return Err(Error::UnexpectedEof("a braced mapping"));
        }
        Ok(Value::Mapping(result))
    }
}

/// Folds line breaks inside quoted scalars: one break joins with a space,
/// a run of n breaks keeps n - 1 of them.
fn flush_folded_new_lines(result: &mut String, count: &mut usize) {
    if *count == 1 {
        result.push(' ');
    } else {
        for _ in 1..*count {
            result.push(NEW_LINE);
        }
    }
    *count = 0;
}

/// Integers win over floats; float text must carry a digit so words like
/// `inf` stay strings.
pub(crate) fn parse_dynamic_number(text: &str) -> Option<Value> {
    if let Ok(value) = text.parse::<i64>() {
        return Some(Value::from(value));
    }
    if text.chars().any(|c| c.is_ascii_digit()) {
        if let Ok(value) = text.parse::<f64>() {
            return Some(Value::from(value));
        }
    }
    None
}

fn resolve_enum_constant(text: &str, constants: &'static [&'static str]) -> Result<Value> {
    constants
        .iter()
        .find(|constant| **constant == text || constant.eq_ignore_ascii_case(text))
        .map(|constant| Value::String((*constant).to_string()))
        .ok_or_else(|| Error::unknown_enum_value(text, constants))
}

fn parse_key(name: &str, descriptor: &TypeDescriptor) -> Result<Key> {
    match descriptor {
        TypeDescriptor::Dynamic => {
            if let Ok(value) = name.parse::<i64>() {
                return Ok(Key::Integer(value));
            }
            if name.chars().any(|c| c.is_ascii_digit()) {
                if let Ok(value) = name.parse::<f64>() {
                    return Ok(Key::Float(value));
                }
            }
            Ok(Key::String(name.to_string()))
        }
        TypeDescriptor::Scalar(kind) => match kind {
            ScalarKind::String => Ok(Key::String(name.to_string())),
            ScalarKind::Char => name
                .chars()
                .next()
                .map(Key::Char)
                .ok_or_else(|| Error::type_mismatch("char", "empty text")),
            ScalarKind::Bool => Ok(Key::Bool(name.eq_ignore_ascii_case("true"))),
            ScalarKind::Integer => name
                .parse::<i64>()
                .map(Key::Integer)
                .map_err(|_| Error::number_format("integer", name)),
            ScalarKind::Float => name
                .parse::<f64>()
                .map(Key::Float)
                .map_err(|_| Error::number_format("float", name)),
            ScalarKind::Enum(constants) => match resolve_enum_constant(name, constants)? {
                Value::String(constant) => Ok(Key::String(constant)),
                _ => unreachable!(),
            },
        },
        TypeDescriptor::Sequence(_) => Err(Error::UnsupportedKey("a sequence")),
        TypeDescriptor::Mapping(_, _) => Err(Error::UnsupportedKey("a mapping")),
        TypeDescriptor::Composite(_) => Err(Error::UnsupportedKey("a composite")),
    }
}
