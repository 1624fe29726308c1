//! Character-level input stream with pushback, speculative reads, and
//! indentation bookkeeping.
//!
//! [`CharStream`] hands the reader one normalized character at a time:
//!
//! - `\r`, `\r\n` and `\n` all normalize to `'\n'`. The convention is
//!   detected from the first line break; a later break in a different
//!   convention is a fatal [`Error::MixedLineEndings`].
//! - End of input is the repeatable sentinel [`EOF_CHAR`] (`'\0'`), so
//!   scanning loops need no separate EOF branch.
//! - [`CharStream::push_back`] replays the last character once.
//! - A seek records everything read while enabled into a FIFO;
//!   [`CharStream::rewind_seek`] replays the recording and restores the
//!   indentation counters, [`CharStream::discard_seek`] commits the reads.
//!
//! Indentation bookkeeping: every consumed character increments
//! `current_indent`; a line break records `new_line_indent` as
//! `current_indent + 1` and resets `current_indent` to zero. Characters
//! replayed through the pushback slot do not increment.
//!
//! One stream is created per document and is deliberately not `Sync`;
//! reads are plain method calls with no locking.

use std::collections::VecDeque;
use std::str::Chars;

use crate::error::{Error, Result};

/// Repeatable end-of-input sentinel.
pub(crate) const EOF_CHAR: char = '\0';
/// The normalized line break.
pub(crate) const NEW_LINE: char = '\n';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LineEnding {
    Unknown,
    Cr,
    CrLf,
    Lf,
}

pub(crate) struct CharStream<'a> {
    chars: Chars<'a>,
    /// Raw characters queued for replay ahead of the underlying input.
    pending: VecDeque<char>,
    /// Recording of raw characters consumed while a seek is active.
    seek_buffer: VecDeque<char>,
    seek_enabled: bool,
    seek_indent: usize,
    /// Last normalized character, replayed by [`Self::push_back`].
    last: char,
    reuse: bool,
    line_ending: LineEnding,
    current_indent: usize,
    new_line_indent: usize,
}

impl<'a> CharStream<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        CharStream {
            chars: input.chars(),
            pending: VecDeque::new(),
            seek_buffer: VecDeque::new(),
            seek_enabled: false,
            seek_indent: 0,
            last: EOF_CHAR,
            reuse: false,
            line_ending: LineEnding::Unknown,
            current_indent: 0,
            new_line_indent: 0,
        }
    }

    /// Reads one normalized character, honoring the pushback slot and any
    /// rewound seek recording.
    pub(crate) fn read_raw(&mut self) -> Result<char> {
        if self.reuse {
            // The counters and any active recording already reflect this
            // character's first read.
            self.reuse = false;
            return Ok(self.last);
        }

        let character = self.next_normalized()?;
        self.last = character;
        if character == NEW_LINE {
            self.new_line_indent = self.current_indent + 1;
            self.current_indent = 0;
        } else if character != EOF_CHAR {
            self.current_indent += 1;
        }

        Ok(character)
    }

    fn next_physical(&mut self) -> char {
        let character = match self.pending.pop_front() {
            Some(character) => character,
            None => self.chars.next().unwrap_or(EOF_CHAR),
        };
        if self.seek_enabled {
            self.seek_buffer.push_back(character);
        }

        character
    }

    /// Pulls the next raw character without recording it into a seek.
    fn peek_physical(&mut self) -> char {
        match self.pending.pop_front() {
            Some(character) => character,
            None => self.chars.next().unwrap_or(EOF_CHAR),
        }
    }

    fn next_normalized(&mut self) -> Result<char> {
        let character = self.next_physical();
        match character {
            '\r' => match self.line_ending {
                LineEnding::Lf => Err(Error::mixed_line_endings("CR", "LF")),
                LineEnding::Cr => Ok(NEW_LINE),
                LineEnding::CrLf => {
                    // Swallow the LF half and hand out whatever follows it.
                    self.next_normalized()
                }
                LineEnding::Unknown => {
                    let next = self.peek_physical();
                    if next == '\n' {
                        self.line_ending = LineEnding::CrLf;
                        if self.seek_enabled {
                            self.seek_buffer.push_back(next);
                        }
                    } else {
                        self.line_ending = LineEnding::Cr;
                        self.pending.push_front(next);
                    }
                    Ok(NEW_LINE)
                }
            },
            '\n' => match self.line_ending {
                LineEnding::Cr => Err(Error::mixed_line_endings("LF", "CR")),
                LineEnding::Unknown => {
                    self.line_ending = LineEnding::Lf;
                    Ok(NEW_LINE)
                }
                LineEnding::CrLf | LineEnding::Lf => Ok(NEW_LINE),
            },
            other => Ok(other),
        }
    }

    /// Queues the last character for one replay.
    pub(crate) fn push_back(&mut self) {
        self.reuse = true;
    }

    /// Queues an already-consumed character for replay behind the pushback
    /// slot, undoing its indent contribution.
    pub(crate) fn unread(&mut self, character: char) {
        self.pending.push_front(character);
        if character != NEW_LINE && character != EOF_CHAR {
            self.current_indent = self.current_indent.saturating_sub(1);
        }
    }

    /// Starts recording consumed characters for a later rewind.
    pub(crate) fn enable_seek(&mut self) {
        self.seek_indent = self.current_indent;
        self.seek_enabled = true;
    }

    /// Starts recording with an already-consumed marker queued first, so a
    /// rewind replays the marker too.
    pub(crate) fn enable_seek_from(&mut self, marker: char) {
        self.seek_indent = self.current_indent.saturating_sub(1);
        self.seek_buffer.push_back(marker);
        self.seek_enabled = true;
    }

    /// Stops recording and queues the recording for replay, restoring the
    /// indentation counter saved when the seek was enabled.
    pub(crate) fn rewind_seek(&mut self) {
        self.seek_enabled = false;
        // Anything waiting in the pushback slot was recorded when first
        // read, so the recording alone replays the stream faithfully.
        self.reuse = false;
        self.current_indent = self.seek_indent;
        while let Some(character) = self.seek_buffer.pop_back() {
            self.pending.push_front(character);
        }
    }

    /// Stops recording and commits the consumed characters.
    pub(crate) fn discard_seek(&mut self) {
        self.seek_enabled = false;
        self.seek_buffer.clear();
    }

    pub(crate) fn current_indent(&self) -> usize {
        self.current_indent
    }

    pub(crate) fn new_line_indent(&self) -> usize {
        self.new_line_indent
    }
}
