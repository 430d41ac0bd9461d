//! Source location tracking.
//!
//! `Span` tracks the position of tokens and nodes in source code for
//! binding ranges and error reporting. `Cursor` walks a span over the source
//! text keeping line, column and indentation up to date.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use weft_foundation::SourceId;

use crate::source::{Source, SourceMap};

/// A span of source text.
///
/// Tracks byte offsets and line/column positions. `indent` is the column of
/// the first non-blank character on the span's starting line, or the current
/// column while only blanks have been seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Span {
    /// Source this span points into.
    pub source: SourceId,
    /// Byte offset where this span starts.
    pub start: usize,
    /// Byte offset where this span ends (exclusive).
    pub end: usize,
    /// 1-based line number where this span starts.
    pub line: u32,
    /// 1-based column number where this span starts.
    pub column: u32,
    /// 1-based indentation column of the starting line.
    pub indent: u32,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(source: SourceId, start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            source,
            start,
            end,
            line,
            column,
            indent: 1,
        }
    }

    /// Creates an empty span at a byte offset of a single-line source.
    ///
    /// Useful for synthetic nodes that have no text of their own.
    ///
    /// # Panics
    ///
    /// Panics if the column `offset + 1` does not fit in a `u32`.
    #[must_use]
    pub fn point(source: SourceId, offset: usize) -> Self {
        let column = offset
            .checked_add(1)
            .and_then(|column| u32::try_from(column).ok())
            .expect("point column out of range");
        Self::new(source, offset, offset, 1, column)
    }

    /// Creates a span covering the range from this span to another.
    #[must_use]
    pub fn to(self, other: Self) -> Self {
        debug_assert_eq!(self.source, other.source, "joining spans of different sources");
        Self {
            end: other.end,
            ..self
        }
    }

    /// Returns the length of this span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if this span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the text this span covers.
    #[must_use]
    pub fn text<'a>(&self, sources: &'a SourceMap) -> &'a str {
        &sources.source(self.source).text()[self.start..self.end]
    }

    /// Returns `name:line:column`, followed by `+len` for non-empty spans.
    #[must_use]
    pub fn location(&self, sources: &SourceMap) -> String {
        let name = sources.source(self.source).name();
        let mut out = format!("{name}:{}:{}", self.line, self.column);
        if !self.is_empty() {
            out.push_str(&format!("+{}", self.len()));
        }
        out
    }

    /// Returns the sub-span `[offset, offset + len)` relative to this span,
    /// with line and column recomputed.
    ///
    /// # Panics
    ///
    /// Panics if the sub-span does not fit inside this span.
    #[must_use]
    pub fn slice(&self, sources: &SourceMap, offset: usize, len: usize) -> Self {
        assert!(offset + len <= self.len(), "sub-span out of bounds");
        let mut cursor = Cursor::at(sources.source(self.source), *self);
        cursor.advance(offset);
        cursor.token(len)
    }
}

/// Walks forward over source text, keeping a [`Span`] for the remainder.
#[derive(Clone, Debug)]
pub struct Cursor<'src> {
    text: &'src str,
    tab_width: u32,
    span: Span,
    after_cr: bool,
}

impl<'src> Cursor<'src> {
    /// Creates a cursor over the whole source.
    #[must_use]
    pub fn new(source: &'src Source) -> Self {
        Self::at(source, source.span())
    }

    /// Creates a cursor over the given span of the source.
    #[must_use]
    pub fn at(source: &'src Source, span: Span) -> Self {
        Self {
            text: source.text(),
            tab_width: source.tab_width(),
            span,
            after_cr: false,
        }
    }

    /// Returns the span of the text not consumed yet.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Returns the text not consumed yet.
    #[must_use]
    pub fn rest(&self) -> &'src str {
        &self.text[self.span.start..self.span.end]
    }

    /// Returns true once everything has been consumed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Peeks at the next character without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Returns the span of the next `len` bytes and advances past them.
    pub fn token(&mut self, len: usize) -> Span {
        let mut token = self.span;
        token.end = token.start + len;
        self.advance(len);
        token
    }

    /// Skips blanks other than line breaks. Returns true if any were skipped.
    pub fn skip_spaces(&mut self) -> bool {
        self.skip_while(is_space) > 0
    }

    /// Skips characters while `cond` holds and returns the skipped length.
    pub fn skip_while(&mut self, cond: impl Fn(char) -> bool) -> usize {
        let rest = self.rest();
        let size = rest.len() - rest.trim_start_matches(cond).len();
        if size > 0 {
            self.advance(size);
        }
        size
    }

    /// Advances past the next `size` bytes.
    ///
    /// `\r\n` counts as a single line break, tabs advance to the next tab
    /// stop.
    pub fn advance(&mut self, size: usize) {
        let tab = self.tab_width.max(1);
        let text = &self.text[self.span.start..self.span.start + size];
        for chr in text.chars() {
            self.span.start += chr.len_utf8();
            if is_line_break(chr) {
                let joined = chr == '\n' && self.after_cr;
                self.after_cr = chr == '\r';
                if joined {
                    continue;
                }
                self.span.line += 1;
                self.span.column = 1;
                self.span.indent = 1;
            } else {
                self.after_cr = false;
                let at_indent = self.span.column == self.span.indent;
                if chr == '\t' {
                    self.span.column += tab - (self.span.column - 1) % tab;
                } else {
                    self.span.column += 1;
                }
                if at_indent && is_space(chr) {
                    self.span.indent = self.span.column;
                }
            }
        }
    }
}

/// Returns true for line break characters.
#[must_use]
pub const fn is_line_break(chr: char) -> bool {
    matches!(chr, '\n' | '\r')
}

/// Returns true for blanks that are not line breaks.
#[must_use]
pub fn is_space(chr: char) -> bool {
    !is_line_break(chr) && chr.is_whitespace()
}
