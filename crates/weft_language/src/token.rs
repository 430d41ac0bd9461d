//! Token types produced by the lexer.

use std::fmt;

use weft_foundation::{Interner, Value};

use crate::source::SourceMap;
use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    /// The kind of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the text this token covers.
    #[must_use]
    pub fn text<'a>(&self, sources: &'a SourceMap) -> &'a str {
        self.span.text(sources)
    }

    /// Returns true for tokens that carry no value (breaks and comments).
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Break | TokenKind::Comment)
    }

    /// Converts this token into a value.
    ///
    /// Words and symbols become interned symbols, numbers become numbers and
    /// literals become strings with escapes resolved. Integers that overflow
    /// are kept as their text. Breaks, comments and invalid tokens have no
    /// value.
    #[must_use]
    pub fn value(&self, sources: &SourceMap, interner: &mut Interner) -> Option<Value> {
        let text = self.text(sources);
        match self.kind {
            TokenKind::Word | TokenKind::Symbol => Some(Value::Symbol(interner.intern_symbol(text))),
            TokenKind::Integer => Some(
                text.parse::<i64>()
                    .map_or_else(|_| Value::from(text), Value::Int),
            ),
            TokenKind::Float => text.parse::<f64>().ok().map(Value::Float),
            TokenKind::Literal => Some(Value::from(unescape(text))),
            TokenKind::Break | TokenKind::Comment | TokenKind::Invalid => None,
        }
    }

    /// Formats the token as `<Kind[location] = "text">`.
    #[must_use]
    pub fn describe(&self, sources: &SourceMap) -> String {
        format!(
            "<{}[{}] = {:?}>",
            self.kind,
            self.span.location(sources),
            self.text(sources)
        )
    }
}

/// The kinds of token recognized by the lexer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A line break: `\n`, `\r` or `\r\n`.
    Break,
    /// An identifier like `print` or `_x1`.
    Word,
    /// A registered symbol like `+` or `=>`.
    Symbol,
    /// A run of decimal digits.
    Integer,
    /// Digits with a fractional part, like `1.5`.
    Float,
    /// A quoted string literal.
    Literal,
    /// A `//` comment up to the end of the line.
    Comment,
    /// Text the lexer could not recognize.
    Invalid,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Break => "Break",
            Self::Word => "Word",
            Self::Symbol => "Symbol",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Literal => "Literal",
            Self::Comment => "Comment",
            Self::Invalid => "Invalid",
        };
        f.write_str(name)
    }
}

/// Strips the quotes off a literal and resolves backslash escapes.
fn unescape(text: &str) -> String {
    let inner = if text.len() >= 2 {
        &text[1..text.len() - 1]
    } else {
        ""
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
