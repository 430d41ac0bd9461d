//! Lexer for Weft sources.
//!
//! The lexer converts source text into a flat stream of tokens. Symbols are
//! not fixed: each lexer carries its own symbol table, matched longest first,
//! so a module can extend the syntax it reads.

use std::sync::Arc;

use crate::source::Source;
use crate::span::{Cursor, is_line_break};
use crate::token::{Token, TokenKind};

/// Lexer for Weft source code.
///
/// Cloning a lexer copies its symbol table.
#[derive(Clone, Debug, Default)]
pub struct Lexer {
    /// Registered symbols, longest first.
    symbols: Vec<Arc<str>>,
}

impl Lexer {
    /// Creates a lexer without any symbols.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a lexer with the given symbols registered.
    #[must_use]
    pub fn with_symbols<'a>(symbols: impl IntoIterator<Item = &'a str>) -> Self {
        let mut lexer = Self::new();
        for symbol in symbols {
            lexer.add_symbol(symbol);
        }
        lexer
    }

    /// Registers a symbol. Empty and duplicate symbols are ignored.
    pub fn add_symbol(&mut self, symbol: &str) {
        if symbol.is_empty() || self.symbols.iter().any(|s| &**s == symbol) {
            return;
        }
        let at = self
            .symbols
            .partition_point(|s| s.len() > symbol.len() || (s.len() == symbol.len() && &**s < symbol));
        self.symbols.insert(at, symbol.into());
    }

    /// Iterates over registered symbols, longest first.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(AsRef::as_ref)
    }

    /// Tokenizes a whole source.
    ///
    /// Tokenization stops after the first `Invalid` token, which is included
    /// in the output.
    #[must_use]
    pub fn tokenize(&self, source: &Source) -> Vec<Token> {
        let mut cursor = source.cursor();
        let mut tokens = Vec::new();
        while let Some(token) = self.read_next(&mut cursor) {
            tokens.push(token);
            if token.kind == TokenKind::Invalid {
                break;
            }
        }
        tokens
    }

    /// Reads the next token, or `None` at the end of the input.
    fn read_next(&self, cursor: &mut Cursor<'_>) -> Option<Token> {
        cursor.skip_spaces();
        let rest = cursor.rest();
        let next = rest.chars().next()?;

        let (kind, len) = if rest.starts_with("\r\n") {
            (TokenKind::Break, 2)
        } else if is_line_break(next) {
            (TokenKind::Break, 1)
        } else if rest.starts_with("//") {
            (TokenKind::Comment, rest.find(is_line_break).unwrap_or(rest.len()))
        } else if next == '"' || next == '\'' {
            scan_literal(rest, next)
        } else if next.is_ascii_digit() {
            scan_number(rest)
        } else if is_ident_start(next) {
            let len = rest
                .find(|c: char| !is_ident_char(c))
                .unwrap_or(rest.len());
            (TokenKind::Word, len)
        } else if let Some(symbol) = self.match_symbol(rest) {
            (TokenKind::Symbol, symbol.len())
        } else {
            (TokenKind::Invalid, next.len_utf8())
        };

        Some(Token::new(kind, cursor.token(len)))
    }

    /// Returns the longest registered symbol `rest` starts with.
    fn match_symbol(&self, rest: &str) -> Option<&str> {
        self.symbols
            .iter()
            .map(AsRef::as_ref)
            .find(|symbol| rest.starts_with(symbol))
    }
}

/// Scans a quoted literal. Unterminated literals are `Invalid` up to the end
/// of the line.
fn scan_literal(rest: &str, quote: char) -> (TokenKind, usize) {
    let mut chars = rest.char_indices().skip(1);
    while let Some((at, c)) = chars.next() {
        if c == quote {
            return (TokenKind::Literal, at + c.len_utf8());
        }
        if is_line_break(c) {
            return (TokenKind::Invalid, at);
        }
        if c == '\\' {
            match chars.next() {
                Some((at, escaped)) if is_line_break(escaped) => return (TokenKind::Invalid, at),
                Some(_) => {}
                None => break,
            }
        }
    }
    (TokenKind::Invalid, rest.len())
}

/// Scans an integer, or a float when the digits are followed by `.digits`.
fn scan_number(rest: &str) -> (TokenKind, usize) {
    let digits = |s: &str| s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let int_len = digits(rest);
    let tail = &rest[int_len..];
    if let Some(fraction) = tail.strip_prefix('.') {
        let frac_len = digits(fraction);
        if frac_len > 0 {
            return (TokenKind::Float, int_len + 1 + frac_len);
        }
    }
    (TokenKind::Integer, int_len)
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
