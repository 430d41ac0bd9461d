//! Sources, spans, and tokenization for Weft.
//!
//! This crate provides:
//! - [`SourceMap`] - Loading and owning source texts
//! - [`Span`] / [`Cursor`] - Byte ranges with line, column and indentation
//! - [`Lexer`] - Tokenization with a per-module symbol table

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod lexer;
pub mod source;
pub mod span;
pub mod token;

pub use lexer::Lexer;
pub use source::{DEFAULT_TAB_WIDTH, Source, SourceMap};
pub use span::{Cursor, Span};
pub use token::{Token, TokenKind};
