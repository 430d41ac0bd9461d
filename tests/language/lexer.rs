//! Integration tests for the lexer
//!
//! Tests tokenization and token values over loaded sources.

use weft_foundation::{Interner, Value};
use weft_language::{Lexer, SourceMap, TokenKind};

fn kinds(lexer: &Lexer, text: &str) -> Vec<(TokenKind, String)> {
    let mut sources = SourceMap::new();
    let id = sources.load_string("test.w", text);
    lexer
        .tokenize(sources.source(id))
        .into_iter()
        .map(|t| (t.kind, t.text(&sources).to_string()))
        .collect()
}

// =============================================================================
// Token Kinds
// =============================================================================

#[test]
fn words_numbers_and_literals() {
    let tokens = kinds(&Lexer::new(), "let x1 = 42 3.5 \"hi\"");
    let expected = vec![
        (TokenKind::Word, "let"),
        (TokenKind::Word, "x1"),
        (TokenKind::Invalid, "="),
    ];
    let got: Vec<_> = tokens.iter().map(|(k, t)| (*k, t.as_str())).collect();
    assert_eq!(got, expected);

    let lexer = Lexer::with_symbols(["="]);
    let tokens = kinds(&lexer, "let x1 = 42 3.5 \"hi\"");
    let got: Vec<_> = tokens.iter().map(|(k, _)| *k).collect();
    assert_eq!(
        got,
        vec![
            TokenKind::Word,
            TokenKind::Word,
            TokenKind::Symbol,
            TokenKind::Integer,
            TokenKind::Float,
            TokenKind::Literal,
        ]
    );
}

#[test]
fn longest_symbol_wins() {
    let lexer = Lexer::with_symbols(["=", "==", "=>"]);
    let tokens = kinds(&lexer, "== => =");
    let texts: Vec<_> = tokens.iter().map(|(_, t)| t.as_str()).collect();
    assert_eq!(texts, vec!["==", "=>", "="]);
}

#[test]
fn breaks_and_comments() {
    let tokens = kinds(&Lexer::new(), "a // note\r\nb\n");
    let got: Vec<_> = tokens.iter().map(|(k, _)| *k).collect();
    assert_eq!(
        got,
        vec![
            TokenKind::Word,
            TokenKind::Comment,
            TokenKind::Break,
            TokenKind::Word,
            TokenKind::Break,
        ]
    );
    assert_eq!(tokens[2].1, "\r\n");
}

#[test]
fn trailing_dot_is_not_a_float() {
    let lexer = Lexer::with_symbols(["."]);
    let tokens = kinds(&lexer, "1. 2.5");
    let got: Vec<_> = tokens.iter().map(|(k, t)| (*k, t.as_str())).collect();
    assert_eq!(
        got,
        vec![
            (TokenKind::Integer, "1"),
            (TokenKind::Symbol, "."),
            (TokenKind::Float, "2.5"),
        ]
    );
}

#[test]
fn unterminated_literal_stops_the_lexer() {
    let tokens = kinds(&Lexer::new(), "a \"open\nb");
    let got: Vec<_> = tokens.iter().map(|(k, _)| *k).collect();
    assert_eq!(got, vec![TokenKind::Word, TokenKind::Invalid]);
    assert_eq!(tokens[1].1, "\"open");
}

// =============================================================================
// Token Values
// =============================================================================

#[test]
fn token_values() {
    let mut sources = SourceMap::new();
    let mut interner = Interner::new();
    let id = sources.load_string("v.w", "name 7 2.25 'a\\tb' 99999999999999999999");
    let values: Vec<_> = Lexer::new()
        .tokenize(sources.source(id))
        .iter()
        .filter_map(|t| t.value(&sources, &mut interner))
        .collect();

    let name = interner.intern_symbol("name");
    assert_eq!(
        values,
        vec![
            Value::Symbol(name),
            Value::Int(7),
            Value::Float(2.25),
            Value::from("a\tb"),
            Value::from("99999999999999999999"),
        ]
    );
}

#[test]
fn describe_names_kind_location_and_text() {
    let mut sources = SourceMap::new();
    let id = sources.load_string("d.w", "\n  word");
    let tokens = Lexer::new().tokenize(sources.source(id));
    assert_eq!(tokens[1].describe(&sources), "<Word[d.w:2:3+4] = \"word\">");
}
