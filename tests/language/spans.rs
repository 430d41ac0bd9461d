//! Integration tests for spans and cursors

use weft_language::{SourceMap, Span};

#[test]
fn location_and_text() {
    let mut sources = SourceMap::new();
    let id = sources.load_string("main.w", "one\ntwo three");
    let whole = sources.source(id).span();

    let three = whole.slice(&sources, 8, 5);
    assert_eq!(three.text(&sources), "three");
    assert_eq!(three.line, 2);
    assert_eq!(three.column, 5);
    assert_eq!(three.location(&sources), "main.w:2:5+5");

    let point = Span::point(id, 0);
    assert!(point.is_empty());
    assert_eq!(point.location(&sources), "main.w:1:1");
}

#[test]
fn joined_spans_cover_both() {
    let mut sources = SourceMap::new();
    let id = sources.load_string("main.w", "abc def");
    let whole = sources.source(id).span();
    let abc = whole.slice(&sources, 0, 3);
    let def = whole.slice(&sources, 4, 3);

    let both = abc.to(def);
    assert_eq!(both.text(&sources), "abc def");
    assert_eq!(both.column, 1);
}

#[test]
fn tabs_advance_to_the_next_stop() {
    let mut sources = SourceMap::new().with_tab_width(8);
    let id = sources.load_string("tabs.w", "\tx");
    let x = sources.source(id).span().slice(&sources, 1, 1);
    assert_eq!(x.column, 9);
}

#[test]
fn crlf_is_one_line_break() {
    let mut sources = SourceMap::new();
    let id = sources.load_string("crlf.w", "a\r\nb\rc");
    let whole = sources.source(id).span();
    assert_eq!(whole.slice(&sources, 3, 1).line, 2);
    assert_eq!(whole.slice(&sources, 5, 1).line, 3);
}
