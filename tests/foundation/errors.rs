//! Integration tests for error types

use weft_foundation::{Error, ErrorContext, ErrorKind, SemanticLimit};

#[test]
fn operator_failure_message() {
    let err = Error::operator_failed("expand", "unbalanced parens");
    assert_eq!(err.to_string(), "operator `expand` failed: unbalanced parens");
}

#[test]
fn context_is_rendered_after_the_message() {
    let err = Error::operator_failed("expand", "oops").with_context(
        ErrorContext::new()
            .with_source("main.w")
            .with_position(3, 7)
            .with_frame("expand")
            .with_frame("outer"),
    );
    assert_eq!(
        err.to_string(),
        "operator `expand` failed: oops at main.w:3:7\n  in expand\n  in outer"
    );
}

#[test]
fn step_limit_message() {
    let err = Error::limit_exceeded(SemanticLimit::MaxSteps {
        limit: 10,
        context: Some("next operator `loop`".to_string()),
    });
    assert!(matches!(err.kind, ErrorKind::LimitExceeded(_)));
    assert_eq!(
        err.to_string(),
        "limit exceeded: max evaluation steps (10) exceeded: next operator `loop`"
    );
}

#[test]
fn unknown_module_message() {
    let err = Error::new(ErrorKind::UnknownModule(4));
    assert_eq!(err.to_string(), "unknown module #4");
}
