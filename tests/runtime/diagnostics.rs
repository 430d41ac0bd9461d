//! Integration tests for unresolved diagnostics
//!
//! Tests the collection and rendering of nodes no operator claimed.

use weft_runtime::{EvalConfig, Program};

use crate::common::summing_program;

#[test]
fn unclaimed_words_are_reported() {
    let (mut program, _) = summing_program(EvalConfig::default());
    let module = program.load_string("main.w", "1 foo 2\nbar foo");

    let report = program.evaluate().unwrap();

    assert!(!report.is_clean());
    assert_eq!(report.unresolved.len(), 1);
    let diag = &report.unresolved[0];
    assert_eq!(diag.module, module);
    assert_eq!(diag.name, "main.w");
    assert_eq!(diag.node_count(), 3);

    let foo = diag.entries.iter().find(|e| e.key == "foo").unwrap();
    let locations: Vec<_> = foo.nodes.iter().map(|n| n.location.as_str()).collect();
    assert_eq!(locations, vec!["main.w:1:3+3", "main.w:2:5+3"]);

    let bar = diag.entries.iter().find(|e| e.key == "bar").unwrap();
    assert_eq!(bar.nodes[0].value, "bar");
    assert_eq!(bar.nodes[0].location, "main.w:2:1+3");

    let msg = diag.to_string();
    assert!(msg.starts_with("module `main.w` has unprocessed nodes:"));
    assert!(msg.contains("=> Key foo:"));
    assert!(msg.contains("-> bar -- main.w:2:1+3"));
}

#[test]
fn diagnostics_accumulate_across_evaluations() {
    let (mut program, _) = summing_program(EvalConfig::default());
    program.load_string("one.w", "x");
    program.evaluate().unwrap();
    assert_eq!(program.errors().len(), 1);

    // Leftovers are reported once.
    let report = program.evaluate().unwrap();
    assert!(report.is_clean());
    assert_eq!(program.errors().len(), 1);

    program.load_string("two.w", "y z");
    let report = program.evaluate().unwrap();
    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(report.unresolved[0].name, "two.w");
    assert_eq!(program.errors().len(), 2);
}

#[test]
fn empty_source_is_unresolved() {
    let (mut program, _) = summing_program(EvalConfig::default());
    program.load_string("empty.w", "");

    let report = program.evaluate().unwrap();

    // The global bindings cover an empty range and are ignored, leaving the
    // source node itself unclaimed.
    assert_eq!(report.steps, 0);
    let diag = &report.unresolved[0];
    assert_eq!(diag.entries.len(), 1);
    assert_eq!(diag.entries[0].key, "source");
    assert_eq!(diag.entries[0].nodes[0].location, "empty.w:1:1");
}

#[test]
fn program_without_globals_reports_every_source() {
    let mut program = Program::default();
    program.load_string("b.w", "b");
    program.load_string("a.w", "a");

    let report = program.evaluate().unwrap();

    assert_eq!(report.steps, 0);
    let names: Vec<_> = report.unresolved.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["b.w", "a.w"]);
}
