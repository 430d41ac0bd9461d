//! Integration tests for module loading
//!
//! Tests in-memory and file sources, load caching, and per-module lexers.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use weft_foundation::{ErrorKind, Value};
use weft_runtime::{EvalConfig, Program, operator};

use crate::common::{source_key, tokenize};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("weft-runtime-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

// =============================================================================
// Load Strings
// =============================================================================

#[test]
fn modules_are_numbered_from_one() {
    let mut program = Program::default();
    let a = program.load_string("a.w", "a");
    let b = program.load_string("b.w", "b");

    assert_eq!(a.number(), 1);
    assert_eq!(b.number(), 2);
    assert_eq!(program.modules().len(), 2);
    assert_eq!(program.module(b).unwrap().name(), "b.w");
    assert!(!program.module(a).unwrap().is_initialized());
}

#[test]
fn loading_the_same_text_twice_makes_two_modules() {
    let mut program = Program::default();
    let a = program.load_string("same.w", "x");
    let b = program.load_string("same.w", "x");
    assert_ne!(a, b);
    let source = program.module(b).unwrap().source();
    assert_eq!(program.module_for(source), Some(b));
}

// =============================================================================
// Load Files
// =============================================================================

#[test]
fn load_file_is_cached() {
    let dir = scratch_dir("cached");
    std::fs::write(dir.join("main.w"), "1 2").unwrap();

    let mut program = Program::new(EvalConfig::new().with_base_path(&dir));
    let first = program.load_file("main.w").unwrap();
    let again = program.load_file("main.w").unwrap();

    assert_eq!(first, again);
    assert_eq!(program.modules().len(), 1);
    assert_eq!(program.module(first).unwrap().name(), "main.w");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn load_file_failure_is_cached() {
    let dir = scratch_dir("missing");
    let mut program = Program::new(EvalConfig::new().with_base_path(&dir));

    let err = program.load_file("nope.w").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SourceLoad { .. }));

    // Creating the file afterwards does not change the cached outcome.
    std::fs::write(dir.join("nope.w"), "1").unwrap();
    let err = program.load_file("nope.w").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SourceLoad { .. }));
    assert!(program.modules().is_empty());

    std::fs::remove_dir_all(&dir).ok();
}

// =============================================================================
// Lexers
// =============================================================================

#[test]
fn modules_copy_the_program_lexer() {
    let mut program = Program::default();
    program.lexer_mut().add_symbol("+");
    let before = program.load_string("before.w", "");
    program.lexer_mut().add_symbol("-");
    let after = program.load_string("after.w", "");

    let symbols = |id| -> Vec<String> {
        program
            .module(id)
            .unwrap()
            .lexer()
            .symbols()
            .map(str::to_string)
            .collect()
    };
    assert_eq!(symbols(before), vec!["+"]);
    assert_eq!(symbols(after).len(), 2);
}

#[test]
fn operators_extend_their_module_lexer() {
    let words = Arc::new(Mutex::new(Vec::new()));
    let words_in_op = Arc::clone(&words);
    let mut program = Program::default();
    let setup = operator("setup", |ctx, _segment| {
        ctx.lexer_mut().add_symbol("=>");
        Ok(())
    });
    let record = operator("record", move |ctx, segment| {
        for node in segment.nodes {
            let text = ctx.node(node).span().text(ctx.sources()).to_string();
            words_in_op.lock().unwrap().push(text);
        }
        Ok(())
    });
    program.bind_global(source_key(), Value::Int(0), setup);
    let module = program.load_string("main.w", "a => b");
    program.evaluate().unwrap();

    assert!(program.module(module).unwrap().lexer().symbols().any(|s| s == "=>"));
    assert!(program.lexer().symbols().next().is_none());

    let arrow = Value::Symbol(program.interner_mut().intern_symbol("=>"));
    program.bind_global(source_key(), Value::Int(0), tokenize());
    program.bind_global(arrow, Value::Int(1), record);
    program.load_string("plain.w", "a => b");
    let report = program.evaluate().unwrap();

    // plain.w is lexed with the program lexer, which never learned `=>`,
    // so lexing stops at the `=` and only `a` is left over.
    assert!(words.lock().unwrap().is_empty());
    assert_eq!(report.unresolved.len(), 1);
}
