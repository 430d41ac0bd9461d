//! Integration tests for Value types
//!
//! Tests equality, hashing, ordering, display, and binding keys.

use std::collections::HashSet;

use weft_foundation::collections::LtVec;
use weft_foundation::{Interner, KeyExtractable, SourceId, Type, Value};

// =============================================================================
// Binding Keys
// =============================================================================

#[test]
fn scalars_route_by_type() {
    assert_eq!(Value::Int(1).binding_key(), Some(Value::Type(Type::Int)));
    assert_eq!(Value::Float(1.5).binding_key(), Some(Value::Type(Type::Float)));
    assert_eq!(Value::from("s").binding_key(), Some(Value::Type(Type::Str)));
    assert_eq!(
        Value::Source(SourceId(3)).binding_key(),
        Some(Value::Type(Type::Source))
    );
}

#[test]
fn symbols_route_to_themselves() {
    let mut interner = Interner::new();
    let sym = Value::Symbol(interner.intern_symbol("let"));
    assert_eq!(sym.binding_key(), Some(sym.clone()));
}

#[test]
fn some_values_are_never_scheduled() {
    let mut interner = Interner::new();
    assert_eq!(Value::Nil.binding_key(), None);
    assert_eq!(Value::Bool(true).binding_key(), None);
    assert_eq!(Value::Keyword(interner.intern_keyword("k")).binding_key(), None);
    assert_eq!(Value::List(LtVec::new()).binding_key(), None);
    assert_eq!(Value::Type(Type::Int).binding_key(), None);
}

// =============================================================================
// Equality and Ordering
// =============================================================================

#[test]
fn values_work_as_hash_keys() {
    let mut set = HashSet::new();
    set.insert(Value::Int(1));
    set.insert(Value::Int(1));
    set.insert(Value::Float(1.0));
    set.insert(Value::Type(Type::Int));
    assert_eq!(set.len(), 3);
}

#[test]
fn nan_equals_itself() {
    assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
}

#[test]
fn order_is_total_across_variants() {
    let mut values = vec![
        Value::Source(SourceId(0)),
        Value::Type(Type::Int),
        Value::Int(2),
        Value::Nil,
        Value::Int(-1),
        Value::Bool(false),
    ];
    values.sort();
    assert_eq!(
        values,
        vec![
            Value::Nil,
            Value::Bool(false),
            Value::Int(-1),
            Value::Int(2),
            Value::Type(Type::Int),
            Value::Source(SourceId(0)),
        ]
    );
}

#[test]
fn types_order_by_declaration() {
    assert!(Value::Type(Type::Int) < Value::Type(Type::Source));
    assert!(Value::Type(Type::Nil) < Value::Type(Type::Int));
}

// =============================================================================
// Display
// =============================================================================

#[test]
fn display_resolves_names() {
    let mut interner = Interner::new();
    let sym = Value::Symbol(interner.intern_symbol("define"));
    let kw = Value::Keyword(interner.intern_keyword("name"));

    assert_eq!(sym.display(&interner).to_string(), "define");
    assert_eq!(kw.display(&interner).to_string(), ":name");
    assert_eq!(interner.display(&Value::Int(4)).to_string(), "4");
}

#[test]
fn display_of_lists_and_types() {
    let interner = Interner::new();
    let list: LtVec<Value> = vec![Value::Int(1), Value::from("two")].into_iter().collect();
    assert_eq!(Value::List(list).display(&interner).to_string(), "(1 two)");
    assert_eq!(Value::Type(Type::Source).to_string(), "source");
}
