//! Integration tests for segment scheduling
//!
//! Tests queue order, peek/shift, requeueing, and a small driver loop.

use weft_engine::{NodeSet, NodeStore};
use weft_foundation::{Interner, SourceId, Type, Value};
use weft_language::Span;

fn span(start: usize, end: usize) -> Span {
    Span::new(SourceId(0), start, end, 1, start as u32 + 1)
}

fn setup() -> (Interner, NodeStore, NodeSet<&'static str>) {
    let interner = Interner::new();
    let set = NodeSet::new(interner.domain());
    (interner, NodeStore::new(), set)
}

#[test]
fn shift_follows_order_then_key() {
    let (mut interner, mut store, mut set) = setup();
    let word = Value::Symbol(interner.intern_symbol("word"));
    let int = Value::Type(Type::Int);

    set.bind(span(0, 10), int.clone(), Value::Int(2), "ints");
    set.bind(span(0, 10), word.clone(), Value::Int(1), "words");
    set.bind(span(0, 10), Value::Type(Type::Str), Value::Int(1), "strs");

    for (offset, value) in [
        (1, Value::Int(1)),
        (2, word.clone()),
        (3, Value::from("s")),
    ] {
        let node = store.insert(value, span(offset, offset + 1));
        set.add(&store, node);
    }

    let mut order = Vec::new();
    while let Some(segment) = set.shift() {
        order.push(segment.payload);
    }
    // Equal orders fall back to the key; symbols sort before types.
    assert_eq!(order, vec!["words", "strs", "ints"]);
    assert!(set.is_drained());
}

#[test]
fn peek_does_not_consume() {
    let (_, mut store, mut set) = setup();
    set.bind(span(0, 4), Value::Type(Type::Int), Value::Int(0), "ints");
    let node = store.insert(Value::Int(5), span(2, 3));
    set.add(&store, node);

    let first = set.peek().map(|s| (s.start(), s.end(), s.len()));
    let again = set.peek().map(|s| (s.start(), s.end(), s.len()));
    assert_eq!(first, Some((0, 4, 1)));
    assert_eq!(first, again);
    assert_eq!(set.pending(), 1);

    let segment = set.shift().unwrap();
    assert_eq!(segment.nodes, vec![node]);
    assert!(set.peek().is_none());
}

#[test]
fn nodes_added_after_shift_requeue_the_segment() {
    let (_, mut store, mut set) = setup();
    set.bind(span(0, 10), Value::Type(Type::Int), Value::Int(0), "ints");
    let a = store.insert(Value::Int(1), span(1, 2));
    set.add(&store, a);
    assert_eq!(set.shift().unwrap().nodes, vec![a]);
    assert!(set.shift().is_none());

    let b = store.insert(Value::Int(2), span(4, 5));
    set.add(&store, b);
    assert_eq!(set.shift().unwrap().nodes, vec![b]);
}

#[test]
fn binding_pulls_unbound_nodes_into_the_queue() {
    let (_, mut store, mut set) = setup();
    let key = Value::Type(Type::Int);
    let nodes: Vec<_> = (0..4)
        .map(|i| {
            let node = store.insert(Value::Int(i), span(i as usize * 2, i as usize * 2 + 1));
            set.add(&store, node);
            node
        })
        .collect();
    assert_eq!(set.unbound(&key), nodes);
    assert!(set.shift().is_none());

    set.bind(span(2, 5), key.clone(), Value::Int(0), "middle");
    assert_eq!(set.unbound(&key), vec![nodes[0], nodes[3]]);
    assert_eq!(set.shift().unwrap().nodes, vec![nodes[1], nodes[2]]);

    let leftovers = set.pop_unbound();
    assert_eq!(leftovers.len(), 1);
    assert_eq!(leftovers[0].nodes, vec![nodes[0], nodes[3]]);
    assert!(set.unbound(&key).is_empty());
}

#[test]
fn driver_loop_reaches_a_fixed_point() {
    let (_, mut store, mut set) = setup();
    let int = Value::Type(Type::Int);
    let float = Value::Type(Type::Float);
    set.bind(span(0, 20), int.clone(), Value::Int(0), "to-float");
    set.bind(span(0, 20), float.clone(), Value::Int(1), "done");
    for offset in [3, 7, 11] {
        let node = store.insert(Value::Int(offset as i64), span(offset, offset + 1));
        set.add(&store, node);
    }

    let mut applied = Vec::new();
    while let Some(segment) = set.shift() {
        applied.push((segment.payload, segment.nodes.len()));
        if segment.payload == "to-float" {
            for node in segment.nodes {
                let (value, span) = (store.value(node).clone(), store.get(node).span());
                let n = value.as_int().unwrap();
                let float = store.insert(Value::Float(n as f64), span);
                set.add(&store, float);
            }
        }
    }

    assert_eq!(applied, vec![("to-float", 3), ("done", 3)]);
    assert!(set.pop_unbound().is_empty());
    assert_eq!(set.keys(), vec![&int, &float]);
}

#[test]
#[should_panic(expected = "used in a node set")]
fn foreign_keys_are_rejected() {
    let (_, _, mut set) = setup();
    let mut other = Interner::new();
    let foreign = Value::Symbol(other.intern_symbol("x"));
    set.bind(span(0, 1), foreign, Value::Int(0), "never");
}
