//! Integration tests for range binding
//!
//! Drives a node set through the reference binding scenario and checks the
//! narrower-wins and merge properties through the public API.

use weft_engine::{NodeSet, NodeStore};
use weft_foundation::{Interner, SourceId, Type, Value};
use weft_language::Span;

struct Table {
    store: NodeStore,
    set: NodeSet<&'static str>,
    key: Value,
}

impl Table {
    /// One integer node per offset in `0..len`.
    fn new(len: usize) -> Self {
        let interner = Interner::new();
        let mut store = NodeStore::new();
        let mut set = NodeSet::new(interner.domain());
        for offset in 0..len {
            let node = store.insert(Value::Int(offset as i64), span(offset, offset + 1));
            assert!(set.add(&store, node));
        }
        Self {
            store,
            set,
            key: Value::Type(Type::Int),
        }
    }

    fn set(&mut self, start: usize, end: usize, payload: &'static str) {
        self.set
            .bind(span(start, end), self.key.clone(), Value::Int(0), payload);
    }

    fn get(&self, pos: usize) -> Option<&'static str> {
        self.set.get(&self.key, pos).copied()
    }

    fn expect(&self, start: usize, end: usize, payload: Option<&'static str>) {
        for pos in start..end {
            assert_eq!(self.get(pos), payload, "at offset {pos}");
        }
    }

    fn node_count(&self) -> usize {
        let bound: usize = self.set.segments(&self.key).map(|s| s.len()).sum();
        bound + self.set.unbound(&self.key).len()
    }
}

fn span(start: usize, end: usize) -> Span {
    Span::new(SourceId(0), start, end, 1, start as u32 + 1)
}

#[test]
fn reference_scenario() {
    let mut table = Table::new(100);
    table.set(0, 5, "a");
    table.set(5, 10, "b");
    table.set(10, 15, "c");
    table.set(15, 20, "d");
    table.set(20, 25, "e");
    table.expect(0, 5, Some("a"));
    table.expect(5, 10, Some("b"));
    table.expect(10, 15, Some("c"));
    table.expect(15, 20, Some("d"));
    table.expect(20, 25, Some("e"));
    table.expect(25, 30, None);
    assert_eq!(table.node_count(), 100);

    table.set(0, 2, "ax");
    table.set(3, 5, "ay");
    table.expect(0, 2, Some("ax"));
    table.expect(2, 3, Some("a"));
    table.expect(3, 5, Some("ay"));
    table.expect(5, 10, Some("b"));
    assert_eq!(table.node_count(), 100);

    table.set(6, 9, "bx");
    table.expect(5, 6, Some("b"));
    table.expect(6, 9, Some("bx"));
    table.expect(9, 10, Some("b"));

    table.set(12, 17, "cd");
    table.expect(10, 12, Some("c"));
    table.expect(12, 17, Some("cd"));
    table.expect(17, 20, Some("d"));
    assert_eq!(table.node_count(), 100);
    assert_eq!(table.set.unbound(&table.key).len(), 75);
}

#[test]
fn narrower_wins_in_either_order() {
    let mut first = Table::new(10);
    first.set(0, 10, "outer");
    first.set(3, 6, "inner");

    let mut second = Table::new(10);
    second.set(3, 6, "inner");
    second.set(0, 10, "outer");

    for table in [&first, &second] {
        table.expect(0, 3, Some("outer"));
        table.expect(3, 6, Some("inner"));
        table.expect(6, 10, Some("outer"));
    }
}

#[test]
fn partial_overlap_goes_to_the_newest() {
    let mut table = Table::new(10);
    table.set(0, 6, "left");
    table.set(4, 10, "right");
    table.expect(0, 4, Some("left"));
    table.expect(4, 10, Some("right"));

    let mut table = Table::new(10);
    table.set(4, 10, "right");
    table.set(0, 6, "left");
    table.expect(0, 6, Some("left"));
    table.expect(6, 10, Some("right"));
}

#[test]
fn segments_stay_sorted_and_disjoint() {
    let mut table = Table::new(40);
    table.set(0, 40, "all");
    table.set(5, 15, "x");
    table.set(10, 30, "y");
    table.set(12, 14, "z");

    let ranges: Vec<_> = table
        .set
        .segments(&table.key)
        .map(|s| (s.start(), s.end()))
        .collect();
    for pair in ranges.windows(2) {
        assert!(pair[0].1 <= pair[1].0, "overlap in {ranges:?}");
    }
    assert_eq!(table.node_count(), 40);
}

#[test]
fn empty_ranges_are_ignored() {
    let mut table = Table::new(5);
    assert!(
        table
            .set
            .bind(span(3, 3), table.key.clone(), Value::Int(0), "nothing")
            .is_none()
    );
    table.expect(0, 5, None);
    assert_eq!(table.set.binding_count(), 0);
}

// =============================================================================
// Properties
// =============================================================================

mod properties {
    use super::Table;
    use proptest::prelude::*;

    fn range() -> impl Strategy<Value = (usize, usize)> {
        (0usize..50, 1usize..20).prop_map(|(start, len)| (start, (start + len).min(60)))
    }

    proptest! {
        #[test]
        fn binding_never_loses_nodes(ranges in prop::collection::vec(range(), 1..25)) {
            let mut table = Table::new(60);
            for &(start, end) in &ranges {
                table.set(start, end, "p");
                prop_assert_eq!(table.node_count(), 60);
            }
        }

        #[test]
        fn single_offsets_always_win(
            history in prop::collection::vec(range(), 0..15),
            pos in 0usize..60,
        ) {
            let mut table = Table::new(60);
            for &(s, e) in &history {
                table.set(s, e, "noise");
            }
            let before: Vec<_> = (0..60).map(|p| table.get(p)).collect();
            table.set(pos, pos + 1, "point");
            for p in 0..60 {
                let expected = if p == pos { Some("point") } else { before[p] };
                prop_assert_eq!(table.get(p), expected);
            }
        }
    }
}
