//! Range tables per key sharing one scheduling queue.
//!
//! A [`NodeSet`] routes every node to the range table of its binding key
//! and every binding to the table of the key it names. Segments that hold
//! nodes wait in one queue ordered by [`Priority`]; the driver drains it with
//! [`NodeSet::shift`] until it runs dry.

use std::collections::HashMap;

use weft_foundation::{DomainId, SourceId, Value};
use weft_language::Span;

use crate::binding::{Binding, BindingId};
use crate::heap::{Entry, SegmentHeap, SegmentId};
use crate::node::{NodeId, NodeStore};
use crate::table::RangeTable;

// =============================================================================
// Priority
// =============================================================================

/// Scheduling priority of a segment, compared field by field, ascending.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Priority {
    /// Order value of the binding.
    pub order: Value,
    /// Key of the binding.
    pub key: Value,
    /// Scheduling rank of the binding's source.
    pub rank: u32,
    /// Source the binding range came from.
    pub source: SourceId,
    /// Start of the segment.
    pub start: usize,
    /// End of the segment.
    pub end: usize,
}

// =============================================================================
// Segment views
// =============================================================================

/// A borrowed view of a segment in a node set.
pub struct SegmentRef<'a, P> {
    heap: &'a SegmentHeap<P>,
    id: SegmentId,
}

impl<'a, P> SegmentRef<'a, P> {
    /// Returns the first offset of the segment.
    #[must_use]
    pub fn start(&self) -> usize {
        self.heap.segment(self.id).start
    }

    /// Returns the offset one past the end of the segment.
    #[must_use]
    pub fn end(&self) -> usize {
        self.heap.segment(self.id).end
    }

    /// Returns the binding of the segment.
    #[must_use]
    pub fn binding(&self) -> &'a Binding<P> {
        self.heap.segment_binding(self.id)
    }

    /// Returns the payload of the segment's binding.
    #[must_use]
    pub fn payload(&self) -> &'a P {
        self.binding().payload()
    }

    /// Returns the number of nodes held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.segment(self.id).nodes.len()
    }

    /// Returns true if the segment holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.segment(self.id).nodes.is_empty()
    }

    /// Iterates over the held nodes in offset order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + use<'a, P> {
        self.heap.segment(self.id).nodes.iter().map(|e| e.node)
    }

    /// Returns the scheduling priority of the segment.
    #[must_use]
    pub fn priority(&self) -> Priority {
        let binding = self.binding();
        Priority {
            order: binding.order().clone(),
            key: binding.key().clone(),
            rank: self.heap.rank(binding.source()),
            source: binding.source(),
            start: self.start(),
            end: self.end(),
        }
    }
}

impl<P> std::fmt::Debug for SegmentRef<'_, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentRef")
            .field("start", &self.start())
            .field("end", &self.end())
            .field("binding", &self.binding().id())
            .field("nodes", &self.len())
            .finish()
    }
}

/// A segment taken off the queue, owning its nodes.
#[derive(Clone, Debug)]
pub struct Segment<P> {
    /// Binding the segment was under.
    pub binding: BindingId,
    /// First offset of the segment.
    pub start: usize,
    /// Offset one past the end of the segment.
    pub end: usize,
    /// Source of the binding range.
    pub source: SourceId,
    /// Rank of the source when the segment was taken.
    pub rank: u32,
    /// Key of the binding.
    pub key: Value,
    /// Order of the binding.
    pub order: Value,
    /// Payload of the binding.
    pub payload: P,
    /// Nodes detached from the segment, in offset order.
    pub nodes: Vec<NodeId>,
}

impl<P> Segment<P> {
    /// Returns the priority the segment was scheduled with.
    #[must_use]
    pub fn priority(&self) -> Priority {
        Priority {
            order: self.order.clone(),
            key: self.key.clone(),
            rank: self.rank,
            source: self.source,
            start: self.start,
            end: self.end,
        }
    }
}

/// Nodes of one key that no binding covered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnboundNodes {
    /// The key the nodes were routed to.
    pub key: Value,
    /// The nodes, in offset order.
    pub nodes: Vec<NodeId>,
}

// =============================================================================
// NodeSet
// =============================================================================

/// Range tables keyed by binding key, sharing one scheduling queue.
///
/// Keys and orders must come from the interner whose domain the set was
/// created with; mixing domains panics.
#[derive(Debug)]
pub struct NodeSet<P> {
    domain: DomainId,
    tables: HashMap<Value, RangeTable>,
    heap: SegmentHeap<P>,
}

impl<P> NodeSet<P> {
    /// Creates an empty set for values of the given interner domain.
    #[must_use]
    pub fn new(domain: DomainId) -> Self {
        Self {
            domain,
            tables: HashMap::new(),
            heap: SegmentHeap::default(),
        }
    }

    /// Returns the interner domain of this set.
    #[must_use]
    pub const fn domain(&self) -> DomainId {
        self.domain
    }

    /// Adds a node to the table of its binding key.
    ///
    /// Returns false, without tracking the node, when its value has no
    /// binding key.
    ///
    /// # Panics
    ///
    /// Panics if the key belongs to another interner domain.
    pub fn add(&mut self, store: &NodeStore, node: NodeId) -> bool {
        let data = store.get(node);
        let Some(key) = data.key() else {
            return false;
        };
        self.check_domain(&key, "node key");
        let entry = Entry {
            offset: data.offset(),
            node,
        };
        self.tables.entry(key).or_default().add(&mut self.heap, entry);
        true
    }

    /// Binds `payload` over the byte range of `span` for nodes under `key`.
    ///
    /// Returns `None` for an empty range, which is ignored.
    ///
    /// # Panics
    ///
    /// Panics if `key` or `order` belongs to another interner domain.
    pub fn bind(&mut self, span: Span, key: Value, order: Value, payload: P) -> Option<BindingId> {
        self.check_domain(&key, "binding key");
        self.check_domain(&order, "binding order");
        if span.start >= span.end {
            return None;
        }
        let id = self
            .heap
            .add_binding(span.start, span.end, span.source, key.clone(), order, payload);
        self.tables.entry(key).or_default().bind(&mut self.heap, id);
        Some(id)
    }

    /// Sets the scheduling rank of `source`.
    ///
    /// Ties on order and key go to the lower rank before falling back to the
    /// source id. Sources never ranked have rank 0.
    pub fn rank_source(&mut self, source: SourceId, rank: u32) {
        self.heap.set_rank(source, rank);
    }

    /// Returns the scheduling rank of `source`.
    #[must_use]
    pub fn source_rank(&self, source: SourceId) -> u32 {
        self.heap.rank(source)
    }

    /// Returns the lowest-priority segment holding nodes, without taking it.
    ///
    /// Empty segments found at the top of the queue are dropped from it.
    pub fn peek(&mut self) -> Option<SegmentRef<'_, P>> {
        let id = self.heap.top()?;
        Some(SegmentRef {
            heap: &self.heap,
            id,
        })
    }

    /// Returns the priority of the segment [`peek`](Self::peek) would return.
    pub fn peek_priority(&mut self) -> Option<Priority> {
        self.peek().map(|seg| seg.priority())
    }

    /// Takes the lowest-priority segment holding nodes off the queue and
    /// detaches its nodes.
    ///
    /// The segment stays in its table; nodes added to its range later queue
    /// it again.
    pub fn shift(&mut self) -> Option<Segment<P>>
    where
        P: Clone,
    {
        let id = self.heap.pop()?;
        let nodes = std::mem::take(&mut self.heap.segment_mut(id).nodes);
        let seg = self.heap.segment(id);
        let binding = self.heap.binding(seg.binding);
        Some(Segment {
            binding: binding.id(),
            start: seg.start,
            end: seg.end,
            source: binding.source(),
            rank: self.heap.rank(binding.source()),
            key: binding.key().clone(),
            order: binding.order().clone(),
            payload: binding.payload().clone(),
            nodes: nodes.into_iter().map(|e| e.node).collect(),
        })
    }

    /// Removes every unbound node, grouped per key and sorted by key.
    pub fn pop_unbound(&mut self) -> Vec<UnboundNodes> {
        let mut out: Vec<UnboundNodes> = self
            .tables
            .iter_mut()
            .filter(|(_, table)| !table.unbound().is_empty())
            .map(|(key, table)| UnboundNodes {
                key: key.clone(),
                nodes: table.take_unbound().into_iter().map(|e| e.node).collect(),
            })
            .collect();
        out.sort_by(|a, b| a.key.cmp(&b.key));
        out
    }

    /// Returns the payload bound at `pos` for `key`.
    #[must_use]
    pub fn get(&self, key: &Value, pos: usize) -> Option<&P> {
        self.binding_at(key, pos).map(Binding::payload)
    }

    /// Returns the binding covering `pos` for `key`.
    #[must_use]
    pub fn binding_at(&self, key: &Value, pos: usize) -> Option<&Binding<P>> {
        self.tables.get(key)?.get(&self.heap, pos)
    }

    /// Returns a binding by id.
    ///
    /// # Panics
    ///
    /// Panics if the id was not returned by this set.
    #[must_use]
    pub fn binding(&self, id: BindingId) -> &Binding<P> {
        self.heap.binding(id)
    }

    /// Returns the number of bindings created so far.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.heap.binding_count()
    }

    /// Iterates over the segments of `key` in range order.
    pub fn segments<'a>(&'a self, key: &Value) -> impl Iterator<Item = SegmentRef<'a, P>> + use<'a, P> {
        let heap = &self.heap;
        self.tables
            .get(key)
            .into_iter()
            .flat_map(move |table| table.segments().iter().map(move |&id| SegmentRef { heap, id }))
    }

    /// Returns the unbound nodes of `key` in offset order.
    #[must_use]
    pub fn unbound(&self, key: &Value) -> Vec<NodeId> {
        self.tables
            .get(key)
            .map(|table| table.unbound().iter().map(|e| e.node).collect())
            .unwrap_or_default()
    }

    /// Returns every key with a table, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<&Value> {
        let mut keys: Vec<&Value> = self.tables.keys().collect();
        keys.sort();
        keys
    }

    /// Returns the number of queued segments that hold nodes.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.heap
            .queued()
            .iter()
            .filter(|&&id| !self.heap.segment(id).nodes.is_empty())
            .count()
    }

    /// Returns true if no queued segment holds nodes.
    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.pending() == 0
    }

    fn check_domain(&self, value: &Value, what: &str) {
        if let Some(domain) = value.domain() {
            assert!(
                domain == self.domain,
                "{what} from {domain:?} used in a node set of {:?}",
                self.domain
            );
        }
    }
}
