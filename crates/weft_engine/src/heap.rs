//! Segment arena and the scheduling heap over it.
//!
//! Segments of every range table of a node set live in one arena and are
//! referenced by [`SegmentId`]. The queue is a binary min-heap of segment ids
//! with a position index per segment, so a segment can be re-sifted or
//! removed in `O(log n)` when its binding or range changes.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use weft_foundation::{SourceId, Value};

use crate::binding::{Binding, BindingId};
use crate::node::NodeId;

/// Position of a segment that is not in the queue.
const NOT_QUEUED: usize = usize::MAX;

/// Handle to a segment in the arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentId(u32);

impl SegmentId {
    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SegmentId({})", self.0)
    }
}

/// A node held by a segment or an unbound pool, with its offset cached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Entry {
    pub offset: usize,
    pub node: NodeId,
}

/// Inserts an entry after every entry with an offset not greater than its own.
pub(crate) fn insert_entry(entries: &mut Vec<Entry>, entry: Entry) {
    if entries.last().is_none_or(|last| last.offset <= entry.offset) {
        entries.push(entry);
    } else {
        let at = entries.partition_point(|e| e.offset <= entry.offset);
        entries.insert(at, entry);
    }
}

/// Removes and returns the entries with offsets in `[start, end)`.
pub(crate) fn extract_entries(entries: &mut Vec<Entry>, start: usize, end: usize) -> Vec<Entry> {
    let lo = entries.partition_point(|e| e.offset < start);
    let hi = lo + entries[lo..].partition_point(|e| e.offset < end);
    entries.drain(lo..hi).collect()
}

#[derive(Debug)]
pub(crate) struct SegmentData {
    pub start: usize,
    pub end: usize,
    pub binding: BindingId,
    pub nodes: Vec<Entry>,
}

/// Arena of bindings and segments plus the priority queue over segments.
#[derive(Debug)]
pub(crate) struct SegmentHeap<P> {
    bindings: Vec<Binding<P>>,
    segments: Vec<SegmentData>,
    positions: Vec<usize>,
    free: Vec<SegmentId>,
    queue: Vec<SegmentId>,
    ranks: HashMap<SourceId, u32>,
}

impl<P> Default for SegmentHeap<P> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
            segments: Vec::new(),
            positions: Vec::new(),
            free: Vec::new(),
            queue: Vec::new(),
            ranks: HashMap::new(),
        }
    }
}

impl<P> SegmentHeap<P> {
    // -------------------------------------------------------------------------
    // Arena
    // -------------------------------------------------------------------------

    pub fn add_binding(
        &mut self,
        start: usize,
        end: usize,
        source: SourceId,
        key: Value,
        order: Value,
        payload: P,
    ) -> BindingId {
        let id = BindingId(u32::try_from(self.bindings.len()).expect("too many bindings"));
        self.bindings.push(Binding {
            id,
            start,
            end,
            source,
            key,
            order,
            payload,
        });
        id
    }

    pub fn binding(&self, id: BindingId) -> &Binding<P> {
        &self.bindings[id.index()]
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn segment(&self, id: SegmentId) -> &SegmentData {
        &self.segments[id.index()]
    }

    pub fn segment_mut(&mut self, id: SegmentId) -> &mut SegmentData {
        &mut self.segments[id.index()]
    }

    pub fn segment_binding(&self, id: SegmentId) -> &Binding<P> {
        self.binding(self.segment(id).binding)
    }

    pub fn alloc(&mut self, start: usize, end: usize, binding: BindingId, nodes: Vec<Entry>) -> SegmentId {
        let data = SegmentData {
            start,
            end,
            binding,
            nodes,
        };
        if let Some(id) = self.free.pop() {
            self.segments[id.index()] = data;
            id
        } else {
            let id = SegmentId(u32::try_from(self.segments.len()).expect("too many segments"));
            self.segments.push(data);
            self.positions.push(NOT_QUEUED);
            id
        }
    }

    /// Splits a segment at `at`, keeping `[start, at)` in place and returning
    /// a new unqueued segment for `[at, end)` with the same binding.
    ///
    /// # Panics
    ///
    /// Panics unless `at` is strictly inside the segment.
    pub fn split_off(&mut self, id: SegmentId, at: usize) -> SegmentId {
        let seg = self.segment_mut(id);
        assert!(
            seg.start < at && at < seg.end,
            "splitting segment {}..{} at {at}, which is not strictly inside",
            seg.start,
            seg.end
        );
        let idx = seg.nodes.partition_point(|e| e.offset < at);
        let rhs = seg.nodes.split_off(idx);
        let (end, binding) = (seg.end, seg.binding);
        seg.end = at;
        let new = self.alloc(at, end, binding, rhs);
        self.update(id);
        new
    }

    /// Appends `other` to `into` and frees `other`.
    ///
    /// The two segments must be range-adjacent and share a binding.
    pub fn merge(&mut self, into: SegmentId, other: SegmentId) {
        self.remove(other);
        let data = std::mem::replace(
            self.segment_mut(other),
            SegmentData {
                start: 0,
                end: 0,
                binding: BindingId(0),
                nodes: Vec::new(),
            },
        );
        let target = self.segment_mut(into);
        debug_assert_eq!(target.end, data.start);
        debug_assert_eq!(target.binding, data.binding);
        target.end = data.end;
        target.nodes.extend(data.nodes);
        self.free.push(other);
        self.update(into);
    }

    // -------------------------------------------------------------------------
    // Queue
    // -------------------------------------------------------------------------

    pub fn is_queued(&self, id: SegmentId) -> bool {
        self.positions[id.index()] != NOT_QUEUED
    }

    /// Queues a segment holding nodes that is not queued yet.
    pub fn ensure_queued(&mut self, id: SegmentId) {
        if !self.is_queued(id) && !self.segment(id).nodes.is_empty() {
            self.push(id);
        }
    }

    /// Restores the queue after the priority of a segment changed, queueing
    /// it if it holds nodes.
    pub fn update(&mut self, id: SegmentId) {
        let pos = self.positions[id.index()];
        if pos == NOT_QUEUED {
            self.ensure_queued(id);
        } else {
            self.fix(pos);
        }
    }

    /// Removes a segment from the queue if it is queued.
    pub fn remove(&mut self, id: SegmentId) {
        let pos = self.positions[id.index()];
        if pos != NOT_QUEUED {
            self.remove_at(pos);
        }
    }

    /// Returns the lowest non-empty segment, discarding empty ones on top.
    pub fn top(&mut self) -> Option<SegmentId> {
        while let Some(&id) = self.queue.first() {
            if !self.segment(id).nodes.is_empty() {
                return Some(id);
            }
            self.remove_at(0);
        }
        None
    }

    /// Removes and returns the lowest non-empty segment.
    pub fn pop(&mut self) -> Option<SegmentId> {
        let id = self.top()?;
        self.remove_at(0);
        Some(id)
    }

    /// Returns the scheduling rank of a source; unranked sources rank 0.
    pub fn rank(&self, source: SourceId) -> u32 {
        self.ranks.get(&source).copied().unwrap_or(0)
    }

    /// Sets the scheduling rank of a source and restores the queue order.
    pub fn set_rank(&mut self, source: SourceId, rank: u32) {
        if self.ranks.insert(source, rank) == Some(rank) {
            return;
        }
        for pos in (0..self.queue.len() / 2).rev() {
            self.down(pos);
        }
    }

    /// Returns queued segments, in no particular order.
    pub fn queued(&self) -> &[SegmentId] {
        &self.queue
    }

    /// Compares two segments by `(order, key, rank, source, start, end)`.
    pub fn compare(&self, a: SegmentId, b: SegmentId) -> Ordering {
        let (sa, sb) = (self.segment(a), self.segment(b));
        let (ba, bb) = (self.binding(sa.binding), self.binding(sb.binding));
        (&ba.order, &ba.key, self.rank(ba.source), ba.source, sa.start, sa.end).cmp(&(
            &bb.order,
            &bb.key,
            self.rank(bb.source),
            bb.source,
            sb.start,
            sb.end,
        ))
    }

    fn push(&mut self, id: SegmentId) {
        let pos = self.queue.len();
        self.queue.push(id);
        self.positions[id.index()] = pos;
        self.up(pos);
    }

    fn remove_at(&mut self, pos: usize) {
        let last = self.queue.len() - 1;
        if pos != last {
            self.swap(pos, last);
        }
        if let Some(id) = self.queue.pop() {
            self.positions[id.index()] = NOT_QUEUED;
        }
        if pos < self.queue.len() {
            self.fix(pos);
        }
    }

    fn less(&self, i: usize, j: usize) -> bool {
        self.compare(self.queue[i], self.queue[j]) == Ordering::Less
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.queue.swap(i, j);
        self.positions[self.queue[i].index()] = i;
        self.positions[self.queue[j].index()] = j;
    }

    fn fix(&mut self, pos: usize) {
        if !self.down(pos) {
            self.up(pos);
        }
    }

    fn up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.less(pos, parent) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn down(&mut self, start: usize) -> bool {
        let len = self.queue.len();
        let mut pos = start;
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let mut child = left;
            if left + 1 < len && self.less(left + 1, left) {
                child = left + 1;
            }
            if !self.less(child, pos) {
                break;
            }
            self.swap(pos, child);
            pos = child;
        }
        pos > start
    }
}
