//! Per-key interval partition of bound segments plus the unbound pool.
//!
//! A [`RangeTable`] keeps its segments sorted and pairwise disjoint; no two
//! range-adjacent segments share a binding. Offsets not covered by any
//! segment are unbound, and nodes at those offsets wait in the unbound pool
//! until a binding covers them. Every node added to the table sits in
//! exactly one segment or in the pool.

use crate::binding::{Binding, BindingId};
use crate::heap::{Entry, SegmentHeap, SegmentId, extract_entries, insert_entry};

/// Segments and unbound nodes for one binding key.
#[derive(Debug, Default)]
pub(crate) struct RangeTable {
    segments: Vec<SegmentId>,
    unbound: Vec<Entry>,
}

impl RangeTable {
    /// Returns the segments in range order.
    pub fn segments(&self) -> &[SegmentId] {
        &self.segments
    }

    /// Returns the unbound nodes in offset order.
    pub fn unbound(&self) -> &[Entry] {
        &self.unbound
    }

    /// Removes and returns the unbound nodes.
    pub fn take_unbound(&mut self) -> Vec<Entry> {
        std::mem::take(&mut self.unbound)
    }

    /// Returns the index of the segment covering `pos`.
    fn locate<P>(&self, heap: &SegmentHeap<P>, pos: usize) -> Option<usize> {
        let idx = self.segments.partition_point(|&s| heap.segment(s).end <= pos);
        let seg = *self.segments.get(idx)?;
        (heap.segment(seg).start <= pos).then_some(idx)
    }

    /// Returns the binding covering `pos`.
    pub fn get<'a, P>(&self, heap: &'a SegmentHeap<P>, pos: usize) -> Option<&'a Binding<P>> {
        self.locate(heap, pos)
            .map(|idx| heap.segment_binding(self.segments[idx]))
    }

    /// Places a node into the segment covering its offset, queueing that
    /// segment, or into the unbound pool.
    pub fn add<P>(&mut self, heap: &mut SegmentHeap<P>, entry: Entry) {
        if let Some(idx) = self.locate(heap, entry.offset) {
            let seg = self.segments[idx];
            insert_entry(&mut heap.segment_mut(seg).nodes, entry);
            heap.ensure_queued(seg);
        } else {
            insert_entry(&mut self.unbound, entry);
        }
    }

    /// Applies a binding over its range.
    ///
    /// Existing segments the binding overrides are re-tagged, split at the
    /// binding's boundaries when they stick out; segments it does not
    /// override are kept. Gaps inside the range become new segments that
    /// collect the matching unbound nodes. Empty ranges are ignored.
    pub fn bind<P>(&mut self, heap: &mut SegmentHeap<P>, binding: BindingId) {
        let (start, end) = {
            let b = heap.binding(binding);
            (b.start(), b.end())
        };
        if start >= end {
            return;
        }

        let first = self.segments.partition_point(|&s| heap.segment(s).end <= start);
        let last = first + self.segments[first..].partition_point(|&s| heap.segment(s).start < end);
        let post = self.segments.split_off(last);
        let mid: Vec<SegmentId> = self.segments.drain(first..).collect();

        let mut cursor = start;
        for mut seg in mid {
            let seg_start = heap.segment(seg).start;
            if seg_start > cursor {
                self.push_new(heap, cursor, seg_start, binding);
                cursor = seg_start;
            }

            let existing = heap.segment(seg).binding;
            if heap.binding(binding).overrides(heap.binding(existing)) {
                if seg_start < cursor {
                    seg = self.push(heap, seg);
                    seg = heap.split_off(seg, cursor);
                }

                heap.segment_mut(seg).binding = binding;
                seg = self.push(heap, seg);

                if end < heap.segment(seg).end {
                    let rest = heap.split_off(seg, end);
                    heap.segment_mut(rest).binding = existing;
                    self.push(heap, rest);
                }
            } else {
                seg = self.push(heap, seg);
            }
            cursor = heap.segment(seg).end;
        }

        if cursor < end {
            self.push_new(heap, cursor, end, binding);
        }

        // Every binding id differs from the old neighbours of `post[0]`, so
        // the junction never needs a merge.
        debug_assert!(match (self.segments.last(), post.first()) {
            (Some(&prev), Some(&next)) => {
                let (prev, next) = (heap.segment(prev), heap.segment(next));
                prev.end != next.start || prev.binding != next.binding
            }
            _ => true,
        });
        self.segments.extend(post);
    }

    /// Creates a segment over a former gap, pulling in its unbound nodes.
    fn push_new<P>(&mut self, heap: &mut SegmentHeap<P>, start: usize, end: usize, binding: BindingId) {
        let nodes = extract_entries(&mut self.unbound, start, end);
        let seg = heap.alloc(start, end, binding, nodes);
        self.push(heap, seg);
    }

    /// Appends a segment, merging it into the last one when they are
    /// adjacent and share a binding. Returns the segment now holding the
    /// range.
    fn push<P>(&mut self, heap: &mut SegmentHeap<P>, seg: SegmentId) -> SegmentId {
        if let Some(&last) = self.segments.last() {
            let (prev, next) = (heap.segment(last), heap.segment(seg));
            if prev.binding == next.binding && prev.end == next.start {
                heap.merge(last, seg);
                return last;
            }
        }
        self.segments.push(seg);
        heap.update(seg);
        seg
    }
}
