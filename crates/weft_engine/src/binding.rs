//! Immutable range bindings.

use std::fmt;

use weft_foundation::{SourceId, Value};

/// Identity of a [`Binding`].
///
/// Two segments belong to the same binding exactly when their ids are equal;
/// this is what decides whether adjacent segments merge.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub(crate) u32);

impl BindingId {
    /// Returns the arena index of this binding.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BindingId({})", self.0)
    }
}

/// Assignment of a payload to the half-open byte range `[start, end)` under a
/// key and a scheduling order.
///
/// Bindings are never edited: rebinding a range creates a new binding and
/// rewrites the affected segments.
#[derive(Clone, Debug)]
pub struct Binding<P> {
    pub(crate) id: BindingId,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) source: SourceId,
    pub(crate) key: Value,
    pub(crate) order: Value,
    pub(crate) payload: P,
}

impl<P> Binding<P> {
    /// Returns the identity of this binding.
    #[must_use]
    pub const fn id(&self) -> BindingId {
        self.id
    }

    /// Returns the first covered offset.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Returns the offset one past the last covered offset.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Returns the source the range was taken from.
    #[must_use]
    pub const fn source(&self) -> SourceId {
        self.source
    }

    /// Returns the key this binding applies to.
    #[must_use]
    pub const fn key(&self) -> &Value {
        &self.key
    }

    /// Returns the scheduling order.
    #[must_use]
    pub const fn order(&self) -> &Value {
        &self.order
    }

    /// Returns the bound payload.
    #[must_use]
    pub const fn payload(&self) -> &P {
        &self.payload
    }

    /// Returns true if `other`'s range lies within this binding's range.
    #[must_use]
    pub const fn contains<Q>(&self, other: &Binding<Q>) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns true if the two ranges share at least one offset.
    #[must_use]
    pub const fn intersects<Q>(&self, other: &Binding<Q>) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns true if this binding takes precedence over `existing` where
    /// they overlap.
    ///
    /// A narrower binding always wins. On a partial overlap the newer binding
    /// wins, so callers must pass the binding being applied as `self`.
    #[must_use]
    pub const fn overrides<Q>(&self, existing: &Binding<Q>) -> bool {
        existing.contains(self) || (self.intersects(existing) && !self.contains(existing))
    }
}
