//! Node lists, range bindings, and segment scheduling for Weft.
//!
//! This crate provides:
//! - [`NodeStore`] / [`NodeList`] - Positional nodes with owner back-references
//! - [`Binding`] - Immutable assignment of a payload to a byte range
//! - [`NodeSet`] - Per-key range tables sharing one scheduling queue
//! - [`Segment`] / [`Priority`] - What the queue hands to the driver
//!
//! The engine never logs and never returns errors: contract violations
//! (non-interior splits, foreign interner domains, out-of-range list
//! indices) panic.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod binding;
mod heap;
pub mod node;
pub mod node_set;
mod table;

pub use binding::{Binding, BindingId};
pub use heap::SegmentId;
pub use node::{ListId, Node, NodeId, NodeList, NodeStore, Owner};
pub use node_set::{NodeSet, Priority, Segment, SegmentRef, UnboundNodes};
