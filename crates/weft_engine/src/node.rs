//! Positional nodes and the lists that own them.
//!
//! Nodes live in a [`NodeStore`] arena and are referenced by [`NodeId`].
//! A [`NodeList`] owns an ordered sequence of node ids and keeps every
//! contained node's back-reference (`owner`) in sync: for a contained node,
//! `list.get(node.owner().index) == node` always holds.

use std::collections::HashSet;
use std::fmt;

use weft_foundation::{KeyExtractable, Value};
use weft_language::Span;

// =============================================================================
// Ids
// =============================================================================

/// Handle to a node in a [`NodeStore`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Returns the arena index of this node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Identity of a [`NodeList`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListId(u32);

/// Back-reference from a node to the list containing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Owner {
    /// The containing list.
    pub list: ListId,
    /// Position of the node in that list.
    pub index: usize,
}

// =============================================================================
// Node
// =============================================================================

/// A value at a position in the source.
#[derive(Clone, Debug)]
pub struct Node {
    value: Value,
    span: Span,
    owner: Option<Owner>,
}

impl Node {
    /// Returns the value carried by this node.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the source span of this node.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Returns the byte offset used to place this node in ranges.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.span.start
    }

    /// Returns the list containing this node, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<Owner> {
        self.owner
    }

    /// Returns the key this node is scheduled under, if any.
    #[must_use]
    pub fn key(&self) -> Option<Value> {
        self.value.binding_key()
    }
}

/// Arena owning every node of a program.
#[derive(Clone, Debug, Default)]
pub struct NodeStore {
    nodes: Vec<Node>,
    next_list: u32,
}

impl NodeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a detached node.
    ///
    /// # Panics
    ///
    /// Panics if the store already holds `u32::MAX` nodes.
    pub fn insert(&mut self, value: Value, span: Span) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).expect("too many nodes"));
        self.nodes.push(Node {
            value,
            span,
            owner: None,
        });
        id
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this store.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Returns the value of a node.
    #[must_use]
    pub fn value(&self, id: NodeId) -> &Value {
        self.get(id).value()
    }

    /// Returns the offset of a node.
    #[must_use]
    pub fn offset(&self, id: NodeId) -> usize {
        self.get(id).offset()
    }

    /// Returns the scheduling key of a node.
    #[must_use]
    pub fn key(&self, id: NodeId) -> Option<Value> {
        self.get(id).key()
    }

    /// Returns the number of nodes ever inserted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no node was ever inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Creates a new empty list.
    pub fn new_list(&mut self) -> NodeList {
        let id = ListId(self.next_list);
        self.next_list += 1;
        NodeList {
            id,
            nodes: Vec::new(),
        }
    }

    fn set_owner(&mut self, id: NodeId, owner: Option<Owner>) {
        self.nodes[id.index()].owner = owner;
    }
}

// =============================================================================
// NodeList
// =============================================================================

/// An ordered list of nodes with exclusive ownership.
///
/// A node belongs to at most one list at a time. Every mutation re-stamps
/// the back-references of the nodes from the mutation point onward.
/// Out-of-range indices and adding a node that is already owned panic.
///
/// Dropping a list does not detach its nodes; call [`NodeList::clear`] to
/// hand them back to the store.
#[derive(Debug)]
pub struct NodeList {
    id: ListId,
    nodes: Vec<NodeId>,
}

impl NodeList {
    /// Returns the identity of this list.
    #[must_use]
    pub const fn id(&self) -> ListId {
        self.id
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> NodeId {
        self.nodes[index]
    }

    /// Returns the nodes as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Iterates over the nodes in order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Appends nodes at the end.
    pub fn add(&mut self, store: &mut NodeStore, nodes: impl IntoIterator<Item = NodeId>) {
        let at = self.nodes.len();
        self.insert(store, at, nodes);
    }

    /// Inserts nodes before `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at > len()`, a node already belongs to a list, or the
    /// same node appears twice in `nodes`.
    pub fn insert(
        &mut self,
        store: &mut NodeStore,
        at: usize,
        nodes: impl IntoIterator<Item = NodeId>,
    ) {
        assert!(at <= self.nodes.len(), "insert index {at} out of range");
        let nodes: Vec<NodeId> = nodes.into_iter().collect();
        let mut seen = HashSet::with_capacity(nodes.len());
        for &node in &nodes {
            if let Some(owner) = store.get(node).owner() {
                panic!("{node:?} already belongs to {:?}", owner.list);
            }
            if !seen.insert(node) {
                panic!("{node:?} already belongs to {:?}", self.id);
            }
        }
        self.nodes.splice(at..at, nodes);
        self.restamp(store, at);
    }

    /// Removes and returns the node at `index`, detaching it.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn remove(&mut self, store: &mut NodeStore, index: usize) -> NodeId {
        let node = self.nodes.remove(index);
        store.set_owner(node, None);
        self.restamp(store, index);
        node
    }

    /// Moves the nodes in `[index, len)` into a new list.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    #[must_use]
    pub fn split_at(&mut self, store: &mut NodeStore, index: usize) -> NodeList {
        let end = self.nodes.len();
        self.extract(store, index, end)
    }

    /// Moves the nodes in `[start, end)` into a new list.
    ///
    /// # Panics
    ///
    /// Panics if the range is inverted or out of range.
    #[must_use]
    pub fn extract(&mut self, store: &mut NodeStore, start: usize, end: usize) -> NodeList {
        assert!(
            start <= end && end <= self.nodes.len(),
            "extract range {start}..{end} out of range"
        );
        let mut list = store.new_list();
        list.nodes = self.nodes.drain(start..end).collect();
        list.restamp(store, 0);
        self.restamp(store, start);
        list
    }

    /// Detaches every node and returns them in order.
    ///
    /// The returned nodes have no owner and may be added to another list.
    pub fn clear(&mut self, store: &mut NodeStore) -> Vec<NodeId> {
        let nodes = std::mem::take(&mut self.nodes);
        for &node in &nodes {
            store.set_owner(node, None);
        }
        nodes
    }

    /// Returns the node after `node` in this list.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not in this list.
    #[must_use]
    pub fn next(&self, store: &NodeStore, node: NodeId) -> Option<NodeId> {
        let index = self.index_of(store, node);
        self.nodes.get(index + 1).copied()
    }

    /// Returns the node before `node` in this list.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not in this list.
    #[must_use]
    pub fn prev(&self, store: &NodeStore, node: NodeId) -> Option<NodeId> {
        let index = self.index_of(store, node);
        index.checked_sub(1).map(|i| self.nodes[i])
    }

    fn index_of(&self, store: &NodeStore, node: NodeId) -> usize {
        match store.get(node).owner() {
            Some(owner) if owner.list == self.id => owner.index,
            _ => panic!("{node:?} is not in {:?}", self.id),
        }
    }

    fn restamp(&self, store: &mut NodeStore, from: usize) {
        for (index, &node) in self.nodes.iter().enumerate().skip(from) {
            store.set_owner(
                node,
                Some(Owner {
                    list: self.id,
                    index,
                }),
            );
        }
    }
}
