//! Diagnostics for nodes that no operator claimed.

use std::fmt::Write;

use thiserror::Error;

use crate::module::ModuleId;

/// A node left over after evaluation drained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedNode {
    /// Rendered node value.
    pub value: String,
    /// `name:line:column` location of the node.
    pub location: String,
}

/// All leftover nodes routed to one key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedKey {
    /// Rendered key.
    pub key: String,
    /// The leftover nodes, in offset order.
    pub nodes: Vec<UnresolvedNode>,
}

/// A module finished evaluation with nodes no binding ever covered.
///
/// This is a diagnostic, not a failure of the run: evaluation drains
/// completely before these are collected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("module `{name}` has unprocessed nodes:{}", render(.entries))]
pub struct Unresolved {
    /// The module the nodes belong to.
    pub module: ModuleId,
    /// Source name of the module.
    pub name: String,
    /// Leftovers per key, sorted by key.
    pub entries: Vec<UnresolvedKey>,
}

impl Unresolved {
    /// Returns the total number of leftover nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.nodes.len()).sum()
    }
}

fn render(entries: &[UnresolvedKey]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = write!(out, "\n\n=> Key {}:\n", entry.key);
        for node in &entry.nodes {
            let _ = write!(out, "\n-> {} -- {}", node.value, node.location);
        }
    }
    out
}
