//! Modules: one loaded source with its nodes and scheduling state.

use std::fmt;

use weft_engine::{NodeList, NodeSet, NodeStore};
use weft_foundation::{DomainId, Interner, SourceId};
use weft_language::Lexer;

use crate::operator::OperatorRef;

/// Identifier of a module within a [`Program`](crate::Program).
///
/// Modules are numbered from 1 in load order. An id also carries the
/// interner domain of its program, so ids from another program never
/// resolve.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId {
    pub(crate) domain: DomainId,
    pub(crate) number: u32,
}

impl ModuleId {
    pub(crate) const fn new(domain: DomainId, number: u32) -> Self {
        Self { domain, number }
    }

    /// Returns the module number.
    #[must_use]
    pub const fn number(self) -> u32 {
        self.number
    }

    /// Returns the domain of the program that created the module.
    #[must_use]
    pub const fn domain(self) -> DomainId {
        self.domain
    }

    pub(crate) const fn index(self) -> usize {
        (self.number - 1) as usize
    }
}

impl fmt::Debug for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModuleId({})", self.number)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module#{}", self.number)
    }
}

/// A loaded source together with the nodes produced from it.
///
/// Each module owns a copy of the program lexer taken at load time, so
/// operators may extend the symbol set of one module without affecting
/// the others.
pub struct Module {
    pub(crate) id: ModuleId,
    pub(crate) name: String,
    pub(crate) source: SourceId,
    pub(crate) lexer: Lexer,
    pub(crate) list: NodeList,
    pub(crate) nodes: NodeSet<OperatorRef>,
    pub(crate) initialized: bool,
    pub(crate) rank: u32,
}

impl Module {
    /// Returns the module id.
    #[must_use]
    pub const fn id(&self) -> ModuleId {
        self.id
    }

    /// Returns the source name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the source the module was created from.
    #[must_use]
    pub const fn source(&self) -> SourceId {
        self.source
    }

    /// Returns the module lexer.
    #[must_use]
    pub const fn lexer(&self) -> &Lexer {
        &self.lexer
    }

    /// Returns the main node list: every node added to the module, in
    /// insertion order.
    #[must_use]
    pub const fn list(&self) -> &NodeList {
        &self.list
    }

    /// Returns the scheduling state of the module.
    #[must_use]
    pub const fn nodes(&self) -> &NodeSet<OperatorRef> {
        &self.nodes
    }

    /// Returns true once the module has received its source node.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the scheduling rank given at initialization, or 0 before.
    ///
    /// Ranks follow source name, then load order, and break ties between
    /// segments of equal order and key.
    #[must_use]
    pub const fn rank(&self) -> u32 {
        self.rank
    }

    /// Renders the module and its main node list, resolving interned names.
    #[must_use]
    pub fn dump<'a>(&'a self, store: &'a NodeStore, interner: &'a Interner) -> ModuleDump<'a> {
        ModuleDump {
            module: self,
            store,
            interner,
        }
    }
}

/// Display wrapper produced by [`Module::dump`].
///
/// Renders as ``module `name` [v1, v2]``.
pub struct ModuleDump<'a> {
    module: &'a Module,
    store: &'a NodeStore,
    interner: &'a Interner,
}

impl fmt::Display for ModuleDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module `{}` [", self.module.name)?;
        for (i, node) in self.module.list.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", self.store.value(node).display(self.interner))?;
        }
        write!(f, "]")
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("source", &self.source)
            .field("nodes", &self.list.len())
            .field("pending", &self.nodes.pending())
            .field("initialized", &self.initialized)
            .field("rank", &self.rank)
            .finish_non_exhaustive()
    }
}
