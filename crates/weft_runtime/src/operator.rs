//! Operators and the context they run in.
//!
//! An operator is the payload of a binding. When the driver shifts a
//! segment it hands the segment's nodes to the bound operator, which may
//! add further nodes and bindings through the [`EvalContext`].

use std::fmt;
use std::sync::Arc;

use weft_engine::{BindingId, Node, NodeId, NodeStore, Segment};
use weft_foundation::{Error, ErrorKind, Interner, Result, Value};
use weft_language::{Lexer, Source, SourceMap, Span};

use crate::module::{Module, ModuleId};

// =============================================================================
// Operator
// =============================================================================

/// Processes the nodes of a shifted segment.
pub trait Operator: Send + Sync {
    /// Returns the name used in traces and error contexts.
    fn name(&self) -> &str;

    /// Applies the operator to a segment taken off the queue.
    ///
    /// # Errors
    ///
    /// Any error aborts the evaluation it was raised in.
    fn apply(&self, ctx: &mut EvalContext<'_>, segment: Segment<OperatorRef>) -> Result<()>;
}

/// Shared handle to an operator, stored as a binding payload.
pub type OperatorRef = Arc<dyn Operator>;

/// An operator backed by a closure.
pub struct FnOperator<F> {
    name: String,
    func: F,
}

impl<F> Operator for FnOperator<F>
where
    F: Fn(&mut EvalContext<'_>, Segment<OperatorRef>) -> Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, ctx: &mut EvalContext<'_>, segment: Segment<OperatorRef>) -> Result<()> {
        (self.func)(ctx, segment)
    }
}

impl<F> fmt::Debug for FnOperator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOperator").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Wraps a closure as a shareable operator.
pub fn operator<F>(name: impl Into<String>, func: F) -> OperatorRef
where
    F: Fn(&mut EvalContext<'_>, Segment<OperatorRef>) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(FnOperator {
        name: name.into(),
        func,
    })
}

// =============================================================================
// Evaluation Context
// =============================================================================

/// Mutable view of a program handed to an operator.
///
/// The context is scoped to the module the segment was shifted from;
/// the `*_in`/`*_to` variants reach other modules of the same program.
pub struct EvalContext<'a> {
    pub(crate) module: ModuleId,
    pub(crate) modules: &'a mut [Module],
    pub(crate) store: &'a mut NodeStore,
    pub(crate) interner: &'a mut Interner,
    pub(crate) sources: &'a SourceMap,
    pub(crate) step: usize,
}

impl<'a> EvalContext<'a> {
    /// Returns the id of the current module.
    #[must_use]
    pub const fn module_id(&self) -> ModuleId {
        self.module
    }

    /// Returns the current module.
    #[must_use]
    pub fn module(&self) -> &Module {
        &self.modules[self.module.index()]
    }

    /// Returns the evaluation step this operator runs in, counted from 1.
    #[must_use]
    pub const fn step(&self) -> usize {
        self.step
    }

    /// Returns the source of the current module.
    #[must_use]
    pub fn source(&self) -> &'a Source {
        self.sources.source(self.module().source)
    }

    /// Returns all loaded sources.
    #[must_use]
    pub const fn sources(&self) -> &'a SourceMap {
        self.sources
    }

    /// Returns the program interner.
    #[must_use]
    pub fn interner(&self) -> &Interner {
        &*self.interner
    }

    /// Returns the program interner for interning new names.
    pub fn interner_mut(&mut self) -> &mut Interner {
        &mut *self.interner
    }

    /// Returns the node store.
    #[must_use]
    pub fn store(&self) -> &NodeStore {
        &*self.store
    }

    /// Returns a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        self.store.get(id)
    }

    /// Returns the lexer of the current module.
    #[must_use]
    pub fn lexer(&self) -> &Lexer {
        &self.module().lexer
    }

    /// Returns the lexer of the current module for adding symbols.
    pub fn lexer_mut(&mut self) -> &mut Lexer {
        &mut self.modules[self.module.index()].lexer
    }

    /// Creates a node, appends it to the current module's main list and
    /// schedules it.
    pub fn add_node(&mut self, value: Value, span: Span) -> NodeId {
        let module = &mut self.modules[self.module.index()];
        Self::add_to(module, self.store, value, span)
    }

    /// Like [`add_node`](Self::add_node), for another module.
    ///
    /// # Errors
    ///
    /// Returns `UnknownModule` if `module` does not belong to this program.
    pub fn add_node_to(&mut self, module: ModuleId, value: Value, span: Span) -> Result<NodeId> {
        let module = lookup(self.modules, module)?;
        Ok(Self::add_to(module, self.store, value, span))
    }

    /// Binds `op` over `span` for nodes under `key` in the current module.
    ///
    /// Returns `None` for an empty span.
    ///
    /// # Panics
    ///
    /// Panics if `key` or `order` was interned by another interner.
    pub fn bind(&mut self, span: Span, key: Value, order: Value, op: OperatorRef) -> Option<BindingId> {
        self.modules[self.module.index()].nodes.bind(span, key, order, op)
    }

    /// Like [`bind`](Self::bind), for another module.
    ///
    /// # Errors
    ///
    /// Returns `UnknownModule` if `module` does not belong to this program.
    pub fn bind_in(
        &mut self,
        module: ModuleId,
        span: Span,
        key: Value,
        order: Value,
        op: OperatorRef,
    ) -> Result<Option<BindingId>> {
        let module = lookup(self.modules, module)?;
        Ok(module.nodes.bind(span, key, order, op))
    }

    fn add_to(module: &mut Module, store: &mut NodeStore, value: Value, span: Span) -> NodeId {
        let id = store.insert(value, span);
        module.list.add(store, [id]);
        module.nodes.add(store, id);
        id
    }
}

/// Resolves a module id, rejecting ids of other programs.
pub(crate) fn lookup(modules: &mut [Module], id: ModuleId) -> Result<&mut Module> {
    id.number()
        .checked_sub(1)
        .and_then(|index| modules.get_mut(index as usize))
        .filter(|module| module.id == id)
        .ok_or_else(|| Error::new(ErrorKind::UnknownModule(id.number())))
}
