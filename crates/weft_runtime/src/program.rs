//! The program driver: module loading and the evaluation loop.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use weft_engine::{NodeId, NodeSet, NodeStore, Priority, Segment};
use weft_foundation::{Error, ErrorContext, Interner, Result, SemanticLimit, SourceId, Value};
use weft_language::{Lexer, SourceMap};

use crate::config::EvalConfig;
use crate::diagnostic::{Unresolved, UnresolvedKey, UnresolvedNode};
use crate::module::{Module, ModuleId};
use crate::operator::{EvalContext, OperatorRef};
use crate::trace::{TraceEvent, Tracer};

/// Outcome of one [`Program::evaluate`] call.
#[derive(Clone, Debug, Default)]
pub struct EvalReport {
    /// Number of segments applied.
    pub steps: usize,
    /// Modules left with unclaimed nodes.
    pub unresolved: Vec<Unresolved>,
}

impl EvalReport {
    /// Returns true if every node was claimed by some operator.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty()
    }
}

struct Global {
    key: Value,
    order: Value,
    op: OperatorRef,
}

// =============================================================================
// Program
// =============================================================================

/// Owns every loaded module and drives evaluation to a fixed point.
///
/// Global bindings registered with [`bind_global`](Self::bind_global) are
/// applied over the whole source of every module created afterwards. The
/// first evaluation of a module adds a single node holding the source
/// itself; operators bound to the source type take it from there.
pub struct Program {
    config: EvalConfig,
    interner: Interner,
    sources: SourceMap,
    store: NodeStore,
    modules: Vec<Module>,
    by_source: HashMap<SourceId, ModuleId>,
    globals: Vec<Global>,
    lexer: Lexer,
    tracer: Tracer,
    errors: Vec<Unresolved>,
    steps: usize,
    ranked: u32,
}

impl Program {
    /// Creates an empty program.
    #[must_use]
    pub fn new(config: EvalConfig) -> Self {
        let sources = SourceMap::new()
            .with_base_path(config.base_path.clone())
            .with_tab_width(config.tab_width);
        let tracer = Tracer::new(config.trace.clone());
        Self {
            config,
            interner: Interner::new(),
            sources,
            store: NodeStore::new(),
            modules: Vec::new(),
            by_source: HashMap::new(),
            globals: Vec::new(),
            lexer: Lexer::new(),
            tracer,
            errors: Vec::new(),
            steps: 0,
            ranked: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Setup
    // -------------------------------------------------------------------------

    /// Registers `op` for every node under `key` in modules created from
    /// now on. A later registration for the same key replaces this one.
    ///
    /// # Panics
    ///
    /// Panics at module creation if `key` or `order` was interned by another
    /// interner than [`interner_mut`](Self::interner_mut).
    pub fn bind_global(&mut self, key: Value, order: Value, op: OperatorRef) {
        self.tracer.record_with(|| TraceEvent::GlobalBound {
            key: key.display(&self.interner).to_string(),
            operator: op.name().to_string(),
        });
        let global = Global { key, order, op };
        match self.globals.iter_mut().find(|g| g.key == global.key) {
            Some(existing) => *existing = global,
            None => self.globals.push(global),
        }
    }

    /// Returns the lexer modules are created with.
    #[must_use]
    pub const fn lexer(&self) -> &Lexer {
        &self.lexer
    }

    /// Returns the lexer modules are created with, for adding symbols.
    pub fn lexer_mut(&mut self) -> &mut Lexer {
        &mut self.lexer
    }

    /// Loads an in-memory source as a new module.
    pub fn load_string(&mut self, name: impl Into<String>, text: impl Into<Arc<str>>) -> ModuleId {
        let source = self.sources.load_string(name, text);
        self.create_module(source)
    }

    /// Loads a file, relative to the configured base path, as a module.
    ///
    /// Loading the same file again returns the same module.
    ///
    /// # Errors
    ///
    /// Returns a `SourceLoad` error if the file cannot be read; the failure
    /// is cached and reported again on later calls.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<ModuleId> {
        let source = self.sources.load_file(path)?;
        if let Some(&module) = self.by_source.get(&source) {
            return Ok(module);
        }
        Ok(self.create_module(source))
    }

    fn create_module(&mut self, source_id: SourceId) -> ModuleId {
        let number = u32::try_from(self.modules.len() + 1).expect("too many modules");
        let id = ModuleId::new(self.interner.domain(), number);
        let source = self.sources.source(source_id);
        let span = source.span();

        let mut nodes = NodeSet::new(self.interner.domain());
        for global in &self.globals {
            nodes.bind(span, global.key.clone(), global.order.clone(), Arc::clone(&global.op));
        }
        for ranked in self.modules.iter().filter(|m| m.initialized) {
            nodes.rank_source(ranked.source, ranked.rank);
        }

        let module = Module {
            id,
            name: source.name().to_string(),
            source: source_id,
            lexer: self.lexer.clone(),
            list: self.store.new_list(),
            nodes,
            initialized: false,
            rank: 0,
        };
        self.tracer.record(TraceEvent::ModuleLoaded {
            module: id.number(),
            name: module.name.clone(),
        });
        self.modules.push(module);
        self.by_source.insert(source_id, id);
        id
    }

    // -------------------------------------------------------------------------
    // Evaluation
    // -------------------------------------------------------------------------

    /// Runs every queued segment until no operator produces further work.
    ///
    /// Modules that have not been evaluated before receive their source
    /// node and scheduling rank first, in order of source name and then
    /// load order. Nodes left
    /// unbound once the queues drain are reported in the returned
    /// [`EvalReport`] and appended to [`errors`](Self::errors).
    ///
    /// # Errors
    ///
    /// Returns `LimitExceeded` when more than the configured number of
    /// steps would run, or the first error raised by an operator. Work
    /// still queued stays queued.
    pub fn evaluate(&mut self) -> Result<EvalReport> {
        self.initialize_modules();

        let mut steps = 0;
        while let Some(module) = self.next_module() {
            if steps >= self.config.max_steps {
                return Err(self.step_limit(module));
            }
            let Some(segment) = self.modules[module.index()].nodes.shift() else {
                break;
            };
            steps += 1;
            self.steps += 1;
            self.tracer.set_step(self.steps);
            self.apply(module, segment)?;
        }

        let unresolved = self.collect_unresolved();
        self.errors.extend(unresolved.iter().cloned());
        Ok(EvalReport { steps, unresolved })
    }

    fn initialize_modules(&mut self) {
        let mut pending: Vec<usize> = (0..self.modules.len())
            .filter(|&i| !self.modules[i].initialized)
            .collect();
        pending.sort_by(|&a, &b| {
            let (a, b) = (&self.modules[a], &self.modules[b]);
            a.name.cmp(&b.name).then(a.id.cmp(&b.id))
        });

        for index in pending {
            self.ranked += 1;
            let rank = self.ranked;
            let source = self.modules[index].source;
            for other in &mut self.modules {
                other.nodes.rank_source(source, rank);
            }

            let module = &mut self.modules[index];
            let span = self.sources.source(source).span();
            let node = self.store.insert(Value::Source(source), span);
            module.list.add(&mut self.store, [node]);
            module.nodes.add(&self.store, node);
            module.initialized = true;
            module.rank = rank;
            self.tracer.record(TraceEvent::ModuleInitialized {
                module: module.id.number(),
                name: module.name.clone(),
            });
        }
    }

    /// Picks the module whose next segment has the lowest priority.
    fn next_module(&mut self) -> Option<ModuleId> {
        let mut best: Option<(Priority, ModuleId)> = None;
        for module in &mut self.modules {
            let Some(priority) = module.nodes.peek_priority() else {
                continue;
            };
            if best.as_ref().is_none_or(|(top, _)| priority < *top) {
                best = Some((priority, module.id));
            }
        }
        best.map(|(_, id)| id)
    }

    fn step_limit(&mut self, module: ModuleId) -> Error {
        let module = &mut self.modules[module.index()];
        let context = module
            .nodes
            .peek()
            .map(|next| format!("next operator `{}` in `{}`", next.payload().name(), module.name));
        Error::limit_exceeded(SemanticLimit::MaxSteps {
            limit: self.config.max_steps,
            context,
        })
    }

    fn apply(&mut self, module: ModuleId, segment: Segment<OperatorRef>) -> Result<()> {
        let op = Arc::clone(&segment.payload);
        let first = segment.nodes.first().copied();
        self.tracer.record_with(|| TraceEvent::SegmentShifted {
            module: module.number(),
            operator: op.name().to_string(),
            key: segment.key.display(&self.interner).to_string(),
            start: segment.start,
            end: segment.end,
            nodes: segment.nodes.len(),
        });

        let mut ctx = EvalContext {
            module,
            modules: &mut self.modules,
            store: &mut self.store,
            interner: &mut self.interner,
            sources: &self.sources,
            step: self.steps,
        };
        op.apply(&mut ctx, segment)
            .map_err(|err| self.with_operator_context(err, op.name(), first))
    }

    /// Tags an operator error with the operator name and, unless the
    /// operator already supplied one, the location of the first node.
    fn with_operator_context(&self, mut err: Error, operator: &str, first: Option<NodeId>) -> Error {
        if let Some(context) = &mut err.context {
            context.stack.push(operator.to_string());
            return err;
        }
        let mut context = ErrorContext::new();
        if let Some(node) = first {
            let span = self.store.get(node).span();
            if let Some(source) = self.sources.get(span.source) {
                context = context
                    .with_source(source.name())
                    .with_position(span.line as usize, span.column as usize);
            }
        }
        err.with_context(context.with_frame(operator))
    }

    fn collect_unresolved(&mut self) -> Vec<Unresolved> {
        let mut out = Vec::new();
        for module in self.modules.iter_mut().filter(|m| m.initialized) {
            let leftovers = module.nodes.pop_unbound();
            if leftovers.is_empty() {
                continue;
            }
            let entries: Vec<UnresolvedKey> = leftovers
                .into_iter()
                .map(|group| UnresolvedKey {
                    key: group.key.display(&self.interner).to_string(),
                    nodes: group
                        .nodes
                        .iter()
                        .map(|&id| {
                            let node = self.store.get(id);
                            UnresolvedNode {
                                value: node.value().display(&self.interner).to_string(),
                                location: node.span().location(&self.sources),
                            }
                        })
                        .collect(),
                })
                .collect();

            let diagnostic = Unresolved {
                module: module.id,
                name: module.name.clone(),
                entries,
            };
            self.tracer.record_with(|| TraceEvent::Unresolved {
                module: module.id.number(),
                keys: diagnostic.entries.len(),
                nodes: diagnostic.node_count(),
            });
            out.push(diagnostic);
        }
        out
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Returns every module, in load order.
    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Returns a module by id, or `None` for ids of another program.
    #[must_use]
    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        id.number()
            .checked_sub(1)
            .and_then(|index| self.modules.get(index as usize))
            .filter(|module| module.id == id)
    }

    /// Returns the initialized modules in rank order.
    #[must_use]
    pub fn solved_modules(&self) -> Vec<&Module> {
        let mut out: Vec<&Module> = self.modules.iter().filter(|m| m.initialized).collect();
        out.sort_by_key(|m| m.rank);
        out
    }

    /// Renders every initialized module with its main node list, one per
    /// line, in rank order.
    #[must_use]
    pub fn dump(&self) -> String {
        self.solved_modules()
            .into_iter()
            .map(|m| m.dump(&self.store, &self.interner).to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Returns the module created for `source`, if any.
    #[must_use]
    pub fn module_for(&self, source: SourceId) -> Option<ModuleId> {
        self.by_source.get(&source).copied()
    }

    /// Returns the interner.
    #[must_use]
    pub const fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Returns the interner, for interning keys before binding globals.
    pub fn interner_mut(&mut self) -> &mut Interner {
        &mut self.interner
    }

    /// Returns the loaded sources.
    #[must_use]
    pub const fn sources(&self) -> &SourceMap {
        &self.sources
    }

    /// Returns the node store.
    #[must_use]
    pub const fn store(&self) -> &NodeStore {
        &self.store
    }

    /// Returns the tracer.
    #[must_use]
    pub const fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    /// Returns the tracer, for toggling it at runtime.
    pub fn tracer_mut(&mut self) -> &mut Tracer {
        &mut self.tracer
    }

    /// Returns every unresolved diagnostic collected so far.
    #[must_use]
    pub fn errors(&self) -> &[Unresolved] {
        &self.errors
    }

    /// Returns the total number of steps run across all evaluations.
    #[must_use]
    pub const fn steps(&self) -> usize {
        self.steps
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new(EvalConfig::default())
    }
}

impl std::fmt::Debug for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program")
            .field("modules", &self.modules)
            .field("globals", &self.globals.len())
            .field("steps", &self.steps)
            .finish_non_exhaustive()
    }
}
