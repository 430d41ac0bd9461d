//! Program driver, module loading, and evaluation loop for Weft.
//!
//! This crate provides:
//! - [`Program`] - Owns modules, sources and nodes; drives evaluation
//! - [`Operator`] / [`EvalContext`] - The pluggable step applied to segments
//! - [`Module`] - One loaded source with its node list and queue
//! - [`Unresolved`] - Diagnostics for nodes no operator claimed
//! - [`Tracer`] - Bounded trace of what the driver did
//! - [`EvalConfig`] - Kill switch, tab width, base path, tracing

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod diagnostic;
pub mod module;
pub mod operator;
pub mod program;
pub mod trace;

pub use config::{EvalConfig, TraceConfig};
pub use diagnostic::{Unresolved, UnresolvedKey, UnresolvedNode};
pub use module::{Module, ModuleDump, ModuleId};
pub use operator::{EvalContext, FnOperator, Operator, OperatorRef, operator};
pub use program::{EvalReport, Program};
pub use trace::{TraceEvent, TraceRecord, Tracer};
