//! Core values, types, interning, and errors for Weft.
//!
//! This crate provides:
//! - [`Value`] - The closed value type carried by every node
//! - [`KeyExtractable`] - Routing of values to binding keys
//! - [`Type`] - Type descriptors, usable as binding keys
//! - [`Interner`] - The owned symbol/keyword registry
//! - [`Error`] - Rich error types with context
//! - Persistent lists ([`LtVec`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod ids;
pub mod intern;
pub mod types;
pub mod value;

pub use collections::LtVec;
pub use error::{Error, ErrorContext, ErrorKind, Result, SemanticLimit};
pub use ids::{DomainId, SourceId};
pub use intern::{Interner, KeywordId, SymbolId};
pub use types::Type;
pub use value::{KeyExtractable, Value, ValueDisplay};
