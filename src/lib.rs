//! Weft - Incremental range-binding and scheduling engine
//!
//! This crate re-exports all layers of the Weft system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: weft_runtime    - Program driver, module loading, evaluation loop
//! Layer 2: weft_engine     - Node lists, range tables, segment scheduling
//! Layer 1: weft_language   - Sources, spans, tokens, lexer
//! Layer 0: weft_foundation - Core types (Value, Interner, Error)
//! ```

pub use weft_engine as engine;
pub use weft_foundation as foundation;
pub use weft_language as language;
pub use weft_runtime as runtime;
