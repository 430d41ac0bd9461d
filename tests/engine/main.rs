//! Integration tests for Layer 2: Engine
//!
//! Tests for node lists, range binding, and segment scheduling.

mod binding;
mod scheduling;
