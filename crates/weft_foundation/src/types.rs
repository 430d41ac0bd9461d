//! Type descriptors.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Type descriptor of a [`Value`](crate::Value).
///
/// Types are themselves values (`Value::Type`) and serve as binding keys for
/// nodes that are routed by kind rather than by name, such as literals and
/// whole sources.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// The nil type (only value: nil).
    Nil,
    /// Boolean type.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// String type.
    Str,
    /// Symbol type (interned identifier).
    Symbol,
    /// Keyword type (interned, prefixed with `:`).
    Keyword,
    /// Persistent list.
    List,
    /// Type descriptor.
    Type,
    /// Loaded source text.
    Source,
}

impl Type {
    /// Returns the display name of this type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Symbol => "symbol",
            Self::Keyword => "keyword",
            Self::List => "list",
            Self::Type => "type",
            Self::Source => "source",
        }
    }

    /// Returns true if values of this type are numbers.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
