//! Core value type for all Weft data.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::collections::LtVec;
use crate::ids::{DomainId, SourceId};
use crate::intern::{Interner, KeywordId, SymbolId};
use crate::types::Type;

/// Core value type for all Weft data.
///
/// Values are immutable and cheaply cloneable. The variant set is closed:
/// every capability below is implemented by an exhaustive `match`.
#[derive(Clone)]
pub enum Value {
    /// The nil value (represents absence).
    Nil,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    Str(Arc<str>),
    /// Interned symbol (identifier).
    Symbol(SymbolId),
    /// Interned keyword (`:name`).
    Keyword(KeywordId),
    /// Persistent list.
    List(LtVec<Value>),
    /// Type descriptor.
    Type(Type),
    /// Reference to a loaded source.
    Source(SourceId),
}

/// Capability of values that can route a node to a binding key.
///
/// A node whose value yields `None` is never scheduled.
pub trait KeyExtractable {
    /// Returns the binding key for this value, if it has one.
    fn binding_key(&self) -> Option<Value>;
}

impl KeyExtractable for Value {
    fn binding_key(&self) -> Option<Value> {
        match self {
            Self::Int(_) | Self::Float(_) | Self::Str(_) | Self::Source(_) => {
                Some(Self::Type(self.value_type()))
            }
            Self::Symbol(id) => Some(Self::Symbol(*id)),
            Self::Nil | Self::Bool(_) | Self::Keyword(_) | Self::List(_) | Self::Type(_) => None,
        }
    }
}

impl Value {
    /// Returns the type of this value.
    #[must_use]
    pub const fn value_type(&self) -> Type {
        match self {
            Self::Nil => Type::Nil,
            Self::Bool(_) => Type::Bool,
            Self::Int(_) => Type::Int,
            Self::Float(_) => Type::Float,
            Self::Str(_) => Type::Str,
            Self::Symbol(_) => Type::Symbol,
            Self::Keyword(_) => Type::Keyword,
            Self::List(_) => Type::List,
            Self::Type(_) => Type::Type,
            Self::Source(_) => Type::Source,
        }
    }

    /// Returns true if this value is nil.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Returns the identity domain of interned values.
    ///
    /// Values that do not depend on an interner return `None`.
    #[must_use]
    pub fn domain(&self) -> Option<DomainId> {
        match self {
            Self::Symbol(id) => Some(id.domain()),
            Self::Keyword(id) => Some(id.domain()),
            Self::List(items) => items.iter().find_map(Self::domain),
            Self::Nil
            | Self::Bool(_)
            | Self::Int(_)
            | Self::Float(_)
            | Self::Str(_)
            | Self::Type(_)
            | Self::Source(_) => None,
        }
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a float value.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a symbol ID.
    #[must_use]
    pub const fn as_symbol(&self) -> Option<SymbolId> {
        match self {
            Self::Symbol(id) => Some(*id),
            _ => None,
        }
    }

    /// Attempts to extract a keyword ID.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<KeywordId> {
        match self {
            Self::Keyword(id) => Some(*id),
            _ => None,
        }
    }

    /// Attempts to extract a list reference.
    #[must_use]
    pub const fn as_list(&self) -> Option<&LtVec<Value>> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Attempts to extract a source ID.
    #[must_use]
    pub const fn as_source(&self) -> Option<SourceId> {
        match self {
            Self::Source(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns a displayable wrapper that resolves interned names.
    #[must_use]
    pub const fn display<'a>(&'a self, interner: &'a Interner) -> ValueDisplay<'a> {
        ValueDisplay {
            value: self,
            interner,
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Nil => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::Float(_) => 3,
            Self::Str(_) => 4,
            Self::Symbol(_) => 5,
            Self::Keyword(_) => 6,
            Self::List(_) => 7,
            Self::Type(_) => 8,
            Self::Source(_) => 9,
        }
    }
}

// Floats compare by bit pattern so that Eq, Hash and Ord agree.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Keyword(a), Self::Keyword(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Type(a), Self::Type(b)) => a == b,
            (Self::Source(a), Self::Source(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Nil => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(n) => n.hash(state),
            Self::Float(n) => n.to_bits().hash(state),
            Self::Str(s) => s.hash(state),
            Self::Symbol(id) => id.hash(state),
            Self::Keyword(id) => id.hash(state),
            Self::List(items) => items.hash(state),
            Self::Type(t) => t.hash(state),
            Self::Source(id) => id.hash(state),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Total order: values of different variants order by variant, values of
/// the same variant by payload.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Nil, Self::Nil) => Ordering::Equal,
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            (Self::Symbol(a), Self::Symbol(b)) => a.cmp(b),
            (Self::Keyword(a), Self::Keyword(b)) => a.cmp(b),
            (Self::List(a), Self::List(b)) => a.cmp(b),
            (Self::Type(a), Self::Type(b)) => a.cmp(b),
            (Self::Source(a), Self::Source(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}](", self.value_type())?;
        match self {
            Self::Nil => write!(f, "nil")?,
            Self::Bool(b) => write!(f, "{b}")?,
            Self::Int(n) => write!(f, "{n}")?,
            Self::Float(n) => write!(f, "{n:?}")?,
            Self::Str(s) => write!(f, "{s:?}")?,
            Self::Symbol(id) => write!(f, "#{}", id.index())?,
            Self::Keyword(id) => write!(f, ":#{}", id.index())?,
            Self::List(items) => write!(f, "{items:?}")?,
            Self::Type(t) => write!(f, "{t}")?,
            Self::Source(id) => write!(f, "{}", id.0)?,
        }
        write!(f, ")")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Symbol(id) => write!(f, "Symbol({})", id.index()),
            Self::Keyword(id) => write!(f, ":Keyword({})", id.index()),
            Self::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Self::Type(t) => write!(f, "{t}"),
            Self::Source(id) => write!(f, "{id}"),
        }
    }
}

/// Display wrapper produced by [`Value::display`].
pub struct ValueDisplay<'a> {
    value: &'a Value,
    interner: &'a Interner,
}

impl fmt::Display for ValueDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Symbol(id) => match self.interner.get_symbol(*id) {
                Some(name) => write!(f, "{name}"),
                None => write!(f, "{}", self.value),
            },
            Value::Keyword(id) => match self.interner.get_keyword(*id) {
                Some(name) => write!(f, ":{name}"),
                None => write!(f, "{}", self.value),
            },
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item.display(self.interner))?;
                }
                write!(f, ")")
            }
            other => write!(f, "{other}"),
        }
    }
}

// Convenience From implementations

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}

impl From<SymbolId> for Value {
    fn from(id: SymbolId) -> Self {
        Self::Symbol(id)
    }
}

impl From<KeywordId> for Value {
    fn from(id: KeywordId) -> Self {
        Self::Keyword(id)
    }
}

impl From<Type> for Value {
    fn from(t: Type) -> Self {
        Self::Type(t)
    }
}

impl From<SourceId> for Value {
    fn from(id: SourceId) -> Self {
        Self::Source(id)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}
