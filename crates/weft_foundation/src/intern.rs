//! String interning for symbols and keywords.
//!
//! Symbols and keywords are interned to enable fast equality comparison
//! and cheap use as binding keys. The [`Interner`] is an explicit owned
//! registry: whoever needs identity passes it by reference.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::DomainId;
use crate::value::{Value, ValueDisplay};

/// Interned symbol identifier.
///
/// Symbols are identifiers like `foo` or `let`. The id remembers the
/// interner that produced it.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SymbolId {
    pub(crate) domain: DomainId,
    pub(crate) index: u32,
}

impl SymbolId {
    /// Returns the raw index of this symbol.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Returns the domain of the interner that produced this symbol.
    #[must_use]
    pub const fn domain(self) -> DomainId {
        self.domain
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.index)
    }
}

/// Interned keyword identifier.
///
/// Keywords are written with a leading `:` (`:macro`, `:eval`) and are mostly
/// used as binding orders and operator tags.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeywordId {
    pub(crate) domain: DomainId,
    pub(crate) index: u32,
}

impl KeywordId {
    /// Returns the raw index of this keyword.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Returns the domain of the interner that produced this keyword.
    #[must_use]
    pub const fn domain(self) -> DomainId {
        self.domain
    }
}

impl fmt::Debug for KeywordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeywordId({})", self.index)
    }
}

/// Interner for symbols and keywords.
///
/// Each interner owns a fresh [`DomainId`]. It is not thread-safe; use
/// external synchronization if needed.
#[derive(Clone, Debug)]
pub struct Interner {
    domain: DomainId,
    /// String storage (shared across symbols and keywords).
    strings: Vec<Arc<str>>,
    /// Map from string to index.
    string_to_index: HashMap<Arc<str>, u32>,
    /// Symbol indices (subset of strings that are symbols).
    symbols: Vec<u32>,
    symbol_map: HashMap<Arc<str>, SymbolId>,
    /// Keyword indices (subset of strings that are keywords).
    keywords: Vec<u32>,
    keyword_map: HashMap<Arc<str>, KeywordId>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    /// Creates an empty interner with its own domain.
    #[must_use]
    pub fn new() -> Self {
        Self {
            domain: DomainId::fresh(),
            strings: Vec::new(),
            string_to_index: HashMap::new(),
            symbols: Vec::new(),
            symbol_map: HashMap::new(),
            keywords: Vec::new(),
            keyword_map: HashMap::new(),
        }
    }

    /// Returns the identity domain of this interner.
    #[must_use]
    pub const fn domain(&self) -> DomainId {
        self.domain
    }

    fn intern_string(&mut self, s: &str) -> u32 {
        if let Some(&idx) = self.string_to_index.get(s) {
            return idx;
        }

        let idx = u32::try_from(self.strings.len()).expect("too many interned strings");
        let arc: Arc<str> = s.into();
        self.strings.push(arc.clone());
        self.string_to_index.insert(arc, idx);
        idx
    }

    fn get_string(&self, idx: u32) -> Option<&str> {
        self.strings.get(idx as usize).map(AsRef::as_ref)
    }

    /// Interns a symbol, returning its [`SymbolId`].
    ///
    /// # Panics
    ///
    /// Panics if the number of interned symbols exceeds `u32::MAX`.
    pub fn intern_symbol(&mut self, s: &str) -> SymbolId {
        if let Some(&id) = self.symbol_map.get(s) {
            return id;
        }

        let string_idx = self.intern_string(s);
        let index = u32::try_from(self.symbols.len()).expect("too many symbols");
        self.symbols.push(string_idx);

        let id = SymbolId {
            domain: self.domain,
            index,
        };
        self.symbol_map.insert(s.into(), id);
        id
    }

    /// Gets the string for a symbol.
    ///
    /// Returns `None` for symbols interned elsewhere.
    #[must_use]
    pub fn get_symbol(&self, id: SymbolId) -> Option<&str> {
        if id.domain != self.domain {
            return None;
        }
        self.symbols
            .get(id.index as usize)
            .and_then(|&idx| self.get_string(idx))
    }

    /// Interns a keyword, returning its [`KeywordId`].
    ///
    /// The string should NOT include the leading `:`.
    ///
    /// # Panics
    ///
    /// Panics if the number of interned keywords exceeds `u32::MAX`.
    pub fn intern_keyword(&mut self, s: &str) -> KeywordId {
        if let Some(&id) = self.keyword_map.get(s) {
            return id;
        }

        let string_idx = self.intern_string(s);
        let index = u32::try_from(self.keywords.len()).expect("too many keywords");
        self.keywords.push(string_idx);

        let id = KeywordId {
            domain: self.domain,
            index,
        };
        self.keyword_map.insert(s.into(), id);
        id
    }

    /// Gets the string for a keyword (without the leading `:`).
    #[must_use]
    pub fn get_keyword(&self, id: KeywordId) -> Option<&str> {
        if id.domain != self.domain {
            return None;
        }
        self.keywords
            .get(id.index as usize)
            .and_then(|&idx| self.get_string(idx))
    }

    /// Returns the number of interned symbols.
    #[must_use]
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Returns the number of interned keywords.
    #[must_use]
    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    /// Formats a value with symbol and keyword names resolved.
    #[must_use]
    pub const fn display<'a>(&'a self, value: &'a Value) -> ValueDisplay<'a> {
        value.display(self)
    }
}
