//! The global word index.
//!
//! Every word the loader reads, and every builtin name registered at startup,
//! is interned once. Values refer to words only through their `Symbol`.

use std::collections::HashMap;
use std::fmt;

/// Identity of an interned word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// Build a symbol from its raw index. Only meaningful for indexes
    /// reserved up front with [`WordIndex::with_reserved`].
    pub const fn from_raw(raw: u32) -> Self {
        Symbol(raw)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Two-way mapping between word names and symbols.
#[derive(Default, Clone)]
pub struct WordIndex {
    map: HashMap<String, Symbol>,
    names: Vec<String>,
}

impl WordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index whose first symbols are `reserved`, in order.
    pub fn with_reserved(reserved: &[&str]) -> Self {
        let mut index = Self::new();
        for name in reserved {
            index.intern(name);
        }
        index
    }

    /// Intern `name`, returning the existing symbol if it was seen before.
    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&sym) = self.map.get(name) {
            return sym;
        }

        let sym = Symbol(self.names.len() as u32);
        self.names.push(name.to_owned());
        self.map.insert(name.to_owned(), sym);
        sym
    }

    /// Look a name up without interning it.
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.map.get(name).copied()
    }

    /// The name of `sym`. Symbols from another index print as `?`.
    pub fn name(&self, sym: Symbol) -> &str {
        self.names.get(sym.index()).map_or("?", String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl fmt::Debug for WordIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordIndex")
            .field("words", &self.names.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_idempotent() {
        let mut words = WordIndex::new();
        let a = words.intern("print");
        let b = words.intern("print");
        assert_eq!(a, b);
        assert_eq!(words.len(), 1);
    }

    #[test]
    fn test_reserved_words_keep_their_order() {
        let words = WordIndex::with_reserved(&["block", "integer", "word"]);
        assert_eq!(words.lookup("integer"), Some(Symbol::from_raw(1)));
        assert_eq!(words.name(Symbol::from_raw(2)), "word");
    }

    #[test]
    fn test_lookup_does_not_intern() {
        let words = WordIndex::new();
        assert_eq!(words.lookup("missing"), None);
        assert!(words.is_empty());
    }

    #[test]
    fn test_unknown_symbol_name() {
        let words = WordIndex::new();
        assert_eq!(words.name(Symbol::from_raw(9)), "?");
    }
}
