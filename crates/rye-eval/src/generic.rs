//! Generic (multi-dispatch) method table.
//!
//! Consulted only after ordinary lookup of a word fails. Entries are keyed
//! by the kind of the would-be first argument and the word; matching is
//! exact, with no fallback between kinds.

use rustc_hash::FxHashMap;
use rye_common::Symbol;

use crate::value::Value;

#[derive(Default)]
pub struct GenericTable {
    methods: FxHashMap<(Symbol, Symbol), Value>,
    /// Number of kinds registered per word, to skip dispatch for words with
    /// no methods at all.
    words: FxHashMap<Symbol, usize>,
}

impl GenericTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callable` for `word` on values of `kind`, replacing any
    /// previous entry.
    pub fn register(&mut self, kind: Symbol, word: Symbol, callable: Value) {
        if self.methods.insert((kind, word), callable).is_none() {
            *self.words.entry(word).or_insert(0) += 1;
        }
    }

    pub fn resolve(&self, kind: Symbol, word: Symbol) -> Option<Value> {
        self.methods.get(&(kind, word)).cloned()
    }

    /// Whether any kind has a method for `word`.
    pub fn has_word(&self, word: Symbol) -> bool {
        self.words.contains_key(&word)
    }

    /// Words with a method for `kind`, in symbol order.
    pub fn methods(&self, kind: Symbol) -> Vec<Symbol> {
        let mut words: Vec<Symbol> = self
            .methods
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, w)| *w)
            .collect();
        words.sort();
        words
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(n: u32) -> Symbol {
        Symbol::from_raw(n)
    }

    #[test]
    fn test_resolve_is_exact_match() {
        let mut table = GenericTable::new();
        table.register(sym(1), sym(10), Value::Integer(1));
        assert_eq!(table.resolve(sym(1), sym(10)), Some(Value::Integer(1)));
        assert_eq!(table.resolve(sym(2), sym(10)), None);
        assert!(table.has_word(sym(10)));
        assert!(!table.has_word(sym(11)));
    }

    #[test]
    fn test_reregister_replaces() {
        let mut table = GenericTable::new();
        table.register(sym(1), sym(10), Value::Integer(1));
        table.register(sym(1), sym(10), Value::Integer(2));
        assert_eq!(table.resolve(sym(1), sym(10)), Some(Value::Integer(2)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_methods_for_kind() {
        let mut table = GenericTable::new();
        table.register(sym(1), sym(12), Value::Void);
        table.register(sym(1), sym(10), Value::Void);
        table.register(sym(2), sym(11), Value::Void);
        assert_eq!(table.methods(sym(1)), vec![sym(10), sym(12)]);
    }
}
