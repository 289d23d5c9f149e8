//! Evaluation contexts.
//!
//! A context maps words to values and links to an optional parent. Handles
//! are cheap to clone and share the same bindings, so closures that capture
//! one context see each other's changes.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use rye_common::Symbol;

use crate::value::{Value, ValueType};

struct ContextData {
    bindings: RefCell<FxHashMap<Symbol, Value>>,
    /// Words that may be changed with a mod-word.
    variables: RefCell<FxHashSet<Symbol>>,
    parent: Option<Context>,
    kind: Cell<Option<Symbol>>,
    isolated: Cell<bool>,
}

/// Outcome of [`Context::modify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModResult {
    Modified,
    /// The word was unbound and is now a variable.
    Created,
    /// The word is bound as a constant.
    Constant,
    /// The new value's type differs from the variable's current one.
    TypeMismatch(ValueType),
}

/// A shared handle to a context.
#[derive(Clone)]
pub struct Context(Rc<ContextData>);

impl Context {
    pub fn new(parent: Option<&Context>) -> Self {
        Context(Rc::new(ContextData {
            bindings: RefCell::new(FxHashMap::default()),
            variables: RefCell::new(FxHashSet::default()),
            parent: parent.cloned(),
            kind: Cell::new(None),
            isolated: Cell::new(false),
        }))
    }

    /// Create a child context.
    pub fn child(&self) -> Self {
        Context::new(Some(self))
    }

    pub fn parent(&self) -> Option<&Context> {
        self.0.parent.as_ref()
    }

    /// Look a word up in this context and then its ancestors.
    pub fn get(&self, word: Symbol) -> Option<Value> {
        self.get_with_owner(word).map(|(value, _)| value)
    }

    /// Like [`Context::get`], also returning the context that holds the word.
    pub fn get_with_owner(&self, word: Symbol) -> Option<(Value, Context)> {
        let mut current = Some(self);
        while let Some(ctx) = current {
            if let Some(value) = ctx.0.bindings.borrow().get(&word) {
                return Some((value.clone(), ctx.clone()));
            }
            current = ctx.0.parent.as_ref();
        }
        None
    }

    /// Look a word up in this context only.
    pub fn get_local(&self, word: Symbol) -> Option<Value> {
        self.0.bindings.borrow().get(&word).cloned()
    }

    pub fn has_local(&self, word: Symbol) -> bool {
        self.0.bindings.borrow().contains_key(&word)
    }

    /// Bind a word that is not yet bound in this context. Returns `false`,
    /// leaving the binding untouched, if it already is.
    pub fn set_new(&self, word: Symbol, value: Value) -> bool {
        let mut bindings = self.0.bindings.borrow_mut();
        if bindings.contains_key(&word) {
            return false;
        }
        bindings.insert(word, value);
        true
    }

    /// Bind a word unconditionally. Used for parameters and pattern captures,
    /// which are rebound on every call or match.
    pub fn bind(&self, word: Symbol, value: Value) {
        self.0.bindings.borrow_mut().insert(word, value);
    }

    /// Change a variable, or create it as a variable if it is unbound here.
    pub fn modify(&self, word: Symbol, value: Value) -> ModResult {
        let mut bindings = self.0.bindings.borrow_mut();
        let Some(current) = bindings.get(&word) else {
            bindings.insert(word, value);
            self.0.variables.borrow_mut().insert(word);
            return ModResult::Created;
        };
        if !self.0.variables.borrow().contains(&word) {
            return ModResult::Constant;
        }
        let expected = current.value_type();
        if expected != value.value_type() && !current.is_void() {
            return ModResult::TypeMismatch(expected);
        }
        bindings.insert(word, value);
        ModResult::Modified
    }

    /// Declare a word as a variable and bind it, replacing a previous
    /// binding in this context.
    pub fn set_variable(&self, word: Symbol, value: Value) {
        self.0.bindings.borrow_mut().insert(word, value);
        self.0.variables.borrow_mut().insert(word);
    }

    pub fn is_variable(&self, word: Symbol) -> bool {
        self.0.variables.borrow().contains(&word)
    }

    pub fn unset(&self, word: Symbol) -> Option<Value> {
        self.0.variables.borrow_mut().remove(&word);
        self.0.bindings.borrow_mut().remove(&word)
    }

    pub fn kind(&self) -> Option<Symbol> {
        self.0.kind.get()
    }

    pub fn set_kind(&self, kind: Option<Symbol>) {
        self.0.kind.set(kind);
    }

    /// Isolated contexts do not take part in generic dispatch.
    pub fn is_isolated(&self) -> bool {
        self.0.isolated.get()
    }

    pub fn set_isolated(&self, isolated: bool) {
        self.0.isolated.set(isolated);
    }

    /// Words bound directly in this context, in symbol order.
    pub fn words(&self) -> Vec<Symbol> {
        let mut words: Vec<Symbol> = self.0.bindings.borrow().keys().copied().collect();
        words.sort();
        words
    }

    pub fn len(&self) -> usize {
        self.0.bindings.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ptr_eq(&self, other: &Context) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("words", &self.len())
            .field("kind", &self.kind())
            .field("has_parent", &self.parent().is_some())
            .finish()
    }
}
