//! Runtime values for the Rye evaluator.
//!
//! Values are a closed set of tagged variants. Each one reports a
//! [`ValueType`], and the coarser [`Value::kind`] is what generic dispatch
//! keys on.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use rye_common::Symbol;

use crate::context::Context;
use crate::error::RyeError;
use crate::series::Series;
use crate::state::ProgramState;

/// The type of a value.
///
/// The discriminant of each type equals the symbol of its name in every
/// word index created by [`crate::new_word_index`], so a type-tag word such
/// as `<integer>` can be compared against a value's type without a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Block = 0,
    Integer,
    Decimal,
    String,
    Boolean,
    Uri,
    Word,
    Setword,
    LSetword,
    Modword,
    LModword,
    Getword,
    Opword,
    Pipeword,
    Tagword,
    Xword,
    Genword,
    CPath,
    Builtin,
    Function,
    Context,
    Error,
    Void,
    Comma,
    Ref,
}

impl ValueType {
    pub const ALL: [ValueType; 25] = [
        ValueType::Block,
        ValueType::Integer,
        ValueType::Decimal,
        ValueType::String,
        ValueType::Boolean,
        ValueType::Uri,
        ValueType::Word,
        ValueType::Setword,
        ValueType::LSetword,
        ValueType::Modword,
        ValueType::LModword,
        ValueType::Getword,
        ValueType::Opword,
        ValueType::Pipeword,
        ValueType::Tagword,
        ValueType::Xword,
        ValueType::Genword,
        ValueType::CPath,
        ValueType::Builtin,
        ValueType::Function,
        ValueType::Context,
        ValueType::Error,
        ValueType::Void,
        ValueType::Comma,
        ValueType::Ref,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ValueType::Block => "block",
            ValueType::Integer => "integer",
            ValueType::Decimal => "decimal",
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
            ValueType::Uri => "uri",
            ValueType::Word => "word",
            ValueType::Setword => "setword",
            ValueType::LSetword => "lsetword",
            ValueType::Modword => "modword",
            ValueType::LModword => "lmodword",
            ValueType::Getword => "getword",
            ValueType::Opword => "opword",
            ValueType::Pipeword => "pipeword",
            ValueType::Tagword => "tagword",
            ValueType::Xword => "xword",
            ValueType::Genword => "genword",
            ValueType::CPath => "cpath",
            ValueType::Builtin => "builtin",
            ValueType::Function => "function",
            ValueType::Context => "context",
            ValueType::Error => "error",
            ValueType::Void => "void",
            ValueType::Comma => "comma",
            ValueType::Ref => "ref",
        }
    }

    /// The word naming this type.
    pub fn symbol(self) -> Symbol {
        Symbol::from_raw(self as u32)
    }

    pub fn from_symbol(sym: Symbol) -> Option<ValueType> {
        Self::ALL.get(sym.index()).copied()
    }
}

/// How a block is treated when the evaluator meets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockMode {
    /// `{ }` evaluates to itself.
    #[default]
    Data,
    /// `[ ]` evaluates every expression and collects the results.
    Compose,
    /// `( )` evaluates every expression and keeps the last result.
    Do,
}

/// A block of values with its own cursor.
#[derive(Debug, Clone)]
pub struct Block {
    pub series: Series,
    pub mode: BlockMode,
}

impl Block {
    pub fn new(items: Vec<Value>) -> Self {
        Self::with_mode(items, BlockMode::Data)
    }

    pub fn with_mode(items: Vec<Value>, mode: BlockMode) -> Self {
        Self {
            series: Series::new(items),
            mode,
        }
    }

    pub fn from_series(series: Series) -> Self {
        Self {
            series,
            mode: BlockMode::Data,
        }
    }

    /// All elements, regardless of the cursor.
    pub fn items(&self) -> &[Value] {
        self.series.items()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.len() == 0
    }
}

/// A shared, mutable block, produced by `ref` and consumed by destructive
/// operations such as `sort!`.
#[derive(Clone)]
pub struct BlockRef(Rc<RefCell<Series>>);

impl BlockRef {
    pub fn new(series: Series) -> Self {
        BlockRef(Rc::new(RefCell::new(series)))
    }

    /// A snapshot of the current contents, cursor included.
    pub fn snapshot(&self) -> Series {
        self.0.borrow().clone()
    }

    pub fn with_series<R>(&self, f: impl FnOnce(&Series) -> R) -> R {
        f(&self.0.borrow())
    }

    pub fn with_series_mut<R>(&self, f: impl FnOnce(&mut Series) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    pub fn ptr_eq(&self, other: &BlockRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// A `scheme://path` literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Uri {
    pub scheme: Symbol,
    pub path: String,
}

/// How a context path is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMode {
    Plain,
    Op,
    Pipe,
    Get,
}

/// A context path such as `ctx/word`.
#[derive(Debug, Clone, PartialEq)]
pub struct CPath {
    pub mode: PathMode,
    pub words: Vec<Symbol>,
}

pub type BuiltinResult = Result<Value, RyeError>;

/// Signature of native builtins. The slice always holds exactly `arity`
/// values. `Err` raises the failure flag with the error as the result.
pub type BuiltinFn = fn(&mut ProgramState, &[Value]) -> BuiltinResult;

/// Largest arity a builtin may declare.
pub const MAX_ARITY: usize = 5;

/// A native operation of fixed arity.
#[derive(Clone)]
pub struct Builtin {
    pub name: &'static str,
    pub arity: usize,
    pub func: BuiltinFn,
    pub curried: [Option<Value>; MAX_ARITY],
    pub accept_failure: bool,
    pub pure: bool,
    pub doc: &'static str,
}

impl Builtin {
    pub fn new(name: &'static str, arity: usize, func: BuiltinFn) -> Self {
        debug_assert!(arity <= MAX_ARITY, "builtin `{name}` declares arity {arity}");
        Self {
            name,
            arity: arity.min(MAX_ARITY),
            func,
            curried: Default::default(),
            accept_failure: false,
            pure: false,
            doc: "",
        }
    }

    /// Let the builtin run while the failure flag is raised.
    pub fn accept_failure(mut self) -> Self {
        self.accept_failure = true;
        self
    }

    /// Also register the builtin in the pure root context.
    pub fn pure(mut self) -> Self {
        self.pure = true;
        self
    }

    pub fn doc(mut self, doc: &'static str) -> Self {
        self.doc = doc;
        self
    }

    pub fn is_curried(&self) -> bool {
        self.curried.iter().any(Option::is_some)
    }

    /// Number of argument slots not fixed by currying.
    pub fn open_slots(&self) -> usize {
        self.curried[..self.arity]
            .iter()
            .filter(|slot| slot.is_none())
            .count()
    }

    /// A copy of this builtin with every non-void value of `args` fixed in
    /// its slot.
    pub fn curry_with(&self, args: &[Value]) -> Builtin {
        let mut curried = self.clone();
        for (slot, arg) in args.iter().enumerate().take(self.arity) {
            if !arg.is_void() {
                curried.curried[slot] = Some(arg.clone());
            }
        }
        curried
    }

    pub fn into_value(self) -> Value {
        Value::Builtin(Rc::new(self))
    }
}

/// A user function.
#[derive(Clone)]
pub struct Function {
    pub params: Vec<Symbol>,
    pub body: Block,
    /// Captured defining context, if any.
    pub ctx: Option<Context>,
    pub pure: bool,
    /// Evaluate directly inside `ctx` rather than in a child of it.
    pub in_ctx: bool,
    pub doc: String,
}

impl Function {
    pub fn new(params: Vec<Symbol>, body: Block) -> Self {
        Self {
            params,
            body,
            ctx: None,
            pure: false,
            in_ctx: false,
            doc: String::new(),
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// A runtime value.
#[derive(Clone, Default)]
pub enum Value {
    Integer(i64),
    Decimal(f64),
    String(Rc<str>),
    Boolean(bool),
    Uri(Rc<Uri>),
    Block(Block),
    Ref(BlockRef),
    Word(Symbol),
    Setword(Symbol),
    LSetword(Symbol),
    Modword(Symbol),
    LModword(Symbol),
    Getword(Symbol),
    Opword(Symbol),
    Pipeword(Symbol),
    Tagword(Symbol),
    Xword(Symbol),
    Genword(Symbol),
    CPath(Rc<CPath>),
    Builtin(Rc<Builtin>),
    Function(Rc<Function>),
    Context(Context),
    Error(Rc<RyeError>),
    #[default]
    Void,
    Comma,
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Value {
        Value::String(s.into())
    }

    pub fn block(items: Vec<Value>) -> Value {
        Value::Block(Block::new(items))
    }

    pub fn error(err: RyeError) -> Value {
        Value::Error(Rc::new(err))
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Integer(_) => ValueType::Integer,
            Value::Decimal(_) => ValueType::Decimal,
            Value::String(_) => ValueType::String,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Uri(_) => ValueType::Uri,
            Value::Block(_) => ValueType::Block,
            Value::Ref(_) => ValueType::Ref,
            Value::Word(_) => ValueType::Word,
            Value::Setword(_) => ValueType::Setword,
            Value::LSetword(_) => ValueType::LSetword,
            Value::Modword(_) => ValueType::Modword,
            Value::LModword(_) => ValueType::LModword,
            Value::Getword(_) => ValueType::Getword,
            Value::Opword(_) => ValueType::Opword,
            Value::Pipeword(_) => ValueType::Pipeword,
            Value::Tagword(_) => ValueType::Tagword,
            Value::Xword(_) => ValueType::Xword,
            Value::Genword(_) => ValueType::Genword,
            Value::CPath(_) => ValueType::CPath,
            Value::Builtin(_) => ValueType::Builtin,
            Value::Function(_) => ValueType::Function,
            Value::Context(_) => ValueType::Context,
            Value::Error(_) => ValueType::Error,
            Value::Void => ValueType::Void,
            Value::Comma => ValueType::Comma,
        }
    }

    /// The dispatch kind: the type word, or the kind word of a context that
    /// was given one.
    pub fn kind(&self) -> Symbol {
        match self {
            Value::Context(ctx) => ctx.kind().unwrap_or(ValueType::Context.symbol()),
            other => other.value_type().symbol(),
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }

    /// Booleans by value, positive integers and non-empty strings are truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Integer(n) => *n > 0,
            Value::String(s) => !s.is_empty(),
            _ => false,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value as a decimal, promoting integers.
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Decimal(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Value::Block(b) => Some(b),
            _ => None,
        }
    }

    /// The symbol of any word-like value.
    pub fn as_word(&self) -> Option<Symbol> {
        match self {
            Value::Word(w)
            | Value::Setword(w)
            | Value::LSetword(w)
            | Value::Modword(w)
            | Value::LModword(w)
            | Value::Getword(w)
            | Value::Opword(w)
            | Value::Pipeword(w)
            | Value::Tagword(w)
            | Value::Xword(w)
            | Value::Genword(w) => Some(*w),
            _ => None,
        }
    }

    /// Ordering used by sorting and comparisons. Integers and decimals
    /// compare numerically with each other; other values only compare
    /// within the same type.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (a, b) => match (a.as_decimal(), b.as_decimal()) {
                (Some(x), Some(y)) => x.partial_cmp(&y),
                _ => None,
            },
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Decimal(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Decimal(n) => write!(f, "{n:?}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Uri(u) => write!(f, "uri({:?}://{})", u.scheme, u.path),
            Value::Block(b) => f.debug_set().entries(b.items()).finish(),
            Value::Ref(r) => r.with_series(|s| write!(f, "ref{:?}", s.items())),
            Value::Word(w) => write!(f, "word({w:?})"),
            Value::Setword(w) => write!(f, "setword({w:?})"),
            Value::LSetword(w) => write!(f, "lsetword({w:?})"),
            Value::Modword(w) => write!(f, "modword({w:?})"),
            Value::LModword(w) => write!(f, "lmodword({w:?})"),
            Value::Getword(w) => write!(f, "getword({w:?})"),
            Value::Opword(w) => write!(f, "opword({w:?})"),
            Value::Pipeword(w) => write!(f, "pipeword({w:?})"),
            Value::Tagword(w) => write!(f, "tagword({w:?})"),
            Value::Xword(w) => write!(f, "xword({w:?})"),
            Value::Genword(w) => write!(f, "genword({w:?})"),
            Value::CPath(p) => write!(f, "cpath({:?})", p.words),
            Value::Builtin(b) => write!(f, "<builtin {}>", b.name),
            Value::Function(func) => write!(f, "<function {}>", func.arity()),
            Value::Context(_) => write!(f, "<context>"),
            Value::Error(e) => write!(f, "<error {}: {}>", e.status, e.message),
            Value::Void => write!(f, "_"),
            Value::Comma => write!(f, ","),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Uri(a), Value::Uri(b)) => a == b,
            (Value::Block(a), Value::Block(b)) => a.items() == b.items(),
            (Value::Ref(a), Value::Ref(b)) => a.ptr_eq(b),
            (Value::Word(a), Value::Word(b))
            | (Value::Setword(a), Value::Setword(b))
            | (Value::LSetword(a), Value::LSetword(b))
            | (Value::Modword(a), Value::Modword(b))
            | (Value::LModword(a), Value::LModword(b))
            | (Value::Getword(a), Value::Getword(b))
            | (Value::Opword(a), Value::Opword(b))
            | (Value::Pipeword(a), Value::Pipeword(b))
            | (Value::Tagword(a), Value::Tagword(b))
            | (Value::Xword(a), Value::Xword(b))
            | (Value::Genword(a), Value::Genword(b)) => a == b,
            (Value::CPath(a), Value::CPath(b)) => a == b,
            (Value::Builtin(a), Value::Builtin(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Context(a), Value::Context(b)) => a.ptr_eq(b),
            (Value::Error(a), Value::Error(b)) => {
                a.status == b.status && a.message == b.message
            }
            (Value::Void, Value::Void) | (Value::Comma, Value::Comma) => true,
            _ => false,
        }
    }
}
