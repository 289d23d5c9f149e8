//! Calling builtins and user functions.

use std::rc::Rc;

use rye_diagnostic::ErrorCode;

use crate::context::Context;
use crate::error::RyeError;
use crate::state::ProgramState;
use crate::value::{Builtin, Function, Value, MAX_ARITY};

impl ProgramState {
    /// Collect the open argument slots of `bi` and call it.
    ///
    /// Curried slots are filled first, then `left` takes the first free
    /// slot. Remaining arguments are evaluated from the series: one concrete
    /// value each after a left value, otherwise one op-word chained
    /// expression each.
    pub(crate) fn call_builtin(&mut self, bi: &Rc<Builtin>, left: Option<Value>) {
        let has_left = left.is_some();
        let mut left = left;
        let mut args: [Value; MAX_ARITY] = Default::default();
        for slot in 0..bi.arity {
            if let Some(fixed) = &bi.curried[slot] {
                args[slot] = fixed.clone();
                continue;
            }
            if let Some(value) = left.take() {
                args[slot] = value;
                continue;
            }
            if !self.collect_argument(has_left, bi.accept_failure, slot, bi.name) {
                return;
            }
            args[slot] = std::mem::take(&mut self.res);
        }
        self.apply_builtin(bi, &args[..bi.arity]);
    }

    /// Evaluate one argument into the result slot. Returns `false` when the
    /// call must be abandoned.
    fn collect_argument(&mut self, has_left: bool, accept_failure: bool, slot: usize, name: &str) -> bool {
        if has_left {
            self.eval_expression_concrete();
        } else {
            self.eval_expression_limited();
        }
        if self.return_flag {
            return false;
        }
        if self.error_flag {
            let cause = match std::mem::take(&mut self.res) {
                Value::Error(err) => err,
                other => Rc::new(RyeError::new(0, other.print(&self.words))),
            };
            let err = RyeError::from_code(
                ErrorCode::ArgumentMissing,
                format!("argument {} of `{name}` could not be evaluated", slot + 1),
            )
            .with_parent(cause);
            self.res = Value::error(err);
            return false;
        }
        !self.check_for_failure(accept_failure)
    }

    /// Call `bi` with every slot filled, or return it curried if any
    /// argument is void. Shared by both evaluators.
    pub fn apply_builtin(&mut self, bi: &Builtin, args: &[Value]) {
        if args.iter().any(Value::is_void) {
            self.res = bi.curry_with(args).into_value();
            return;
        }
        match (bi.func)(self, args) {
            Ok(value) => self.res = value,
            Err(err) => {
                self.res = Value::error(err);
                if !self.error_flag {
                    self.failure_flag = true;
                }
            }
        }
    }

    /// The arguments of `bi` with curried slots taken from the builtin and
    /// open slots from `open`, in order. Missing values become void.
    pub(crate) fn builtin_args(bi: &Builtin, open: impl IntoIterator<Item = Value>) -> Vec<Value> {
        let mut open = open.into_iter();
        bi.curried[..bi.arity]
            .iter()
            .map(|slot| match slot {
                Some(fixed) => fixed.clone(),
                None => open.next().unwrap_or_default(),
            })
            .collect()
    }

    /// The context a call of `func` runs in.
    fn function_context(&self, func: &Function, session: Option<&Context>) -> Context {
        if func.pure {
            return self.pctx.child();
        }
        if let Some(ctx) = &func.ctx {
            if func.in_ctx {
                return ctx.clone();
            }
            return ctx.child();
        }
        match session {
            Some(ctx) => ctx.child(),
            None => self.ctx.child(),
        }
    }

    /// Collect the arguments of `func` from the series and run it. `session`
    /// is the context a path resolved the function through.
    #[tracing::instrument(level = "trace", skip_all, fields(arity = func.arity()))]
    pub(crate) fn call_function(&mut self, func: &Rc<Function>, left: Option<Value>, session: Option<Context>) {
        let fctx = self.function_context(func, session.as_ref());
        let has_left = left.is_some();
        let mut left = left;
        let mut first = None;
        for (slot, &param) in func.params.iter().enumerate() {
            let value = match left.take() {
                Some(value) => value,
                None => {
                    if !self.collect_argument(has_left, false, slot, "function") {
                        return;
                    }
                    std::mem::take(&mut self.res)
                }
            };
            if slot == 0 {
                first = Some(value.clone());
            }
            fctx.bind(param, value);
        }
        self.run_function_body(func, fctx, first);
    }

    /// Run the body of `func` in `fctx`, then the blocks it deferred.
    fn run_function_body(&mut self, func: &Function, fctx: Context, first: Option<Value>) {
        let saved_ser = std::mem::replace(&mut self.ser, func.body.series.rewound());
        let saved_ctx = std::mem::replace(&mut self.ctx, fctx);
        let saved_args = std::mem::replace(&mut self.args, func.params.clone());
        let mark = self.deferred.len();
        self.res = Value::Void;
        self.with_depth(|ps| ps.eval_block_inj(first.as_ref(), first.is_some()));
        self.return_flag = false;
        self.run_deferred(mark);
        self.args = saved_args;
        self.ctx = saved_ctx;
        self.ser = saved_ser;
    }

    /// Call `func` with already evaluated arguments.
    pub fn call_function_with_args(&mut self, func: &Rc<Function>, args: &[Value]) {
        if args.len() < func.arity() {
            self.set_error(
                ErrorCode::ArgumentMissing,
                format!(
                    "function takes {} arguments, {} given",
                    func.arity(),
                    args.len()
                ),
            );
            return;
        }
        let fctx = self.function_context(func, None);
        for (param, arg) in func.params.iter().zip(args) {
            fctx.bind(*param, arg.clone());
        }
        self.run_function_body(func, fctx, args.first().cloned());
    }

    /// Call a builtin or function with already evaluated arguments. Missing
    /// builtin arguments curry it.
    pub fn call_value_with_args(&mut self, callable: &Value, args: &[Value]) {
        match callable {
            Value::Builtin(bi) => {
                let full = Self::builtin_args(bi, args.iter().cloned());
                self.apply_builtin(bi, &full);
            }
            Value::Function(func) => self.call_function_with_args(func, args),
            other => {
                let ty = other.value_type().name();
                self.set_error(ErrorCode::NotCallable, format!("a value of type {ty} is not callable"));
            }
        }
    }
}
