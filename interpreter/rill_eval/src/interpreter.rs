//! Tree-walking interpreter for Rill.
//!
//! Evaluation dispatches on [`ExprKind`]. Control flow (`if`, `while`,
//! `let`, `set`) is spelled as calls and intercepted by callee name before
//! argument evaluation, so branches and loop bodies evaluate lazily — which
//! is exactly what makes statement counters inside them count dynamic
//! executions, not syntactic occurrences.
//!
//! A [`Counted`](ExprKind::Counted) node records its key on the attached
//! [`CounterSink`] (if any) and then evaluates its inner expression
//! unchanged; instrumentation is value-transparent by construction.

use std::ops::{Deref, DerefMut};

use rill_ir::{ExprArena, ExprId, ExprKind, Name, Param, StringInterner};

use crate::errors::{
    arity_mismatch, immutable_binding, invalid_special_form, no_dispatch_impl, not_callable,
    recursion_limit_exceeded, type_mismatch, undefined_variable,
};
use crate::{
    install_builtins, AssignError, Environment, EvalError, EvalResult, FunctionValue, Mutability,
    SharedCounterSink, Value,
};

/// Maximum nested call depth before evaluation aborts.
pub const MAX_CALL_DEPTH: usize = 200;

/// Pre-interned special-form names, checked on every call by `Name`
/// comparison instead of string lookup.
#[derive(Clone, Copy)]
struct SpecialNames {
    if_: Name,
    while_: Name,
    let_: Name,
    set_: Name,
}

impl SpecialNames {
    fn new(interner: &StringInterner) -> Self {
        SpecialNames {
            if_: interner.intern("if"),
            while_: interner.intern("while"),
            let_: interner.intern("let"),
            set_: interner.intern("set"),
        }
    }
}

/// The interpreter.
///
/// Borrows the module's expression arena and interner; owns its
/// environment. One interpreter evaluates one module at a time.
pub struct Interpreter<'a> {
    pub env: Environment,
    arena: &'a ExprArena,
    interner: &'a StringInterner,
    counters: Option<SharedCounterSink>,
    special: SpecialNames,
    depth: usize,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter with a fresh environment and builtins
    /// installed.
    pub fn new(arena: &'a ExprArena, interner: &'a StringInterner) -> Self {
        let mut env = Environment::new();
        install_builtins(&mut env, interner);
        Self::with_env(arena, interner, env)
    }

    /// Create an interpreter over an existing environment.
    ///
    /// The environment is used as-is; builtins are not installed.
    pub fn with_env(arena: &'a ExprArena, interner: &'a StringInterner, env: Environment) -> Self {
        Interpreter {
            env,
            arena,
            interner,
            counters: None,
            special: SpecialNames::new(interner),
            depth: 0,
        }
    }

    /// Attach a counter sink for the duration of a coverage session.
    pub fn set_counter_sink(&mut self, sink: SharedCounterSink) {
        self.counters = Some(sink);
    }

    /// The arena this interpreter evaluates against.
    pub fn arena(&self) -> &'a ExprArena {
        self.arena
    }

    /// The interner naming this interpreter's identifiers.
    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    /// Evaluate an expression.
    pub fn eval(&mut self, id: ExprId) -> EvalResult {
        match self.arena.kind(id) {
            ExprKind::Int(n) => Ok(Value::Int(n)),
            ExprKind::Bool(b) => Ok(Value::Bool(b)),
            ExprKind::Str(name) => Ok(Value::string(self.interner.lookup(name))),
            ExprKind::Unit => Ok(Value::Unit),
            ExprKind::Missing => Ok(Value::Missing),
            ExprKind::Ident(name) => self
                .env
                .lookup(name)
                .ok_or_else(|| undefined_variable(self.interner.lookup(name))),
            ExprKind::Call { callee, args } => self.eval_call(callee, args),
            ExprKind::Lambda { params, body } => {
                let captures = self.env.capture();
                Ok(Value::Function(FunctionValue::new(
                    Name::EMPTY,
                    params,
                    body,
                    captures,
                )))
            }
            ExprKind::Block { stmts, .. } => {
                let stmts = self.arena.expr_list(stmts).to_vec();
                let mut result = Value::Unit;
                for stmt in stmts {
                    result = self.eval(stmt)?;
                }
                Ok(result)
            }
            ExprKind::Counted { key, inner } => {
                if let Some(sink) = &self.counters {
                    sink.record(key);
                }
                self.eval(inner)
            }
            ExprKind::Error => Err(EvalError::new("cannot evaluate a parse-error node")),
        }
    }

    /// Call a callable value with already-evaluated arguments.
    pub fn call(&mut self, callee: &Value, args: Vec<Value>) -> EvalResult {
        match callee {
            Value::Function(f) => self.call_function(f, args),
            Value::Native(f, _) => f(&args),
            Value::Dispatch(table) => {
                let Some(first) = args.first() else {
                    return Err(arity_mismatch(self.interner.lookup(table.name), 1, 0));
                };
                let signature = self.interner.intern(first.type_name());
                match table.get(signature) {
                    Some(f) => self.call_function(&f, args),
                    None => Err(no_dispatch_impl(
                        self.interner.lookup(table.name),
                        first.type_name(),
                    )),
                }
            }
            other => Err(not_callable(other.type_name())),
        }
    }

    fn eval_call(&mut self, callee: ExprId, args: rill_ir::ExprRange) -> EvalResult {
        let args = self.arena.expr_list(args).to_vec();

        // Special forms are recognized by callee name before any argument
        // evaluates; their arguments are thunks, not values. The callee
        // itself never evaluates on this path, so counter wrappers around
        // it are recorded here.
        if let Some(name) = self.ident_name(callee) {
            if name == self.special.if_ {
                self.record_wrappers(callee);
                return self.eval_if(&args);
            }
            if name == self.special.while_ {
                self.record_wrappers(callee);
                return self.eval_while(&args);
            }
            if name == self.special.let_ {
                self.record_wrappers(callee);
                return self.eval_let(&args);
            }
            if name == self.special.set_ {
                self.record_wrappers(callee);
                return self.eval_set(&args);
            }
        }

        let callee = self.eval(callee)?;
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg)?);
        }
        self.call(&callee, values)
    }

    fn call_function(&mut self, f: &FunctionValue, args: Vec<Value>) -> EvalResult {
        if self.depth >= MAX_CALL_DEPTH {
            return Err(recursion_limit_exceeded(self.depth));
        }
        let params: Vec<Param> = self.arena.params(f.params).to_vec();
        if args.len() > params.len() {
            return Err(arity_mismatch(
                self.diag_name(f.name),
                params.len(),
                args.len(),
            ));
        }

        let mut frame = self.enter_frame();
        for (name, value) in f.captures() {
            frame.env.define(*name, value.clone(), Mutability::Immutable);
        }
        for (i, param) in params.iter().enumerate() {
            let supplied = args.get(i).cloned().unwrap_or(Value::Missing);
            let value = match supplied {
                // Defaults evaluate in the callee's frame, so instrumented
                // default expressions count like any other statement.
                Value::Missing if param.default.is_present() => frame.eval(param.default)?,
                Value::Missing => {
                    let name = frame.diag_name(f.name).to_owned();
                    return Err(arity_mismatch(name, params.len(), i));
                }
                value => value,
            };
            frame.env.define(param.name, value, Mutability::Mutable);
        }
        frame.eval(f.body)
    }

    fn eval_if(&mut self, args: &[ExprId]) -> EvalResult {
        if args.len() != 2 && args.len() != 3 {
            return Err(invalid_special_form(
                "if",
                format!("expected 2 or 3 arguments, got {}", args.len()),
            ));
        }
        if self.truthy(args[0])? {
            self.eval(args[1])
        } else if let Some(else_branch) = args.get(2) {
            self.eval(*else_branch)
        } else {
            Ok(Value::Unit)
        }
    }

    fn eval_while(&mut self, args: &[ExprId]) -> EvalResult {
        if args.len() != 2 {
            return Err(invalid_special_form(
                "while",
                format!("expected 2 arguments, got {}", args.len()),
            ));
        }
        while self.truthy(args[0])? {
            self.eval(args[1])?;
        }
        Ok(Value::Unit)
    }

    fn eval_let(&mut self, args: &[ExprId]) -> EvalResult {
        let name = self.binding_target("let", args)?;
        let value = self.eval(args[1])?;
        self.env.define(name, value.clone(), Mutability::Mutable);
        Ok(value)
    }

    fn eval_set(&mut self, args: &[ExprId]) -> EvalResult {
        let name = self.binding_target("set", args)?;
        let value = self.eval(args[1])?;
        match self.env.assign(name, value.clone()) {
            Ok(()) => Ok(value),
            Err(AssignError::Immutable) => Err(immutable_binding(self.interner.lookup(name))),
            Err(AssignError::Undefined) => Err(undefined_variable(self.interner.lookup(name))),
        }
    }

    fn binding_target(&self, form: &'static str, args: &[ExprId]) -> Result<Name, EvalError> {
        if args.len() != 2 {
            return Err(invalid_special_form(
                form,
                format!("expected 2 arguments, got {}", args.len()),
            ));
        }
        let name = self.ident_name(args[0]).ok_or_else(|| {
            invalid_special_form(form, "first argument must be an identifier".to_owned())
        })?;
        // The target is resolved by name, not evaluated; its wrappers are
        // recorded explicitly so their counts stay exact.
        self.record_wrappers(args[0]);
        Ok(name)
    }

    /// Resolve an identifier, looking through counter wrappers.
    fn ident_name(&self, id: ExprId) -> Option<Name> {
        match self.arena.kind(id) {
            ExprKind::Ident(name) => Some(name),
            ExprKind::Counted { inner, .. } => self.ident_name(inner),
            _ => None,
        }
    }

    /// Record the counters wrapped around a node that gets resolved by
    /// name instead of evaluated (special-form callees, binding targets).
    fn record_wrappers(&self, id: ExprId) {
        if let ExprKind::Counted { key, inner } = self.arena.kind(id) {
            if let Some(sink) = &self.counters {
                sink.record(key);
            }
            self.record_wrappers(inner);
        }
    }

    fn truthy(&mut self, cond: ExprId) -> Result<bool, EvalError> {
        match self.eval(cond)? {
            Value::Bool(b) => Ok(b),
            other => Err(type_mismatch("bool", other.type_name())),
        }
    }

    fn diag_name(&self, name: Name) -> &'a str {
        if name == Name::EMPTY {
            "<lambda>"
        } else {
            self.interner.lookup(name)
        }
    }

    fn enter_frame(&mut self) -> CallFrame<'_, 'a> {
        self.depth += 1;
        let child = self.env.child();
        let saved = std::mem::replace(&mut self.env, child);
        self.env.push_scope();
        CallFrame {
            interpreter: self,
            saved: Some(saved),
        }
    }
}

/// RAII guard for a function call frame.
///
/// Swaps in a child environment (shared global, fresh local scope) and
/// restores the caller's environment on drop — including when an argument
/// default or the body exits with `?`.
struct CallFrame<'guard, 'a> {
    interpreter: &'guard mut Interpreter<'a>,
    saved: Option<Environment>,
}

impl Drop for CallFrame<'_, '_> {
    fn drop(&mut self) {
        if let Some(env) = self.saved.take() {
            self.interpreter.env = env;
        }
        self.interpreter.depth -= 1;
    }
}

impl<'a> Deref for CallFrame<'_, 'a> {
    type Target = Interpreter<'a>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for CallFrame<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rill_ir::AstBuilder;
    use rustc_hash::FxHashMap;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn eval_ok(interp: &mut Interpreter<'_>, id: ExprId) -> Value {
        match interp.eval(id) {
            Ok(value) => value,
            Err(e) => panic!("evaluation failed: {e}"),
        }
    }

    struct RecordingSink(RefCell<Vec<Name>>);

    impl crate::CounterSink for RecordingSink {
        fn record(&self, key: Name) {
            self.0.borrow_mut().push(key);
        }
    }

    #[test]
    fn arithmetic_program() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let mut b = AstBuilder::new(&mut arena, &interner);

        // add(mul(2, 3), 4)
        let two = b.int(2);
        let three = b.int(3);
        let product = b.call_named("mul", &[two, three]);
        let four = b.int(4);
        let sum = b.call_named("add", &[product, four]);

        let mut interp = Interpreter::new(&arena, &interner);
        assert_eq!(eval_ok(&mut interp, sum), Value::Int(10));
    }

    #[test]
    fn if_evaluates_one_branch_lazily() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let mut b = AstBuilder::new(&mut arena, &interner);

        // if(true, 1, undefined_name) — the dead branch must not evaluate
        let cond = b.bool(true);
        let then = b.int(1);
        let dead = b.ident("nope");
        let expr = b.call_named("if", &[cond, then, dead]);

        let mut interp = Interpreter::new(&arena, &interner);
        assert_eq!(eval_ok(&mut interp, expr), Value::Int(1));
    }

    #[test]
    fn if_without_else_yields_unit() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let mut b = AstBuilder::new(&mut arena, &interner);

        let cond = b.bool(false);
        let then = b.int(1);
        let expr = b.call_named("if", &[cond, then]);

        let mut interp = Interpreter::new(&arena, &interner);
        assert_eq!(eval_ok(&mut interp, expr), Value::Unit);
    }

    #[test]
    fn while_loop_counts_down() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let mut b = AstBuilder::new(&mut arena, &interner);

        // let(n, 3); while(gt(n, 0), set(n, sub(n, 1))); n
        let n0 = b.ident("n");
        let three = b.int(3);
        let init = b.call_named("let", &[n0, three]);

        let n1 = b.ident("n");
        let zero = b.int(0);
        let cond = b.call_named("gt", &[n1, zero]);
        let n2 = b.ident("n");
        let n3 = b.ident("n");
        let one = b.int(1);
        let dec = b.call_named("sub", &[n3, one]);
        let assign = b.call_named("set", &[n2, dec]);
        let loop_ = b.call_named("while", &[cond, assign]);

        let n4 = b.ident("n");
        let program = b.bare_block(&[init, loop_, n4]);

        let mut interp = Interpreter::new(&arena, &interner);
        assert_eq!(eval_ok(&mut interp, program), Value::Int(0));
    }

    #[test]
    fn function_call_binds_params_and_defaults() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let mut b = AstBuilder::new(&mut arena, &interner);

        // f = fn(x, y = 10) add(x, y)
        let default = b.int(10);
        let x = b.param("x");
        let y = b.param_default("y", default);
        let xr = b.ident("x");
        let yr = b.ident("y");
        let body = b.call_named("add", &[xr, yr]);
        let f = b.lambda(&[x, y], body);

        let fi = b.ident("f");
        let one = b.int(1);
        let two = b.int(2);
        let both = b.call(fi, &[one, two]);

        let fi2 = b.ident("f");
        let five = b.int(5);
        let defaulted = b.call(fi2, &[five]);

        let fname = interner.intern("f");
        let mut interp = Interpreter::new(&arena, &interner);
        let fval = eval_ok(&mut interp, f);
        interp.env.define_global(fname, fval, Mutability::Immutable);

        assert_eq!(eval_ok(&mut interp, both), Value::Int(3));
        assert_eq!(eval_ok(&mut interp, defaulted), Value::Int(15));
    }

    #[test]
    fn missing_placeholder_triggers_default() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let mut b = AstBuilder::new(&mut arena, &interner);

        let default = b.int(7);
        let x = b.param_default("x", default);
        let body = b.ident("x");
        let f = b.lambda(&[x], body);

        let fi = b.ident("f");
        let missing = b.missing();
        let call = b.call(fi, &[missing]);

        let fname = interner.intern("f");
        let mut interp = Interpreter::new(&arena, &interner);
        let fval = eval_ok(&mut interp, f);
        interp.env.define_global(fname, fval, Mutability::Immutable);
        assert_eq!(eval_ok(&mut interp, call), Value::Int(7));
    }

    #[test]
    fn recursion_runs_and_is_bounded() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let mut b = AstBuilder::new(&mut arena, &interner);

        // fact = fn(n) if(gt(n, 1), mul(n, fact(sub(n, 1))), 1)
        let n = b.param("n");
        let nr = b.ident("n");
        let one = b.int(1);
        let cond = b.call_named("gt", &[nr, one]);
        let nr2 = b.ident("n");
        let one2 = b.int(1);
        let n_minus = b.call_named("sub", &[nr2, one2]);
        let rec = b.call_named("fact", &[n_minus]);
        let nr3 = b.ident("n");
        let product = b.call_named("mul", &[nr3, rec]);
        let one3 = b.int(1);
        let body = b.call_named("if", &[cond, product, one3]);
        let f = b.lambda(&[n], body);

        let fi = b.ident("fact");
        let five = b.int(5);
        let call = b.call(fi, &[five]);

        // g calls itself forever.
        let gi = b.ident("g");
        let unit = b.unit();
        let gbody = b.call(gi, &[unit]);
        let ignored = b.param("ignored");
        let g = b.lambda(&[ignored], gbody);
        let gi2 = b.ident("g");
        let unit2 = b.unit();
        let gcall = b.call(gi2, &[unit2]);

        let fname = interner.intern("fact");
        let gname = interner.intern("g");
        let mut interp = Interpreter::new(&arena, &interner);
        let fval = eval_ok(&mut interp, f);
        interp.env.define_global(fname, fval, Mutability::Immutable);
        assert_eq!(eval_ok(&mut interp, call), Value::Int(120));

        // Unbounded recursion errors out instead of blowing the stack.
        let mut interp = Interpreter::new(&arena, &interner);
        let gval = eval_ok(&mut interp, g);
        interp.env.define_global(gname, gval, Mutability::Immutable);
        let err = interp.eval(gcall);
        assert!(matches!(
            err,
            Err(EvalError {
                kind: crate::EvalErrorKind::RecursionLimit { .. },
                ..
            })
        ));
    }

    #[test]
    fn dispatch_routes_on_first_argument_type() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let mut b = AstBuilder::new(&mut arena, &interner);

        // describe :: int -> 1 ; describe :: str -> 2
        let xi = b.param("x");
        let one = b.int(1);
        let int_impl = b.lambda(&[xi], one);
        let xs = b.param("x");
        let two = b.int(2);
        let str_impl = b.lambda(&[xs], two);

        let di = b.ident("describe");
        let arg_int = b.int(42);
        let call_int = b.call(di, &[arg_int]);
        let di2 = b.ident("describe");
        let arg_str = b.str("hi");
        let call_str = b.call(di2, &[arg_str]);
        let di3 = b.ident("describe");
        let arg_bool = b.bool(true);
        let call_bool = b.call(di3, &[arg_bool]);

        let dname = interner.intern("describe");
        let mut interp = Interpreter::new(&arena, &interner);
        let table = crate::DispatchTable::new(dname);
        let (int_f, str_f) = match (eval_ok(&mut interp, int_impl), eval_ok(&mut interp, str_impl))
        {
            (Value::Function(a), Value::Function(b)) => (a, b),
            other => panic!("expected functions, got {other:?}"),
        };
        table.register(interner.intern("int"), int_f);
        table.register(interner.intern("str"), str_f);
        interp
            .env
            .define_global(dname, Value::Dispatch(table), Mutability::Immutable);

        assert_eq!(eval_ok(&mut interp, call_int), Value::Int(1));
        assert_eq!(eval_ok(&mut interp, call_str), Value::Int(2));
        assert!(matches!(
            interp.eval(call_bool),
            Err(EvalError {
                kind: crate::EvalErrorKind::NoDispatchImpl { .. },
                ..
            })
        ));
    }

    #[test]
    fn counted_records_and_stays_transparent() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let key = interner.intern("file.rill:0:5");

        let inner = arena.push_synthetic(ExprKind::Int(9));
        let counted = arena.push_synthetic(ExprKind::Counted { key, inner });

        let sink = Rc::new(RecordingSink(RefCell::new(Vec::new())));
        let mut interp = Interpreter::new(&arena, &interner);
        interp.set_counter_sink(sink.clone());

        assert_eq!(eval_ok(&mut interp, counted), Value::Int(9));
        assert_eq!(eval_ok(&mut interp, counted), Value::Int(9));
        assert_eq!(*sink.0.borrow(), vec![key, key]);
    }

    #[test]
    fn special_form_dispatch_looks_through_counted_callee() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();

        // if(true, 1, 2) with the `if` ident itself counter-wrapped, as the
        // instrumenter produces for a positioned callee.
        let key = interner.intern("m.rill:0:2");
        let if_ident = arena.push_synthetic(ExprKind::Ident(interner.intern("if")));
        let callee = arena.push_synthetic(ExprKind::Counted {
            key,
            inner: if_ident,
        });
        let cond = arena.push_synthetic(ExprKind::Bool(true));
        let one = arena.push_synthetic(ExprKind::Int(1));
        let two = arena.push_synthetic(ExprKind::Int(2));
        let args = arena.push_expr_list(&[cond, one, two]);
        let call = arena.push_synthetic(ExprKind::Call { callee, args });

        let sink = Rc::new(RecordingSink(RefCell::new(Vec::new())));
        let mut interp = Interpreter::new(&arena, &interner);
        interp.set_counter_sink(sink.clone());

        assert_eq!(eval_ok(&mut interp, call), Value::Int(1));
        assert_eq!(*sink.0.borrow(), vec![key]);
    }

    #[test]
    fn counted_binding_target_records_and_binds() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();

        // let(x, 5); x — with the target ident counter-wrapped.
        let key = interner.intern("m.rill:4:5");
        let x_ident = arena.push_synthetic(ExprKind::Ident(interner.intern("x")));
        let target = arena.push_synthetic(ExprKind::Counted {
            key,
            inner: x_ident,
        });
        let five = arena.push_synthetic(ExprKind::Int(5));
        let (binding, x_ref) = {
            let mut b = AstBuilder::new(&mut arena, &interner);
            let let_ident = b.ident("let");
            (b.call(let_ident, &[target, five]), b.ident("x"))
        };

        let sink = Rc::new(RecordingSink(RefCell::new(Vec::new())));
        let mut interp = Interpreter::new(&arena, &interner);
        interp.set_counter_sink(sink.clone());

        assert_eq!(eval_ok(&mut interp, binding), Value::Int(5));
        assert_eq!(eval_ok(&mut interp, x_ref), Value::Int(5));
        assert_eq!(*sink.0.borrow(), vec![key]);
    }

    #[test]
    fn closure_captures_locals() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let mut b = AstBuilder::new(&mut arena, &interner);

        // outer = fn(a) fn(unused) a ; outer(11)(()) == 11
        let a_ref = b.ident("a");
        let unused = b.param("unused");
        let inner = b.lambda(&[unused], a_ref);
        let a = b.param("a");
        let outer = b.lambda(&[a], inner);

        let oi = b.ident("outer");
        let eleven = b.int(11);
        let outer_call = b.call(oi, &[eleven]);
        let unit = b.unit();
        let full = b.call(outer_call, &[unit]);

        let oname = interner.intern("outer");
        let mut interp = Interpreter::new(&arena, &interner);
        let oval = eval_ok(&mut interp, outer);
        interp.env.define_global(oname, oval, Mutability::Immutable);
        assert_eq!(eval_ok(&mut interp, full), Value::Int(11));
    }

    #[test]
    fn let_returns_value_and_defines() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let mut b = AstBuilder::new(&mut arena, &interner);

        let x = b.ident("x");
        let v = b.int(5);
        let binding = b.call_named("let", &[x, v]);
        let x2 = b.ident("x");
        let program = b.bare_block(&[binding, x2]);

        let mut interp = Interpreter::new(&arena, &interner);
        assert_eq!(eval_ok(&mut interp, program), Value::Int(5));
    }

    #[test]
    fn lambdas_capture_nothing_global() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let mut b = AstBuilder::new(&mut arena, &interner);
        let body = b.int(0);
        let f = b.lambda(&[], body);

        let mut interp = Interpreter::new(&arena, &interner);
        match eval_ok(&mut interp, f) {
            Value::Function(func) => assert_eq!(func.captures(), &FxHashMap::default()),
            other => panic!("expected function, got {other:?}"),
        }
    }
}
