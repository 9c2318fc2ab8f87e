//! Tree-walking evaluator for Rill.
//!
//! Evaluates [`rill_ir`] expression arenas: scope-chain environments with a
//! shared global scope, first-class functions with capture-by-value
//! closures, type-dispatched callables, and native builtins. Execution
//! counters recorded through the [`CounterSink`] seam make the evaluator
//! the substrate for coverage measurement without depending on it.

mod builtins;
mod counter;
mod environment;
mod errors;
mod interpreter;
mod value;

pub use builtins::install_builtins;
pub use counter::{CounterSink, NullCounterSink, SharedCounterSink};
pub use environment::{AssignError, Environment, LocalScope, Mutability, Scope};
pub use errors::{
    arity_mismatch, division_by_zero, immutable_binding, integer_overflow, invalid_special_form,
    no_dispatch_impl, not_callable, recursion_limit_exceeded, type_mismatch, undefined_variable,
    EvalError, EvalErrorKind, EvalResult,
};
pub use interpreter::{Interpreter, MAX_CALL_DEPTH};
pub use value::{DispatchTable, FunctionValue, NativeFn, Value};
