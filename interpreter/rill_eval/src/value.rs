//! Runtime values for the Rill interpreter.
//!
//! Values are single-threaded: heap variants use `Rc`, matching the
//! interpreter's cooperative, synchronous execution model. Function bodies
//! are `ExprId`s into the module's expression arena; values never own
//! syntax.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use rill_ir::{ExprId, Name, ParamRange};

use crate::EvalError;

/// Native (built-in) function signature.
pub type NativeFn = fn(&[Value]) -> Result<Value, EvalError>;

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    /// Integer value.
    Int(i64),
    /// Boolean value.
    Bool(bool),
    /// String value.
    Str(Rc<str>),
    /// Unit value.
    Unit,
    /// Absent argument placeholder; binding it to a parameter triggers the
    /// parameter's default.
    Missing,
    /// List of values.
    List(Rc<Vec<Value>>),
    /// Function value (closure).
    Function(FunctionValue),
    /// Built-in function with its display name.
    Native(NativeFn, &'static str),
    /// Dispatch table: one name routing to per-type implementations.
    Dispatch(DispatchTable),
}

impl Value {
    /// String value from anything stringy.
    pub fn string(s: impl AsRef<str>) -> Value {
        Value::Str(Rc::from(s.as_ref()))
    }

    /// List value.
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(items))
    }

    /// Runtime type name, used for dispatch and diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Str(_) => "str",
            Value::Unit => "unit",
            Value::Missing => "missing",
            Value::List(_) => "list",
            Value::Function(_) => "function",
            Value::Native(..) => "native",
            Value::Dispatch(_) => "dispatch",
        }
    }

    /// True for values a coverage session can instrument or invoke.
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Function(_) | Value::Native(..) | Value::Dispatch(_)
        )
    }

    /// Structurally independent copy.
    ///
    /// The copy shares no mutable structure with `self`: capture maps and
    /// dispatch registries are rebuilt, element-wise deep-copied. Used by
    /// the coverage core to record a restoration value that stays correct
    /// even if the live value is mutated in place during a session.
    pub fn deep_copy(&self) -> Value {
        match self {
            Value::Int(n) => Value::Int(*n),
            Value::Bool(b) => Value::Bool(*b),
            Value::Str(s) => Value::Str(Rc::clone(s)),
            Value::Unit => Value::Unit,
            Value::Missing => Value::Missing,
            Value::List(items) => {
                Value::List(Rc::new(items.iter().map(Value::deep_copy).collect()))
            }
            Value::Function(f) => Value::Function(f.deep_copy()),
            Value::Native(f, name) => Value::Native(*f, name),
            Value::Dispatch(table) => Value::Dispatch(table.deep_copy()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Unit, Value::Unit) | (Value::Missing, Value::Missing) => true,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Native(a, _), Value::Native(b, _)) => std::ptr::fn_addr_eq(*a, *b),
            (Value::Dispatch(a), Value::Dispatch(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Unit => write!(f, "()"),
            Value::Missing => write!(f, "<missing>"),
            Value::List(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Function(func) => write!(f, "<fn {:?}>", func.name),
            Value::Native(_, name) => write!(f, "<native {name}>"),
            Value::Dispatch(table) => write!(f, "<dispatch {:?}>", table.name),
        }
    }
}

/// Function value (closure).
///
/// Captures are frozen at creation; the body and parameter list are arena
/// indices into the module arena the interpreter evaluates against.
#[derive(Clone)]
pub struct FunctionValue {
    /// Binding name for diagnostics; `Name::EMPTY` for anonymous lambdas.
    pub name: Name,
    /// Parameter list (arena range).
    pub params: ParamRange,
    /// Body expression.
    pub body: ExprId,
    /// Captured environment (frozen at creation).
    captures: Rc<FxHashMap<Name, Value>>,
}

impl FunctionValue {
    /// Create a function value.
    pub fn new(name: Name, params: ParamRange, body: ExprId, captures: FxHashMap<Name, Value>) -> Self {
        FunctionValue {
            name,
            params,
            body,
            captures: Rc::new(captures),
        }
    }

    /// Captured bindings.
    pub fn captures(&self) -> &FxHashMap<Name, Value> {
        &self.captures
    }

    /// Same function with a different parameter list and body, all other
    /// attributes preserved. Used by the instrumenter.
    #[must_use]
    pub fn with_code(&self, params: ParamRange, body: ExprId) -> Self {
        FunctionValue {
            name: self.name,
            params,
            body,
            captures: Rc::clone(&self.captures),
        }
    }

    /// Structurally independent copy (fresh capture map, deep-copied values).
    pub fn deep_copy(&self) -> Self {
        let captures = self
            .captures
            .iter()
            .map(|(name, value)| (*name, value.deep_copy()))
            .collect();
        FunctionValue {
            name: self.name,
            params: self.params,
            body: self.body,
            captures: Rc::new(captures),
        }
    }
}

impl PartialEq for FunctionValue {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.params == other.params
            && self.body == other.body
            && *self.captures == *other.captures
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FunctionValue({:?}, params={:?}, body={:?})",
            self.name, self.params, self.body
        )
    }
}

/// Dispatch table: an explicit registry of per-type implementations behind
/// one name.
///
/// Calling a dispatch value routes on the first argument's runtime type
/// name. The registry is interior-mutable so a coverage session can swap a
/// single implementation in and out without rebinding the table itself.
#[derive(Clone)]
pub struct DispatchTable {
    /// The dispatched name.
    pub name: Name,
    impls: Rc<RefCell<FxHashMap<Name, FunctionValue>>>,
}

impl DispatchTable {
    /// Create an empty table.
    pub fn new(name: Name) -> Self {
        DispatchTable {
            name,
            impls: Rc::new(RefCell::new(FxHashMap::default())),
        }
    }

    /// Register (or replace) the implementation for a type signature.
    pub fn register(&self, signature: Name, implementation: FunctionValue) {
        self.impls.borrow_mut().insert(signature, implementation);
    }

    /// Look up the implementation for a type signature.
    pub fn get(&self, signature: Name) -> Option<FunctionValue> {
        self.impls.borrow().get(&signature).cloned()
    }

    /// Registered signatures, in deterministic order.
    pub fn signatures(&self) -> Vec<Name> {
        let mut signatures: Vec<Name> = self.impls.borrow().keys().copied().collect();
        signatures.sort_unstable();
        signatures
    }

    /// Structurally independent copy (fresh registry, deep-copied
    /// implementations).
    pub fn deep_copy(&self) -> Self {
        let impls = self
            .impls
            .borrow()
            .iter()
            .map(|(sig, f)| (*sig, f.deep_copy()))
            .collect();
        DispatchTable {
            name: self.name,
            impls: Rc::new(RefCell::new(impls)),
        }
    }
}

impl PartialEq for DispatchTable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && *self.impls.borrow() == *other.impls.borrow()
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DispatchTable({:?}, {} impls)",
            self.name,
            self.impls.borrow().len()
        )
    }
}
