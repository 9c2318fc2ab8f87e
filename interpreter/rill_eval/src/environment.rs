//! Variable scoping for the interpreter.
//!
//! A scope stack over `Rc<RefCell<_>>` links: cheap to push and pop, and
//! individual scopes can be handed out as [`LocalScope<Scope>`] values — the
//! coverage core holds one as the "scope" whose bindings it instruments and
//! rebinds.

// Rc is the intentional implementation of LocalScope<T>; the interpreter is
// single-threaded.
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use rill_ir::Name;

use crate::Value;

/// Whether a binding can be reassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    Mutable,
    Immutable,
}

impl Mutability {
    /// Returns `true` if this is `Mutable`.
    #[inline]
    pub fn is_mutable(self) -> bool {
        matches!(self, Mutability::Mutable)
    }
}

/// Error returned by `Scope::assign` when assignment fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// Binding exists but is immutable.
    Immutable,
    /// Binding not found in any scope.
    Undefined,
}

/// Single-threaded shared handle with interior mutability.
///
/// Wraps `Rc<RefCell<T>>` so all scope (and counter-store) sharing goes
/// through one factory type. `#[repr(transparent)]`, so the wrapper is
/// layout-free.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    /// Create a new handle wrapping the given value.
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    /// Borrow the inner value immutably.
    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    /// Borrow the inner value mutably.
    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// True if both handles point at the same allocation.
    #[inline]
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A variable binding.
#[derive(Clone, Debug)]
struct Binding {
    value: Value,
    mutability: Mutability,
}

/// A single scope containing variable bindings.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    bindings: FxHashMap<Name, Binding>,
    /// Parent scope, for lexical lookup.
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    /// Create a new empty scope with no parent.
    pub fn new() -> Self {
        Scope::default()
    }

    /// Create a new scope with a parent.
    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    /// Define a binding in this scope.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value, mutability: Mutability) {
        self.bindings.insert(name, Binding { value, mutability });
    }

    /// Look up a binding by name, searching parents.
    pub fn lookup(&self, name: Name) -> Option<Value> {
        if let Some(binding) = self.bindings.get(&name) {
            return Some(binding.value.clone());
        }
        if let Some(parent) = &self.parent {
            return parent.borrow().lookup(name);
        }
        None
    }

    /// Assign to an existing binding, searching parents.
    pub fn assign(&mut self, name: Name, value: Value) -> Result<(), AssignError> {
        if let Some(binding) = self.bindings.get_mut(&name) {
            if !binding.mutability.is_mutable() {
                return Err(AssignError::Immutable);
            }
            binding.value = value;
            return Ok(());
        }
        if let Some(parent) = &self.parent {
            return parent.borrow_mut().assign(name, value);
        }
        Err(AssignError::Undefined)
    }

    /// Replace a binding's value in place, keeping its mutability.
    ///
    /// Unlike [`assign`](Scope::assign) this ignores immutability and never
    /// searches parents; it is the primitive the coverage swap machinery
    /// uses to substitute and restore function bindings.
    pub fn rebind(&mut self, name: Name, value: Value) {
        match self.bindings.get_mut(&name) {
            Some(binding) => binding.value = value,
            None => self.define(name, value, Mutability::Immutable),
        }
    }

    /// All bindings directly in this scope (parents excluded), in
    /// deterministic name order.
    ///
    /// Used by the coverage orchestrator to enumerate candidates.
    pub fn entries(&self) -> Vec<(Name, Value)> {
        let mut entries: Vec<(Name, Value)> = self
            .bindings
            .iter()
            .map(|(name, binding)| (*name, binding.value.clone()))
            .collect();
        entries.sort_unstable_by_key(|(name, _)| *name);
        entries
    }
}

/// Environment: a stack of scopes with a shared global at the bottom.
pub struct Environment {
    scopes: Vec<LocalScope<Scope>>,
    global: LocalScope<Scope>,
}

impl Environment {
    /// Create a new environment with a fresh global scope.
    pub fn new() -> Self {
        let global = LocalScope::new(Scope::new());
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }

    /// Push a new scope onto the stack.
    #[inline]
    pub fn push_scope(&mut self) {
        let parent = self.current_scope();
        self.scopes.push(LocalScope::new(Scope::with_parent(parent)));
    }

    /// Pop the current scope (the global scope is never popped).
    #[inline]
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    #[inline]
    fn current_scope(&self) -> LocalScope<Scope> {
        self.scopes.last().unwrap_or(&self.global).clone()
    }

    /// Define a binding in the current scope.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value, mutability: Mutability) {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow_mut()
            .define(name, value, mutability);
    }

    /// Look up a binding by name.
    #[inline]
    pub fn lookup(&self, name: Name) -> Option<Value> {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow()
            .lookup(name)
    }

    /// Assign to an existing binding.
    #[inline]
    pub fn assign(&mut self, name: Name, value: Value) -> Result<(), AssignError> {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow_mut()
            .assign(name, value)
    }

    /// Define a global binding.
    pub fn define_global(&mut self, name: Name, value: Value, mutability: Mutability) {
        self.global.borrow_mut().define(name, value, mutability);
    }

    /// Handle to the global scope.
    ///
    /// This is the enumerable name→value scope a coverage session swaps
    /// bindings in; rebinding through the handle is visible to every
    /// environment sharing the global.
    pub fn global_scope(&self) -> LocalScope<Scope> {
        self.global.clone()
    }

    /// Child environment for function calls: shares the global scope, with
    /// an empty local stack.
    #[must_use]
    pub fn child(&self) -> Self {
        let global = self.global.clone();
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }

    /// Capture the visible local bindings for a closure.
    ///
    /// Global bindings are deliberately excluded: globals stay shared by
    /// reference through [`Environment::child`], so a closure always sees
    /// the live global binding — including one a coverage session has
    /// swapped — rather than a frozen copy.
    pub fn capture(&self) -> FxHashMap<Name, Value> {
        fn collect(
            scope: &LocalScope<Scope>,
            global: &LocalScope<Scope>,
            captures: &mut FxHashMap<Name, Value>,
        ) {
            if scope.same(global) {
                return;
            }
            for (name, binding) in &scope.borrow().bindings {
                captures
                    .entry(*name)
                    .or_insert_with(|| binding.value.clone());
            }
            if let Some(parent) = scope.borrow().parent.clone() {
                collect(&parent, global, captures);
            }
        }
        let mut captures = FxHashMap::default();
        collect(&self.current_scope(), &self.global, &mut captures);
        captures
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_ir::StringInterner;

    #[test]
    fn define_and_lookup() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let mut env = Environment::new();
        env.define(x, Value::Int(42), Mutability::Immutable);
        assert_eq!(env.lookup(x), Some(Value::Int(42)));
    }

    #[test]
    fn shadowing_via_scope_stack() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let mut env = Environment::new();
        env.define(x, Value::Int(1), Mutability::Immutable);
        env.push_scope();
        env.define(x, Value::Int(2), Mutability::Immutable);
        assert_eq!(env.lookup(x), Some(Value::Int(2)));
        env.pop_scope();
        assert_eq!(env.lookup(x), Some(Value::Int(1)));
    }

    #[test]
    fn assign_respects_mutability() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let mut env = Environment::new();
        env.define(x, Value::Int(1), Mutability::Mutable);
        assert_eq!(env.assign(x, Value::Int(2)), Ok(()));
        assert_eq!(env.lookup(x), Some(Value::Int(2)));

        env.define(x, Value::Int(3), Mutability::Immutable);
        assert_eq!(env.assign(x, Value::Int(4)), Err(AssignError::Immutable));
    }

    #[test]
    fn assign_undefined_fails() {
        let interner = StringInterner::new();
        let y = interner.intern("y");
        let mut env = Environment::new();
        assert_eq!(env.assign(y, Value::Unit), Err(AssignError::Undefined));
    }

    #[test]
    fn child_shares_global() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let mut env = Environment::new();
        env.define_global(x, Value::Int(99), Mutability::Immutable);
        let child = env.child();
        assert_eq!(child.lookup(x), Some(Value::Int(99)));
        assert!(env.global_scope().same(&child.global_scope()));
    }

    #[test]
    fn rebinding_through_global_handle_is_visible() {
        let interner = StringInterner::new();
        let f = interner.intern("f");

        let mut env = Environment::new();
        env.define_global(f, Value::Int(1), Mutability::Immutable);

        let handle = env.global_scope();
        handle
            .borrow_mut()
            .define(f, Value::Int(2), Mutability::Immutable);
        assert_eq!(env.lookup(f), Some(Value::Int(2)));
    }

    #[test]
    fn entries_are_name_ordered() {
        let interner = StringInterner::new();
        let a = interner.intern("a");
        let b = interner.intern("b");

        let mut env = Environment::new();
        env.define(b, Value::Int(2), Mutability::Immutable);
        env.define(a, Value::Int(1), Mutability::Immutable);

        let entries = env.global_scope().borrow().entries();
        let names: Vec<Name> = entries.iter().map(|(n, _)| *n).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn capture_sees_locals_but_not_globals() {
        let interner = StringInterner::new();
        let g = interner.intern("g");
        let x = interner.intern("x");
        let y = interner.intern("y");

        let mut env = Environment::new();
        env.define_global(g, Value::Int(0), Mutability::Immutable);
        env.push_scope();
        env.define(x, Value::Int(1), Mutability::Immutable);
        env.push_scope();
        env.define(y, Value::Int(2), Mutability::Immutable);

        let captures = env.capture();
        assert_eq!(captures.get(&x), Some(&Value::Int(1)));
        assert_eq!(captures.get(&y), Some(&Value::Int(2)));
        assert_eq!(captures.get(&g), None);
    }
}
