//! Expression node variants.
//!
//! Rill is expression-oriented: control flow (`if`, `while`, `let`, `set`)
//! is spelled as ordinary calls and recognized by the evaluator, so the
//! node-kind set stays small and closed. Every variant is traversed by the
//! coverage instrumenter; adding a kind here means teaching the instrumenter
//! about it or letting it fall into the unsupported-kind arm.

use std::fmt;

use crate::{ExprId, ExprRange, Name, ParamRange, PosRange};

/// Expression variants.
///
/// All children are arena indices, not boxes.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub enum ExprKind {
    /// Integer literal: `42`
    Int(i64),

    /// Boolean literal: `true`, `false`
    Bool(bool),

    /// String literal (interned)
    Str(Name),

    /// Unit value: `()`
    Unit,

    /// Placeholder for an absent argument or default value.
    ///
    /// Evaluates to `Value::Missing`; never receives a statement counter.
    Missing,

    /// Symbol reference
    Ident(Name),

    /// Call/application: `callee(args...)`
    Call { callee: ExprId, args: ExprRange },

    /// Function definition: `fn(params) body`
    Lambda { params: ParamRange, body: ExprId },

    /// Ordered statement list; value is the last statement's value.
    ///
    /// `stmt_pos` is a parallel pool range holding one optional source
    /// position per statement. The parser records statement positions on
    /// the enclosing block (the statements themselves stay position-free),
    /// which is what lets the instrumenter thread a position hint exactly
    /// one level down.
    Block { stmts: ExprRange, stmt_pos: PosRange },

    /// Instrumented node: bump the counter for `key`, then evaluate `inner`
    /// and return its value unchanged. Inserted by the coverage
    /// instrumenter; never produced by a parser.
    Counted { key: Name, inner: ExprId },

    /// Parse error placeholder.
    Error,
}

impl fmt::Debug for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprKind::Int(n) => write!(f, "Int({n})"),
            ExprKind::Bool(b) => write!(f, "Bool({b})"),
            ExprKind::Str(n) => write!(f, "Str({n:?})"),
            ExprKind::Unit => write!(f, "Unit"),
            ExprKind::Missing => write!(f, "Missing"),
            ExprKind::Ident(n) => write!(f, "Ident({n:?})"),
            ExprKind::Call { callee, args } => write!(f, "Call({callee:?}, {args:?})"),
            ExprKind::Lambda { params, body } => write!(f, "Lambda({params:?}, {body:?})"),
            ExprKind::Block { stmts, stmt_pos } => write!(f, "Block({stmts:?}, {stmt_pos:?})"),
            ExprKind::Counted { key, inner } => write!(f, "Counted({key:?}, {inner:?})"),
            ExprKind::Error => write!(f, "Error"),
        }
    }
}

impl ExprKind {
    /// Human-readable kind label, used in diagnostics.
    pub const fn label(&self) -> &'static str {
        match self {
            ExprKind::Int(_) => "int literal",
            ExprKind::Bool(_) => "bool literal",
            ExprKind::Str(_) => "string literal",
            ExprKind::Unit => "unit",
            ExprKind::Missing => "missing",
            ExprKind::Ident(_) => "identifier",
            ExprKind::Call { .. } => "call",
            ExprKind::Lambda { .. } => "lambda",
            ExprKind::Block { .. } => "block",
            ExprKind::Counted { .. } => "counted",
            ExprKind::Error => "error",
        }
    }
}

/// Function parameter: a name plus an optional default-value expression.
///
/// Default expressions are ordinary nodes and are instrumentable; they
/// evaluate in the callee's frame when the caller omits the argument.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub name: Name,
    /// `ExprId::INVALID` = no default.
    pub default: ExprId,
}

impl Param {
    /// Parameter without a default value.
    pub const fn required(name: Name) -> Self {
        Param {
            name,
            default: ExprId::INVALID,
        }
    }

    /// Parameter with a default-value expression.
    pub const fn with_default(name: Name, default: ExprId) -> Self {
        Param { name, default }
    }
}

// Keep ExprKind small: it is stored in a contiguous arena vector.
#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::ExprKind;
    crate::static_assert_size!(ExprKind, 24);
}
