//! Syntax instrumentation.
//!
//! Rewrites expression trees so that executing an instrumented statement
//! first bumps a counter keyed by the statement's source position, then
//! evaluates the original expression unchanged. Wrapping never alters
//! values, side effects, or child evaluation order.
//!
//! Position hints travel exactly one level: a block hands each statement
//! its recorded position, and a positioned call hands each child the
//! child's own position. A node that consumes a hint wraps itself and
//! recurses hint-free below.

use std::fmt;

use rill_eval::FunctionValue;
use rill_ir::{ExprArena, ExprId, ExprKind, Param, SourcePos, StringInterner};

use crate::key::source_key;
use crate::store::SharedCounterStore;

/// A syntax kind the instrumenter cannot rewrite.
///
/// Aborts instrumentation of the one target that contains it; other
/// targets are unaffected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstrumentError {
    UnsupportedKind { kind: &'static str },
}

impl fmt::Display for InstrumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstrumentError::UnsupportedKind { kind } => {
                write!(f, "cannot instrument `{kind}` syntax")
            }
        }
    }
}

impl std::error::Error for InstrumentError {}

/// Tree rewriter for one instrumentation pass.
///
/// Rewritten nodes are appended to the same arena, so every original
/// `ExprId` stays valid and restoration never needs tree surgery. Each key
/// is declared on the counter store as it is minted, giving never-executed
/// statements a zero-count entry in the final snapshot.
pub struct Instrumenter<'a> {
    arena: &'a mut ExprArena,
    interner: &'a StringInterner,
    store: SharedCounterStore,
}

impl<'a> Instrumenter<'a> {
    pub fn new(
        arena: &'a mut ExprArena,
        interner: &'a StringInterner,
        store: SharedCounterStore,
    ) -> Self {
        Instrumenter {
            arena,
            interner,
            store,
        }
    }

    /// Instrumented copy of a function value.
    ///
    /// Parameter defaults and the body are rewritten; name and captures
    /// carry over untouched.
    pub fn instrument_function(
        &mut self,
        f: &FunctionValue,
    ) -> Result<FunctionValue, InstrumentError> {
        let params = self.instrument_params(f.params)?;
        let body = self.instrument_body(f.body)?;
        tracing::trace!(body = ?f.body, rewritten = ?body, "instrumented function");
        Ok(f.with_code(params, body))
    }

    fn instrument_params(
        &mut self,
        params: rill_ir::ParamRange,
    ) -> Result<rill_ir::ParamRange, InstrumentError> {
        let mut rewritten: Vec<Param> = self.arena.params(params).to_vec();
        let mut changed = false;
        for param in &mut rewritten {
            if param.default.is_present() {
                let default = self.instrument_expr(param.default, None)?;
                changed |= default != param.default;
                param.default = default;
            }
        }
        Ok(if changed {
            self.arena.push_params(&rewritten)
        } else {
            params
        })
    }

    /// Function-body rule: a single non-block expression with a recorded
    /// position gets an entry counter keyed by that position, so even a
    /// one-expression function reports how often it was entered.
    fn instrument_body(&mut self, body: ExprId) -> Result<ExprId, InstrumentError> {
        let is_block = matches!(self.arena.kind(body), ExprKind::Block { .. });
        if !is_block {
            if let Some(pos) = self.arena.pos(body) {
                let inner = self.instrument_expr(body, None)?;
                return Ok(self.wrap(inner, pos));
            }
        }
        self.instrument_expr(body, None)
    }

    /// Rewrite one expression, optionally under a position hint supplied by
    /// its parent.
    pub fn instrument_expr(
        &mut self,
        id: ExprId,
        hint: Option<SourcePos>,
    ) -> Result<ExprId, InstrumentError> {
        let kind = self.arena.kind(id);
        match kind {
            // Already instrumented: never wrap twice.
            ExprKind::Counted { .. } => Ok(id),

            // The absent-argument placeholder is a marker, not a statement.
            ExprKind::Missing => Ok(id),

            ExprKind::Int(_)
            | ExprKind::Bool(_)
            | ExprKind::Str(_)
            | ExprKind::Unit
            | ExprKind::Ident(_) => Ok(match hint {
                Some(pos) => self.wrap(id, pos),
                None => id,
            }),

            ExprKind::Call { callee, args } => {
                let own = self.arena.pos(id);
                let arg_ids = self.arena.expr_list(args).to_vec();

                // A positioned call hands each child the child's own
                // position; an unpositioned one recurses hint-free.
                let child_hint = |arena: &ExprArena, child: ExprId| {
                    if own.is_some() {
                        arena.pos(child)
                    } else {
                        None
                    }
                };

                let callee_hint = child_hint(self.arena, callee);
                let new_callee = self.instrument_expr(callee, callee_hint)?;
                let mut changed = new_callee != callee;
                let mut new_args = Vec::with_capacity(arg_ids.len());
                for arg in arg_ids {
                    let h = child_hint(self.arena, arg);
                    let new_arg = self.instrument_expr(arg, h)?;
                    changed |= new_arg != arg;
                    new_args.push(new_arg);
                }

                let rebuilt = if changed {
                    let args = self.arena.push_expr_list(&new_args);
                    self.arena.push(
                        ExprKind::Call {
                            callee: new_callee,
                            args,
                        },
                        own,
                    )
                } else {
                    id
                };
                Ok(match (own, hint) {
                    (None, Some(pos)) => self.wrap(rebuilt, pos),
                    _ => rebuilt,
                })
            }

            ExprKind::Lambda { params, body } => {
                let new_params = self.instrument_params(params)?;
                let new_body = self.instrument_body(body)?;
                if new_params == params && new_body == body {
                    return Ok(id);
                }
                let own = self.arena.pos(id);
                Ok(self.arena.push(
                    ExprKind::Lambda {
                        params: new_params,
                        body: new_body,
                    },
                    own,
                ))
            }

            ExprKind::Block { stmts, stmt_pos } => {
                let stmt_ids = self.arena.expr_list(stmts).to_vec();
                let positions = self.arena.stmt_pos(stmt_pos).to_vec();
                let has_stmt_positions = positions.iter().any(Option::is_some);

                let mut changed = false;
                let mut new_stmts = Vec::with_capacity(stmt_ids.len());
                for (i, stmt) in stmt_ids.iter().enumerate() {
                    let h = positions
                        .get(i)
                        .copied()
                        .flatten()
                        .or_else(|| self.arena.pos(*stmt));
                    let new_stmt = self.instrument_expr(*stmt, h)?;
                    changed |= new_stmt != *stmt;
                    new_stmts.push(new_stmt);
                }

                let own = self.arena.pos(id);
                let rebuilt = if changed {
                    let stmts = self.arena.push_expr_list(&new_stmts);
                    self.arena.push(ExprKind::Block { stmts, stmt_pos }, own)
                } else {
                    id
                };
                // A block that records its own statement positions is
                // already counted statement by statement; wrapping it again
                // would double-count the boundary.
                Ok(match hint {
                    Some(pos) if !has_stmt_positions => self.wrap(rebuilt, pos),
                    _ => rebuilt,
                })
            }

            ExprKind::Error => Err(InstrumentError::UnsupportedKind {
                kind: kind.label(),
            }),
        }
    }

    /// Declare the counter for `pos` and wrap `inner` in it.
    fn wrap(&mut self, inner: ExprId, pos: SourcePos) -> ExprId {
        let key = source_key(self.interner, pos);
        self.store.borrow_mut().declare(key);
        self.arena
            .push(ExprKind::Counted { key, inner }, Some(pos))
    }
}
