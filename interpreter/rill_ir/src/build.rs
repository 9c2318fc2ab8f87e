//! Programmatic AST construction.
//!
//! [`AstBuilder`] is the surface the parser collaborator (and the test
//! suites) use to assemble positioned trees without hand-managing arena
//! pools. Nodes default to synthetic (no source position); `*_at` variants
//! attach one.

use crate::{
    ExprArena, ExprId, ExprKind, Name, Param, SourcePos, Span, StringInterner,
};

/// Builder over an [`ExprArena`] plus the interner that names it.
pub struct AstBuilder<'a> {
    pub arena: &'a mut ExprArena,
    pub interner: &'a StringInterner,
}

impl<'a> AstBuilder<'a> {
    /// Create a builder over the given arena and interner.
    pub fn new(arena: &'a mut ExprArena, interner: &'a StringInterner) -> Self {
        AstBuilder { arena, interner }
    }

    /// Intern a name.
    pub fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Source position in `file` covering `start..end`.
    pub fn src(&self, file: &str, start: u32, end: u32) -> SourcePos {
        SourcePos::new(self.interner.intern(file), Span::new(start, end))
    }

    /// Integer literal.
    pub fn int(&mut self, value: i64) -> ExprId {
        self.arena.push_synthetic(ExprKind::Int(value))
    }

    /// Integer literal with a source position.
    pub fn int_at(&mut self, value: i64, pos: SourcePos) -> ExprId {
        self.arena.push(ExprKind::Int(value), Some(pos))
    }

    /// Boolean literal.
    pub fn bool(&mut self, value: bool) -> ExprId {
        self.arena.push_synthetic(ExprKind::Bool(value))
    }

    /// String literal.
    pub fn str(&mut self, value: &str) -> ExprId {
        let name = self.interner.intern(value);
        self.arena.push_synthetic(ExprKind::Str(name))
    }

    /// Unit value.
    pub fn unit(&mut self) -> ExprId {
        self.arena.push_synthetic(ExprKind::Unit)
    }

    /// Missing-argument placeholder.
    pub fn missing(&mut self) -> ExprId {
        self.arena.push_synthetic(ExprKind::Missing)
    }

    /// Symbol reference.
    pub fn ident(&mut self, name: &str) -> ExprId {
        let name = self.interner.intern(name);
        self.arena.push_synthetic(ExprKind::Ident(name))
    }

    /// Symbol reference with a source position.
    pub fn ident_at(&mut self, name: &str, pos: SourcePos) -> ExprId {
        let name = self.interner.intern(name);
        self.arena.push(ExprKind::Ident(name), Some(pos))
    }

    /// Call expression.
    pub fn call(&mut self, callee: ExprId, args: &[ExprId]) -> ExprId {
        let args = self.arena.push_expr_list(args);
        self.arena.push_synthetic(ExprKind::Call { callee, args })
    }

    /// Call expression with a source position.
    pub fn call_at(&mut self, callee: ExprId, args: &[ExprId], pos: SourcePos) -> ExprId {
        let args = self.arena.push_expr_list(args);
        self.arena.push(ExprKind::Call { callee, args }, Some(pos))
    }

    /// Call to a named binding: `name(args...)`.
    pub fn call_named(&mut self, name: &str, args: &[ExprId]) -> ExprId {
        let callee = self.ident(name);
        self.call(callee, args)
    }

    /// Function definition.
    pub fn lambda(&mut self, params: &[Param], body: ExprId) -> ExprId {
        let params = self.arena.push_params(params);
        self.arena.push_synthetic(ExprKind::Lambda { params, body })
    }

    /// Required parameter.
    pub fn param(&self, name: &str) -> Param {
        Param::required(self.interner.intern(name))
    }

    /// Parameter with a default-value expression.
    pub fn param_default(&self, name: &str, default: ExprId) -> Param {
        Param::with_default(self.interner.intern(name), default)
    }

    /// Block with per-statement source positions (the parser's shape for a
    /// braced body: positions live on the block, not on the statements).
    pub fn block(&mut self, stmts: &[(ExprId, Option<SourcePos>)]) -> ExprId {
        let ids: Vec<ExprId> = stmts.iter().map(|(id, _)| *id).collect();
        let positions: Vec<Option<SourcePos>> = stmts.iter().map(|(_, p)| *p).collect();
        let stmts = self.arena.push_expr_list(&ids);
        let stmt_pos = self.arena.push_stmt_pos(&positions);
        self.arena.push_synthetic(ExprKind::Block { stmts, stmt_pos })
    }

    /// Block without any statement positions (fully synthetic).
    pub fn bare_block(&mut self, stmts: &[ExprId]) -> ExprId {
        let stmts = self.arena.push_expr_list(stmts);
        self.arena.push_synthetic(ExprKind::Block {
            stmts,
            stmt_pos: crate::PosRange::EMPTY,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_positioned_block() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let mut b = AstBuilder::new(&mut arena, &interner);

        let pos = b.src("m.rill", 0, 5);
        let one = b.int(1);
        let block = b.block(&[(one, Some(pos))]);

        match b.arena.kind(block) {
            ExprKind::Block { stmts, stmt_pos } => {
                assert_eq!(b.arena.expr_list(stmts), &[one]);
                assert_eq!(b.arena.stmt_pos(stmt_pos), &[Some(pos)]);
            }
            other => panic!("expected block, got {other:?}"),
        }
    }

    #[test]
    fn call_named_resolves_callee() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let mut b = AstBuilder::new(&mut arena, &interner);

        let arg = b.int(2);
        let call = b.call_named("f", &[arg]);
        match b.arena.kind(call) {
            ExprKind::Call { callee, args } => {
                assert_eq!(b.arena.kind(callee), ExprKind::Ident(interner.intern("f")));
                assert_eq!(b.arena.expr_list(args), &[arg]);
            }
            other => panic!("expected call, got {other:?}"),
        }
    }
}
