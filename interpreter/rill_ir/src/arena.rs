//! Expression arena.
//!
//! Flat, push-only storage for expression nodes. `kinds` and `pos` are
//! parallel arrays indexed by [`ExprId`]; sequences (call arguments, block
//! statements, parameters, statement positions) live in flat pools indexed
//! by range types.
//!
//! Push-only matters for coverage: the instrumenter allocates rewritten
//! nodes into the same arena, so every original `ExprId` — including the
//! body IDs recorded inside captured function values — stays valid for the
//! whole session and restoration never touches the tree.

use crate::{ExprId, ExprKind, ExprRange, Param, ParamRange, PosRange, SourcePos};

/// Convert a pool length to `u32`, panicking with context on overflow.
fn to_u32(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("{what} pool exceeded u32::MAX entries"))
}

/// Convert a sequence length to `u16`, panicking with context on overflow.
fn to_u16(len: usize, what: &str) -> u16 {
    u16::try_from(len).unwrap_or_else(|_| panic!("{what} sequence exceeded u16::MAX entries"))
}

/// Arena for expression nodes.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    /// Expression kinds (parallel with `pos`).
    kinds: Vec<ExprKind>,
    /// Source positions attached by the parser (parallel with `kinds`).
    /// `None` = synthetic node.
    pos: Vec<Option<SourcePos>>,
    /// Flattened expression ID lists (call args, block statements).
    expr_lists: Vec<ExprId>,
    /// Function parameters.
    params: Vec<Param>,
    /// Per-statement source positions for blocks.
    stmt_pos: Vec<Option<SourcePos>>,
}

impl ExprArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node with a source position, returning its ID.
    pub fn push(&mut self, kind: ExprKind, pos: Option<SourcePos>) -> ExprId {
        let id = ExprId::new(to_u32(self.kinds.len(), "expression"));
        self.kinds.push(kind);
        self.pos.push(pos);
        id
    }

    /// Allocate a synthetic node (no source position).
    pub fn push_synthetic(&mut self, kind: ExprKind) -> ExprId {
        self.push(kind, None)
    }

    /// Get the kind of a node.
    #[inline]
    pub fn kind(&self, id: ExprId) -> ExprKind {
        self.kinds[id.index()]
    }

    /// Get the source position of a node, if the parser attached one.
    #[inline]
    pub fn pos(&self, id: ExprId) -> Option<SourcePos> {
        self.pos[id.index()]
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Check if the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Store a list of expression IDs, returning its range.
    pub fn push_expr_list(&mut self, ids: &[ExprId]) -> ExprRange {
        let start = to_u32(self.expr_lists.len(), "expression list");
        let len = to_u16(ids.len(), "expression list");
        self.expr_lists.extend_from_slice(ids);
        ExprRange::new(start, len)
    }

    /// Get the expression IDs for a range.
    pub fn expr_list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    /// Store a parameter list, returning its range.
    pub fn push_params(&mut self, params: &[Param]) -> ParamRange {
        let start = to_u32(self.params.len(), "parameter");
        let len = to_u16(params.len(), "parameter");
        self.params.extend_from_slice(params);
        ParamRange::new(start, len)
    }

    /// Get the parameters for a range.
    pub fn params(&self, range: ParamRange) -> &[Param] {
        let start = range.start as usize;
        &self.params[start..start + range.len()]
    }

    /// Store per-statement positions for a block, returning their range.
    pub fn push_stmt_pos(&mut self, positions: &[Option<SourcePos>]) -> PosRange {
        let start = to_u32(self.stmt_pos.len(), "statement position");
        let len = to_u16(positions.len(), "statement position");
        self.stmt_pos.extend_from_slice(positions);
        PosRange::new(start, len)
    }

    /// Get the per-statement positions for a range.
    pub fn stmt_pos(&self, range: PosRange) -> &[Option<SourcePos>] {
        let start = range.start as usize;
        &self.stmt_pos[start..start + range.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Name, Span};

    #[test]
    fn push_and_read_back() {
        let mut arena = ExprArena::new();
        let pos = SourcePos::new(Name::from_raw(1), Span::new(0, 2));
        let a = arena.push(ExprKind::Int(1), Some(pos));
        let b = arena.push_synthetic(ExprKind::Unit);

        assert_eq!(arena.kind(a), ExprKind::Int(1));
        assert_eq!(arena.pos(a), Some(pos));
        assert_eq!(arena.kind(b), ExprKind::Unit);
        assert_eq!(arena.pos(b), None);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn expr_lists_round_trip() {
        let mut arena = ExprArena::new();
        let a = arena.push_synthetic(ExprKind::Int(1));
        let b = arena.push_synthetic(ExprKind::Int(2));
        let range = arena.push_expr_list(&[a, b]);
        assert_eq!(arena.expr_list(range), &[a, b]);
    }

    #[test]
    fn stmt_pos_round_trip() {
        let mut arena = ExprArena::new();
        let pos = SourcePos::new(Name::from_raw(2), Span::new(3, 9));
        let range = arena.push_stmt_pos(&[Some(pos), None]);
        assert_eq!(arena.stmt_pos(range), &[Some(pos), None]);
    }

    #[test]
    fn params_round_trip() {
        let mut arena = ExprArena::new();
        let x = Name::from_raw(3);
        let default = arena.push_synthetic(ExprKind::Int(0));
        let range = arena.push_params(&[Param::required(x), Param::with_default(x, default)]);
        let params = arena.params(range);
        assert_eq!(params.len(), 2);
        assert!(!params[0].default.is_present());
        assert_eq!(params[1].default, default);
    }
}
