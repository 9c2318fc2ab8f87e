//! Rill IR - syntax-node types for the Rill interpreter.
//!
//! The flat AST follows an index-based design: expression nodes live in an
//! [`ExprArena`], children are [`ExprId`] indices, and sequences are compact
//! range types into flat pools. Identifiers and string literals are interned
//! [`Name`]s.
//!
//! Source positions ([`SourcePos`]) are attached by the parser and carried
//! as `Option` — synthetic nodes have none. The coverage core keys statement
//! counters off this metadata; see `rill_cover`.

/// Assert a type's size at compile time.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
mod ast;
mod build;
mod ids;
mod interner;
mod name;
mod span;

pub use arena::ExprArena;
pub use ast::{ExprKind, Param};
pub use build::AstBuilder;
pub use ids::{ExprId, ExprRange, ParamRange, PosRange};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use span::{SourcePos, Span};
