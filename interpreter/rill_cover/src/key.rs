//! Source-location keys.
//!
//! Every counter is identified by a key derived from a source position:
//! `"{file}:{start}:{end}"`. The same file and coordinates always produce
//! the same key, and distinct statement positions always produce distinct
//! keys, so counts keyed this way union cleanly with counts produced
//! elsewhere for the same sources.

use rill_ir::{Name, SourcePos, StringInterner};

/// Sentinel substituted for the file component when a position carries no
/// file identity.
pub const UNKNOWN_FILE: &str = "<unknown>";

/// Derive the counter key for a source position.
///
/// The key is interned so counter maps stay keyed by [`Name`] like every
/// other map in the interpreter.
pub fn source_key(interner: &StringInterner, pos: SourcePos) -> Name {
    let file = if pos.file == Name::EMPTY {
        UNKNOWN_FILE
    } else {
        interner.lookup(pos.file)
    };
    interner.intern(&format!("{file}:{}:{}", pos.span.start, pos.span.end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rill_ir::Span;

    #[test]
    fn key_is_file_colon_start_colon_end() {
        let interner = StringInterner::new();
        let pos = SourcePos::new(interner.intern("lib.rill"), Span::new(10, 24));
        let key = source_key(&interner, pos);
        assert_eq!(interner.lookup(key), "lib.rill:10:24");
    }

    #[test]
    fn same_position_same_key() {
        let interner = StringInterner::new();
        let pos = SourcePos::new(interner.intern("a.rill"), Span::new(0, 5));
        assert_eq!(source_key(&interner, pos), source_key(&interner, pos));
    }

    #[test]
    fn differing_coordinates_differ() {
        let interner = StringInterner::new();
        let file = interner.intern("a.rill");
        let a = source_key(&interner, SourcePos::new(file, Span::new(0, 5)));
        let b = source_key(&interner, SourcePos::new(file, Span::new(0, 6)));
        let c = source_key(
            &interner,
            SourcePos::new(interner.intern("b.rill"), Span::new(0, 5)),
        );
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn missing_file_uses_sentinel() {
        let interner = StringInterner::new();
        let pos = SourcePos::new(Name::EMPTY, Span::new(3, 9));
        let key = source_key(&interner, pos);
        assert_eq!(interner.lookup(key), "<unknown>:3:9");
    }
}
