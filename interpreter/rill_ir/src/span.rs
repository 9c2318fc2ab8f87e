//! Source location spans and positions.

use std::fmt;

use crate::Name;

/// Byte range within one source file.
///
/// Layout: 8 bytes, `Copy`. `start`/`end` are byte offsets from the start of
/// the file, `end` exclusive.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(C)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Create a new span.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Check if the span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge two spans to create one covering both.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// Position metadata the parser attaches to a syntax node: file identity
/// plus coordinates.
///
/// Nodes produced synthetically (by the instrumenter, or by any future
/// macro expansion) carry no `SourcePos`; the coverage core uses presence
/// vs. absence to decide where statement counters belong.
///
/// `file == Name::EMPTY` means the file identity itself is unknown; the
/// location keyer substitutes a fixed sentinel instead of failing.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct SourcePos {
    /// Interned file identity (path or module name).
    pub file: Name,
    /// Byte range within the file.
    pub span: Span,
}

impl SourcePos {
    /// Create a new source position.
    #[inline]
    pub const fn new(file: Name, span: Span) -> Self {
        SourcePos { file, span }
    }
}

impl fmt::Debug for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.file, self.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_merge_covers_both() {
        let a = Span::new(4, 10);
        let b = Span::new(8, 20);
        assert_eq!(a.merge(b), Span::new(4, 20));
        assert_eq!(b.merge(a), Span::new(4, 20));
    }

    #[test]
    fn span_len_and_empty() {
        assert_eq!(Span::new(3, 7).len(), 4);
        assert!(Span::new(5, 5).is_empty());
        assert!(!Span::new(5, 6).is_empty());
    }
}
