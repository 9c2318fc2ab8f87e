//! Interned string identifier.

use std::fmt;

/// Interned string identifier.
///
/// A `Name` is a plain index into the [`StringInterner`](crate::StringInterner)
/// that produced it. Equality and hashing are O(1) integer operations, which
/// is what makes `Name`-keyed `FxHashMap`s cheap throughout the interpreter.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string.
    ///
    /// Doubles as the "absent" sentinel for optional identifiers, e.g. a
    /// source position whose file identity is unknown.
    pub const EMPTY: Name = Name(0);

    /// Create from a raw index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    /// Get the raw index.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Get the index into the interner's storage.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}
