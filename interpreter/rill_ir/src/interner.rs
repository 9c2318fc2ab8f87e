//! String interner backing [`Name`] identifiers.
//!
//! Interned strings are leaked, so lookups hand out `&'static str` and a
//! `Name` stays valid for the life of the process.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// Interner exceeded `u32::MAX` distinct strings.
    Overflow { count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::Overflow { count } => write!(
                f,
                "interner exceeded capacity: {count} strings, max is {}",
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for InternError {}

struct InternState {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by `Name`.
    strings: Vec<&'static str>,
}

/// String interner with O(1) interning and lookup.
///
/// # Thread Safety
/// Uses a single `RwLock`; reads (lookups, already-interned hits) only take
/// the read lock.
pub struct StringInterner {
    state: RwLock<InternState>,
}

impl StringInterner {
    /// Create a new interner with the empty string and Rill keywords
    /// pre-interned.
    pub fn new() -> Self {
        let mut state = InternState {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        };
        let empty: &'static str = "";
        state.map.insert(empty, 0);
        state.strings.push(empty);

        let interner = Self {
            state: RwLock::new(state),
        };
        interner.pre_intern_keywords();
        interner
    }

    /// Try to intern a string, returning its `Name` or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        // Fast path: already interned.
        {
            let guard = self.state.read();
            if let Some(&idx) = guard.map.get(s) {
                return Ok(Name::from_raw(idx));
            }
        }

        let mut guard = self.state.write();
        // Double-check after acquiring the write lock.
        if let Some(&idx) = guard.map.get(s) {
            return Ok(Name::from_raw(idx));
        }

        // Leak the string to get 'static lifetime.
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let idx = u32::try_from(guard.strings.len()).map_err(|_| InternError::Overflow {
            count: guard.strings.len(),
        })?;
        guard.strings.push(leaked);
        guard.map.insert(leaked, idx);
        Ok(Name::from_raw(idx))
    }

    /// Intern a string, returning its `Name`.
    ///
    /// # Panics
    /// Panics if the interner exceeds `u32::MAX` strings. Use [`try_intern`]
    /// for fallible interning.
    ///
    /// [`try_intern`]: StringInterner::try_intern
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up the string for a `Name`.
    ///
    /// The `'static` lifetime is sound because interned strings are leaked
    /// and never deallocated.
    pub fn lookup(&self, name: Name) -> &'static str {
        let guard = self.state.read();
        guard.strings[name.index()]
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.state.read().strings.len()
    }

    /// True if only the empty string is interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    fn pre_intern_keywords(&self) {
        const KEYWORDS: &[&str] = &[
            // Special forms
            "if", "while", "let", "set",
            // Builtins
            "add", "sub", "mul", "div", "gt", "lt", "eq", "not", "len",
            // Common literals spelled in diagnostics
            "true", "false", "unit",
        ];
        for kw in KEYWORDS {
            self.intern(kw);
        }
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
