//! Per-session counter storage.

use rill_eval::{CounterSink, LocalScope};
use rill_ir::Name;
use rustc_hash::FxHashMap;

/// Execution counters for one coverage session.
///
/// Keys are declared at instrumentation time so that never-executed
/// statements still appear in the snapshot with a zero count. Counts are
/// exact: increments run inline on the evaluating thread, so loops,
/// recursion, and reentrancy are all counted per dynamic execution.
///
/// A store's contents are only meaningful between a [`reset`](Self::reset)
/// and the following [`snapshot`](Self::snapshot); callers run one session
/// per store at a time.
#[derive(Debug, Default)]
pub struct CounterStore {
    counts: FxHashMap<Name, u64>,
}

/// Shared handle to a [`CounterStore`], cloneable into the instrumenter and
/// the evaluating interpreter.
///
/// A newtype rather than an alias: [`CounterSink`] lives in `rill_eval`, so
/// the impl needs a type owned by this crate.
#[derive(Clone, Debug, Default)]
pub struct SharedCounterStore(LocalScope<CounterStore>);

impl SharedCounterStore {
    pub fn new(store: CounterStore) -> Self {
        SharedCounterStore(LocalScope::new(store))
    }
}

impl std::ops::Deref for SharedCounterStore {
    type Target = LocalScope<CounterStore>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl CounterStore {
    pub fn new() -> Self {
        CounterStore::default()
    }

    /// Drop all counters, returning the store to its pristine state.
    pub fn reset(&mut self) {
        self.counts.clear();
    }

    /// Register a key at a zero baseline. Idempotent: re-declaring never
    /// disturbs an existing count.
    pub fn declare(&mut self, key: Name) {
        self.counts.entry(key).or_insert(0);
    }

    /// Bump a declared key by one.
    pub fn increment(&mut self, key: Name) {
        debug_assert!(
            self.counts.contains_key(&key),
            "increment of undeclared counter {key:?}",
        );
        *self.counts.entry(key).or_insert(0) += 1;
    }

    /// Current count for a key, if declared.
    pub fn get(&self, key: Name) -> Option<u64> {
        self.counts.get(&key).copied()
    }

    /// Number of declared counters.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Copy of the full key→count map.
    pub fn snapshot(&self) -> FxHashMap<Name, u64> {
        self.counts.clone()
    }
}

impl CounterSink for SharedCounterStore {
    fn record(&self, key: Name) {
        self.0.borrow_mut().increment(key);
    }
}
