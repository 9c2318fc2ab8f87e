//! Coverage session orchestration.
//!
//! One session measures one batch of test expressions: reset counters,
//! enumerate the callable bindings of a scope, swap instrumented copies in,
//! evaluate the tests, snapshot the counts, and put the originals back. The
//! restore step is guarded, so a failing test leaves the scope exactly as
//! it was found.

use rill_eval::{
    Environment, EvalError, Interpreter, LocalScope, Scope, SharedCounterSink, Value,
};
use rill_ir::{ExprArena, ExprId, Name, StringInterner};
use rustc_hash::FxHashMap;
use std::rc::Rc;

use crate::instrument::Instrumenter;
use crate::snapshot::{CallableSnapshot, RestoreGuard};
use crate::store::{CounterStore, SharedCounterStore};

/// Statement execution counts keyed by `file:start:end`.
///
/// The key shape matches what a native-code profiler would emit for the
/// same sources, so results from both can be unioned with
/// [`merge`](CoverageResult::merge).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoverageResult {
    counts: FxHashMap<String, u64>,
}

impl CoverageResult {
    pub fn counts(&self) -> &FxHashMap<String, u64> {
        &self.counts
    }

    /// Count for one source key, if it was declared.
    pub fn get(&self, key: &str) -> Option<u64> {
        self.counts.get(key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Union with another result over the same sources, summing counts.
    pub fn merge(&mut self, other: CoverageResult) {
        for (key, count) in other.counts {
            *self.counts.entry(key).or_insert(0) += count;
        }
    }

    fn from_store(interner: &StringInterner, counts: &FxHashMap<Name, u64>) -> Self {
        CoverageResult {
            counts: counts
                .iter()
                .map(|(key, count)| (interner.lookup(*key).to_owned(), *count))
                .collect(),
        }
    }
}

/// A coverage measurement session over one scope.
///
/// Owns the counter store for its lifetime; run one session per store at a
/// time.
pub struct CoverageSession<'i> {
    interner: &'i StringInterner,
    store: SharedCounterStore,
}

impl<'i> CoverageSession<'i> {
    pub fn new(interner: &'i StringInterner) -> Self {
        CoverageSession {
            interner,
            store: SharedCounterStore::new(CounterStore::new()),
        }
    }

    /// Measure statement coverage of `scope`'s callables under `tests`.
    ///
    /// Every function binding (and every implementation of every dispatch
    /// table) in `scope` is instrumented and swapped in; the test
    /// expressions then evaluate in order inside `env`. Bindings that
    /// cannot be instrumented are skipped, not fatal. A failing test
    /// restores the scope and propagates its error unchanged; the counts
    /// gathered up to that point stay readable through
    /// [`collected`](Self::collected).
    pub fn run(
        &self,
        arena: &mut ExprArena,
        scope: &LocalScope<Scope>,
        env: Environment,
        tests: &[ExprId],
    ) -> Result<CoverageResult, EvalError> {
        self.store.borrow_mut().reset();

        let snapshots = self.capture_all(arena, scope);
        tracing::debug!(
            callables = snapshots.len(),
            tests = tests.len(),
            "coverage session start"
        );

        // Armed before the first swap so a failure mid-loop still restores.
        let _guard = RestoreGuard::new(&snapshots);
        for snapshot in &snapshots {
            tracing::trace!(
                name = self.interner.lookup(snapshot.name()),
                body = ?snapshot.original().body,
                "swapping in instrumented callable"
            );
            snapshot.swap_in();
        }

        let mut interp = Interpreter::with_env(arena, self.interner, env);
        let sink: SharedCounterSink = Rc::new(self.store.clone());
        interp.set_counter_sink(sink);
        for test in tests {
            interp.eval(*test)?;
        }

        let result = CoverageResult::from_store(self.interner, &self.store.borrow().snapshot());
        self.store.borrow_mut().reset();
        tracing::debug!(keys = result.counts().len(), "coverage session complete");
        Ok(result)
    }

    /// Counts accumulated so far, for reading partial coverage out of a
    /// session whose `run` failed.
    pub fn collected(&self) -> CoverageResult {
        CoverageResult::from_store(self.interner, &self.store.borrow().snapshot())
    }

    fn capture_all(
        &self,
        arena: &mut ExprArena,
        scope: &LocalScope<Scope>,
    ) -> Vec<CallableSnapshot> {
        let bindings = scope.borrow().entries();
        let mut instrumenter = Instrumenter::new(arena, self.interner, self.store.clone());
        let mut snapshots = Vec::new();
        for (name, value) in bindings {
            match value {
                Value::Function(f) => {
                    match CallableSnapshot::capture_binding(scope, name, &f, &mut instrumenter) {
                        Ok(snapshot) => snapshots.push(snapshot),
                        Err(error) => {
                            tracing::debug!(
                                name = self.interner.lookup(name),
                                %error,
                                "skipping uninstrumentable binding"
                            );
                        }
                    }
                }
                Value::Dispatch(table) => {
                    for signature in table.signatures() {
                        let Some(f) = table.get(signature) else {
                            continue;
                        };
                        match CallableSnapshot::capture_dispatch_impl(
                            &table,
                            signature,
                            &f,
                            &mut instrumenter,
                        ) {
                            Ok(snapshot) => snapshots.push(snapshot),
                            Err(error) => {
                                tracing::debug!(
                                    name = self.interner.lookup(name),
                                    signature = self.interner.lookup(signature),
                                    %error,
                                    "skipping uninstrumentable implementation"
                                );
                            }
                        }
                    }
                }
                // Natives have no syntax to rewrite; everything else is
                // not callable.
                other => {
                    if other.is_callable() {
                        tracing::trace!(
                            name = self.interner.lookup(name),
                            "skipping native callable"
                        );
                    }
                }
            }
        }
        snapshots
    }
}
