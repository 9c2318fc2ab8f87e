//! Callable capture, substitution, and guaranteed restoration.

use rill_eval::{DispatchTable, FunctionValue, LocalScope, Scope, Value};
use rill_ir::Name;

use crate::instrument::{InstrumentError, Instrumenter};

/// Where an instrumented callable was swapped in, and therefore where the
/// original must be swapped back.
#[derive(Clone)]
pub enum SwapTarget {
    /// A plain function binding in an enumerable scope.
    Binding { scope: LocalScope<Scope> },
    /// One implementation inside a dispatch table. The table handle is
    /// retained so restoration reconstitutes the registry in place.
    DispatchImpl {
        table: DispatchTable,
        signature: Name,
    },
}

/// One callable's coverage lifecycle: the live value as found, an
/// independent copy for restoration, and the instrumented replacement.
///
/// The restore copy is taken before any instrumentation happens and is
/// structurally independent of the original, so nothing a test does to the
/// live binding can corrupt what gets put back.
pub struct CallableSnapshot {
    name: Name,
    target: SwapTarget,
    original: FunctionValue,
    restore: FunctionValue,
    instrumented: FunctionValue,
}

impl CallableSnapshot {
    /// Capture a plain function binding.
    pub fn capture_binding(
        scope: &LocalScope<Scope>,
        name: Name,
        original: &FunctionValue,
        instrumenter: &mut Instrumenter<'_>,
    ) -> Result<Self, InstrumentError> {
        let restore = original.deep_copy();
        let instrumented = instrumenter.instrument_function(original)?;
        Ok(CallableSnapshot {
            name,
            target: SwapTarget::Binding {
                scope: scope.clone(),
            },
            original: original.clone(),
            restore,
            instrumented,
        })
    }

    /// Capture one registered implementation of a dispatch table.
    pub fn capture_dispatch_impl(
        table: &DispatchTable,
        signature: Name,
        original: &FunctionValue,
        instrumenter: &mut Instrumenter<'_>,
    ) -> Result<Self, InstrumentError> {
        let restore = original.deep_copy();
        let instrumented = instrumenter.instrument_function(original)?;
        Ok(CallableSnapshot {
            name: table.name,
            target: SwapTarget::DispatchImpl {
                table: table.clone(),
                signature,
            },
            original: original.clone(),
            restore,
            instrumented,
        })
    }

    pub fn name(&self) -> Name {
        self.name
    }

    /// The live value as it was when captured.
    pub fn original(&self) -> &FunctionValue {
        &self.original
    }

    /// Replace the live binding with the instrumented callable.
    pub fn swap_in(&self) {
        self.rebind(self.instrumented.clone());
    }

    /// Put the independent restore copy back, whatever the live value is
    /// by now.
    pub fn swap_out(&self) {
        self.rebind(self.restore.clone());
    }

    fn rebind(&self, value: FunctionValue) {
        match &self.target {
            SwapTarget::Binding { scope } => {
                scope.borrow_mut().rebind(self.name, Value::Function(value));
            }
            SwapTarget::DispatchImpl { table, signature } => {
                table.register(*signature, value);
            }
        }
    }
}

/// Restores every snapshot when dropped.
///
/// Armed before the instrumented callables are swapped in, so swap-out
/// runs on every exit path out of a session, early `?` returns and
/// unwinding included. Restoring a snapshot that was never swapped in
/// rebinds an equal copy of the original, which is harmless.
pub struct RestoreGuard<'s> {
    snapshots: &'s [CallableSnapshot],
}

impl<'s> RestoreGuard<'s> {
    pub fn new(snapshots: &'s [CallableSnapshot]) -> Self {
        RestoreGuard { snapshots }
    }
}

impl Drop for RestoreGuard<'_> {
    fn drop(&mut self) {
        for snapshot in self.snapshots {
            snapshot.swap_out();
        }
    }
}
