//! Statement-level execution coverage for Rill definitions.
//!
//! Measures how many times each statement of each function in a scope
//! executed while a batch of test expressions ran. The pipeline:
//!
//! 1. key every positioned statement by `file:start:end` ([`source_key`]),
//! 2. declare each key at a zero baseline in a [`CounterStore`],
//! 3. rewrite each callable so statements count themselves as they
//!    evaluate ([`Instrumenter`]),
//! 4. swap the instrumented callables in, restoring the originals on
//!    every exit path ([`CallableSnapshot`], [`RestoreGuard`]),
//! 5. evaluate the tests and snapshot the counts ([`CoverageSession`]).
//!
//! Instrumentation is value-transparent: an instrumented function returns
//! the same values, raises the same errors, and performs the same side
//! effects in the same order as the original.

mod instrument;
mod key;
mod session;
mod snapshot;
mod store;

pub use instrument::{InstrumentError, Instrumenter};
pub use key::{source_key, UNKNOWN_FILE};
pub use session::{CoverageResult, CoverageSession};
pub use snapshot::{CallableSnapshot, RestoreGuard, SwapTarget};
pub use store::{CounterStore, SharedCounterStore};
