//! Counter sink: the seam between `Counted` nodes and a coverage store.
//!
//! The evaluator knows how to execute an instrumented node (bump, then
//! evaluate the inner expression); it does not know where counts go. A
//! [`CounterSink`] is attached to the interpreter for the duration of a
//! coverage session and receives one `record` call per dynamic execution of
//! each counted statement, at any call depth.

use std::rc::Rc;

use rill_ir::Name;

/// Receiver for statement-counter increments.
pub trait CounterSink {
    /// Record one execution of the statement identified by `key`.
    fn record(&self, key: Name);
}

/// Shared, single-threaded sink handle.
pub type SharedCounterSink = Rc<dyn CounterSink>;

/// Sink that drops every increment.
///
/// Useful for running instrumented code outside a session, e.g. in
/// transparency tests.
#[derive(Default)]
pub struct NullCounterSink;

impl CounterSink for NullCounterSink {
    fn record(&self, _key: Name) {}
}
