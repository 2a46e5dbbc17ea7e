//! Diagnostic collection for a single-threaded compilation pass.

use crate::diagnostic::Diagnostic;
use std::cell::{Cell, RefCell};

/// Collects diagnostics emitted while the IR is built and rewritten.
///
/// The netlist is a single-threaded structure and so is its sink: callers
/// serialize all access, and interior mutability is plain `Cell`/`RefCell`
/// so the design can report errors through shared references without any
/// locking. The error count survives draining; it is the session total
/// that decides whether a backend may run.
pub struct DiagnosticSink {
    entries: RefCell<Vec<Diagnostic>>,
    errors: Cell<usize>,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            errors: Cell::new(0),
        }
    }

    /// Records a diagnostic, counting it if it is an error.
    pub fn emit(&self, diag: Diagnostic) {
        if diag.severity.is_error() {
            self.errors.set(self.errors.get() + 1);
        }
        self.entries.borrow_mut().push(diag);
    }

    /// Returns the number of error diagnostics emitted this session.
    pub fn error_count(&self) -> usize {
        self.errors.get()
    }

    /// Returns `true` if any error diagnostic has been emitted.
    pub fn has_errors(&self) -> bool {
        self.errors.get() > 0
    }

    /// Returns the number of diagnostics currently held.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` if no diagnostics are currently held.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drains the held diagnostics, usually to render them. The error
    /// count is untouched.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        self.entries.take()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}
