//! Diagnostics for the Volta compiler.
//!
//! Elaboration-semantic problems (width mismatches, illegal primitive
//! table rows, and so on) are reported as [`Diagnostic`]s into a
//! [`DiagnosticSink`]; the sink's error count is what gates later compiler
//! stages. Lookup misses are ordinary `None` results and never produce
//! diagnostics.

#![warn(missing_docs)]

pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use diagnostic::Diagnostic;
pub use renderer::{print_diagnostics, render_terminal};
pub use severity::Severity;
pub use sink::DiagnosticSink;
