//! Structured diagnostic messages with severity and source location.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use volta_source::SourceLoc;

/// A diagnostic message tied to a source location.
///
/// Diagnostics are the mechanism for reporting elaboration-semantic
/// problems to the user. Each carries a severity, the main message, the
/// location of the offending construct, and optional explanatory notes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The main diagnostic message.
    pub message: String,
    /// Where the problem was detected.
    pub loc: SourceLoc,
    /// Explanatory footnotes.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    pub fn error(message: impl Into<String>, loc: SourceLoc) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            loc,
            notes: Vec::new(),
        }
    }

    /// Creates a new warning diagnostic.
    pub fn warning(message: impl Into<String>, loc: SourceLoc) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            loc,
            notes: Vec::new(),
        }
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_error() {
        let diag = Diagnostic::error("expression bit width conflicts", SourceLoc::NONE);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "expression bit width conflicts");
        assert!(diag.notes.is_empty());
    }

    #[test]
    fn create_warning_with_note() {
        let diag = Diagnostic::warning("signal is never driven", SourceLoc::NONE)
            .with_note("declared here but not connected");
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.notes.len(), 1);
    }

    #[test]
    fn serde_roundtrip() {
        let diag = Diagnostic::error("bad row", SourceLoc::NONE).with_note("in primitive table");
        let json = serde_json::to_string(&diag).unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back.message, "bad row");
        assert_eq!(back.notes, vec!["in primitive table".to_string()]);
    }
}
