//! Rendering diagnostics for terminal output.

use crate::diagnostic::Diagnostic;
use volta_source::SourceDb;

/// Renders a single diagnostic in the classic compiler format:
///
/// ```text
/// top.v:12: error: expression bit width conflicts with l-value bit width
///    = note: ...
/// ```
pub fn render_terminal(diag: &Diagnostic, source_db: &SourceDb) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}: {}: {}\n",
        source_db.render_loc(diag.loc),
        diag.severity,
        diag.message
    ));
    for note in &diag.notes {
        out.push_str(&format!("   = note: {note}\n"));
    }
    out
}

/// Prints a batch of diagnostics to standard error.
pub fn print_diagnostics(diags: &[Diagnostic], source_db: &SourceDb) {
    for diag in diags {
        eprint!("{}", render_terminal(diag, source_db));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volta_source::SourceLoc;

    #[test]
    fn render_with_location() {
        let mut db = SourceDb::new();
        let file = db.add_file("adder.v");
        let diag = Diagnostic::error(
            "expression bit width conflicts with l-value bit width",
            SourceLoc::new(file, 7),
        );
        let out = render_terminal(&diag, &db);
        assert_eq!(
            out,
            "adder.v:7: error: expression bit width conflicts with l-value bit width\n"
        );
    }

    #[test]
    fn render_with_notes() {
        let db = SourceDb::new();
        let diag = Diagnostic::warning("unused signal", SourceLoc::NONE)
            .with_note("declared but never read");
        let out = render_terminal(&diag, &db);
        assert!(out.starts_with("<unknown>:0: warning: unused signal\n"));
        assert!(out.contains("= note: declared but never read"));
    }
}
