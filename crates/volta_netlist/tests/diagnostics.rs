//! Elaboration errors flow into the design's sink and render with
//! `file:line:` prefixes.

use volta_diagnostics::render_terminal;
use volta_netlist::{AssignKind, Design, Expr, SignalKind, Statement};
use volta_common::LogicVec;
use volta_source::{SourceDb, SourceLoc};

#[test]
fn width_mismatch_renders_with_location() {
    let mut db = SourceDb::new();
    let file = db.add_file("dff.v");
    let loc = SourceLoc::new(file, 23);

    let mut design = Design::new();
    let q = design.new_signal_width(None, "top.q", SignalKind::Reg, 8);
    let rval = Expr::constant(LogicVec::from_u64(1, 2), loc);
    let _stmt = Statement::assign(&mut design, AssignKind::NonBlocking, q, rval, loc);

    assert_eq!(design.errors(), 1);
    let diags = design.sink().take_all();
    assert_eq!(diags.len(), 1);
    let rendered = render_terminal(&diags[0], &db);
    assert_eq!(
        rendered,
        "dff.v:23: error: expression bit width (2) conflicts with l-value bit width (8)\n"
    );
}

#[test]
fn multiple_errors_accumulate_for_one_run() {
    let mut db = SourceDb::new();
    let file = db.add_file("regs.v");
    let mut design = Design::new();
    let q = design.new_signal_width(None, "top.q", SignalKind::Reg, 8);

    for line in 1..=3 {
        let loc = SourceLoc::new(file, line);
        let rval = Expr::constant(LogicVec::from_u64(0, 1), loc);
        let _ = Statement::assign(&mut design, AssignKind::NonBlocking, q, rval, loc);
    }
    // Elaboration continues past each error; the count gates the backend.
    assert_eq!(design.errors(), 3);
    assert!(design.sink().has_errors());
}

#[test]
fn lookup_misses_are_not_errors() {
    let design = Design::new();
    assert!(design.find_scope("nowhere").is_none());
    assert_eq!(design.flag("missing"), "");
    assert_eq!(design.errors(), 0);
}
