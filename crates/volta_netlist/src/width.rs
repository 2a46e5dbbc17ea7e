//! Width adjustment of already-built expressions.
//!
//! `set_width` asks an expression to re-elaborate itself to a new width.
//! Constants resize freely; references to signals, selects, memories,
//! concatenations, and function results are rigid; operators forward the
//! request to their children. The return value reports whether the
//! expression now has the requested width.

use crate::expr::{BinaryClass, Expr};
use volta_common::LogicVec;

impl Expr {
    /// Attempts to adjust this expression to `request` bits. Returns
    /// `true` if the expression's width now equals the request.
    pub fn set_width(&mut self, request: u32) -> bool {
        match self {
            Expr::Const { value, width, .. } => {
                *value = value.resized(request);
                *width = request;
                true
            }
            // A signal reference is as wide as its signal, no more.
            Expr::Signal { width, .. } => *width == request,
            Expr::BitSelect { .. } => request == 1,
            Expr::MemoryRead { width, .. } => *width == request,
            // Unresolved references accept any width until resolution.
            Expr::Param { width, .. } | Expr::Ident { width, .. } => {
                *width = request;
                true
            }
            Expr::ScopeRef { .. } => request == 0,
            Expr::Unary {
                op, operand, width, ..
            } => {
                if op.is_reduction() {
                    return request == 1;
                }
                operand.set_width(request);
                *width = operand.width();
                *width == request
            }
            Expr::Binary {
                op,
                left,
                right,
                width,
                ..
            } => match op.class() {
                BinaryClass::Arith | BinaryClass::Bitwise => {
                    let left_ok = left.set_width(request);
                    let right_ok = right.set_width(request);
                    if left_ok && right_ok {
                        *width = request;
                        true
                    } else {
                        *width == request
                    }
                }
                BinaryClass::Compare | BinaryClass::Logic => request == 1,
                BinaryClass::Shift => {
                    if left.set_width(request) {
                        *width = request;
                        true
                    } else {
                        *width == request
                    }
                }
            },
            Expr::Ternary {
                true_val,
                false_val,
                width,
                ..
            } => {
                let true_ok = true_val.set_width(request);
                let false_ok = false_val.set_width(request);
                if true_ok && false_ok {
                    *width = request;
                    true
                } else {
                    *width == request
                }
            }
            Expr::Concat { width, .. } => *width == request,
            Expr::FuncCall { result_width, .. } => *result_width == request,
        }
    }
}

/// Widens `expr` to `width` bits by concatenating zero bits above it.
/// Expressions already at least that wide pass through unchanged.
pub fn pad_to_width(expr: Expr, width: u32) -> Expr {
    if expr.width() >= width {
        return expr;
    }
    let loc = expr.loc();
    let pad = width - expr.width();
    let mut concat = Expr::concat(2, 1, loc);
    concat.set_part(0, Expr::constant(LogicVec::new(pad), loc));
    concat.set_part(1, expr);
    concat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::Design;
    use crate::expr::{BinaryOp, UnaryOp};
    use crate::signal::SignalKind;
    use volta_source::SourceLoc;

    const L: SourceLoc = SourceLoc::NONE;

    fn cvec(bits: &str) -> LogicVec {
        LogicVec::from_binary_str(bits).unwrap()
    }

    #[test]
    fn const_resizes() {
        let mut e = Expr::constant(cvec("101"), L);
        assert!(e.set_width(6));
        assert_eq!(e.width(), 6);
        let Expr::Const { value, .. } = &e else {
            panic!("expected Const");
        };
        assert_eq!(format!("{value}"), "000101");
        assert!(e.set_width(2));
        assert_eq!(e.width(), 2);
    }

    #[test]
    fn signal_is_rigid() {
        let mut design = Design::new();
        let s = design.new_signal_width(None, "top.s", SignalKind::Wire, 4);
        let mut e = Expr::signal(&design, s, L);
        assert!(e.set_width(4));
        assert!(!e.set_width(8));
        assert_eq!(e.width(), 4);
    }

    #[test]
    fn unary_forwards_to_operand() {
        let mut e = Expr::unary(UnaryOp::BitNot, Expr::constant(cvec("10"), L), L);
        assert!(e.set_width(5));
        assert_eq!(e.width(), 5);
    }

    #[test]
    fn reduction_is_rigid_at_one() {
        let mut e = Expr::unary(UnaryOp::RedAnd, Expr::constant(cvec("10"), L), L);
        assert!(e.set_width(1));
        assert!(!e.set_width(4));
    }

    #[test]
    fn binary_arith_forwards_both_sides() {
        let mut e = Expr::arith(
            BinaryOp::Add,
            Expr::constant(cvec("10"), L),
            Expr::constant(cvec("01"), L),
            L,
        );
        assert!(e.set_width(8));
        assert_eq!(e.width(), 8);
    }

    #[test]
    fn binary_arith_with_rigid_side() {
        let mut design = Design::new();
        let s = design.new_signal_width(None, "top.s", SignalKind::Wire, 4);
        let mut e = Expr::arith(
            BinaryOp::Add,
            Expr::signal(&design, s, L),
            Expr::constant(cvec("0011"), L),
            L,
        );
        assert_eq!(e.width(), 4);
        // The signal side refuses to grow, so the request fails and the
        // width is unchanged.
        assert!(!e.set_width(8));
        assert_eq!(e.width(), 4);
    }

    #[test]
    fn shift_resizes_left_only() {
        let mut e = Expr::shift(
            BinaryOp::Shr,
            Expr::constant(cvec("1111"), L),
            Expr::constant(cvec("01"), L),
            L,
        );
        assert!(e.set_width(8));
        assert_eq!(e.width(), 8);
        let Expr::Binary { right, .. } = &e else {
            panic!("expected Binary");
        };
        assert_eq!(right.width(), 2);
    }

    #[test]
    fn concat_is_rigid() {
        let mut e = Expr::concat(1, 2, L);
        e.set_part(0, Expr::constant(cvec("111"), L));
        assert_eq!(e.width(), 6);
        assert!(e.set_width(6));
        assert!(!e.set_width(8));
    }

    #[test]
    fn pad_to_width_builds_zero_concat() {
        let e = Expr::constant(cvec("11"), L);
        let padded = pad_to_width(e, 5);
        assert_eq!(padded.width(), 5);
        let Expr::Concat { parts, .. } = &padded else {
            panic!("expected Concat");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].as_ref().unwrap().width(), 3);
        assert_eq!(parts[1].as_ref().unwrap().width(), 2);
    }

    #[test]
    fn pad_to_width_passthrough() {
        let e = Expr::constant(cvec("1111"), L);
        let padded = pad_to_width(e, 3);
        assert!(matches!(padded, Expr::Const { .. }));
        assert_eq!(padded.width(), 4);
    }
}
