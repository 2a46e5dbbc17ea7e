//! Expression trees with explicit widths.
//!
//! Every expression node carries the width it was elaborated to; the
//! constructors apply the width-matching rules of the language (grow
//! addition operands, zero-pad bitwise operands, collapse comparisons to
//! one bit). Signal references hold an RAII guard on the signal's
//! expression-reference counter, so the count tracks live references
//! automatically through construction, duplication, and drop.

use crate::design::Design;
use crate::ids::{MemoryId, ObjId};
use crate::path::ScopePath;
use crate::signal::ErefGuard;
use crate::width::pad_to_width;
use serde::{Deserialize, Serialize};
use volta_common::{InternalError, LogicVec, VoltaResult};
use volta_source::SourceLoc;

/// A counted reference to a signal from expression context.
///
/// Construction increments the signal's expression-reference count;
/// dropping (or cloning) the reference keeps the count balanced.
#[derive(Debug, Clone)]
pub struct SignalRef {
    signal: ObjId,
    _guard: ErefGuard,
}

impl SignalRef {
    /// Takes a counted reference to `signal`.
    ///
    /// # Panics
    ///
    /// Panics if the object is not a signal.
    pub fn new(design: &Design, signal: ObjId) -> Self {
        let data = design
            .obj(signal)
            .as_signal()
            .expect("signal reference must name a signal");
        Self {
            signal,
            _guard: data.eref_counter().guard(),
        }
    }

    /// Returns the referenced signal.
    pub fn signal(&self) -> ObjId {
        self.signal
    }
}

/// A unary operator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Arithmetic negation (`-`).
    Neg,
    /// Bitwise complement (`~`).
    BitNot,
    /// Logical not (`!`).
    LogicNot,
    /// Reduction AND (`&`).
    RedAnd,
    /// Reduction OR (`|`).
    RedOr,
    /// Reduction XOR (`^`).
    RedXor,
    /// Reduction NAND (`~&`).
    RedNand,
    /// Reduction NOR (`~|`).
    RedNor,
    /// Reduction XNOR (`~^`).
    RedXnor,
}

impl UnaryOp {
    /// Returns `true` for operators whose result is a single bit.
    pub fn is_reduction(self) -> bool {
        !matches!(self, UnaryOp::Neg | UnaryOp::BitNot)
    }
}

/// The width-rule family of a binary operator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BinaryClass {
    /// Addition and subtraction: operands grow to a common width.
    Arith,
    /// Bitwise operators: operands grow, then the narrower side is
    /// zero-padded.
    Bitwise,
    /// Comparisons: result is one bit.
    Compare,
    /// Logical connectives: result is one bit.
    Logic,
    /// Shifts: result takes the left operand's width.
    Shift,
}

/// A binary operator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Addition (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Bitwise AND (`&`).
    BitAnd,
    /// Bitwise OR (`|`).
    BitOr,
    /// Bitwise XOR (`^`).
    BitXor,
    /// Bitwise NAND (`~&`).
    BitNand,
    /// Bitwise NOR (`~|`).
    BitNor,
    /// Bitwise XNOR (`~^`).
    BitXnor,
    /// Equality (`==`).
    Eq,
    /// Inequality (`!=`).
    Ne,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
    /// Case equality (`===`).
    CaseEq,
    /// Case inequality (`!==`).
    CaseNe,
    /// Logical AND (`&&`).
    LogicAnd,
    /// Logical OR (`||`).
    LogicOr,
    /// Left shift (`<<`).
    Shl,
    /// Right shift (`>>`).
    Shr,
}

impl BinaryOp {
    /// Returns the operator's width-rule family.
    pub fn class(self) -> BinaryClass {
        use BinaryOp::*;
        match self {
            Add | Sub => BinaryClass::Arith,
            BitAnd | BitOr | BitXor | BitNand | BitNor | BitXnor => BinaryClass::Bitwise,
            Eq | Ne | Lt | Le | Gt | Ge | CaseEq | CaseNe => BinaryClass::Compare,
            LogicAnd | LogicOr => BinaryClass::Logic,
            Shl | Shr => BinaryClass::Shift,
        }
    }
}

/// An expression in the behavioral IR.
///
/// Expressions own their children. [`duplicate`](Expr::duplicate) makes a
/// structurally independent deep copy; the unresolved or context-bound
/// variants refuse to be duplicated.
#[derive(Debug)]
pub enum Expr {
    /// A wide constant.
    Const {
        /// The constant value.
        value: LogicVec,
        /// The elaborated width.
        width: u32,
        /// Source location.
        loc: SourceLoc,
    },
    /// A whole-signal reference; width is the signal's pin count.
    Signal {
        /// The counted signal reference.
        sig: SignalRef,
        /// The elaborated width.
        width: u32,
        /// Source location.
        loc: SourceLoc,
    },
    /// A single-bit select `sig[index]`; width is 1 by definition.
    BitSelect {
        /// The counted signal reference.
        sig: SignalRef,
        /// The bit index expression.
        index: Box<Expr>,
        /// Source location.
        loc: SourceLoc,
    },
    /// A memory word read `mem[index]`; width is the word width.
    MemoryRead {
        /// The memory being read.
        mem: MemoryId,
        /// The word index expression.
        index: Box<Expr>,
        /// The elaborated width.
        width: u32,
        /// Source location.
        loc: SourceLoc,
    },
    /// A parameter reference by scope path and name, not yet resolved.
    Param {
        /// The scope the reference appears in.
        path: ScopePath,
        /// The parameter's short name.
        name: String,
        /// The elaborated width (0 until resolution).
        width: u32,
        /// Source location.
        loc: SourceLoc,
    },
    /// A reference to a scope (for system tasks that take hierarchy
    /// arguments).
    ScopeRef {
        /// The referenced scope.
        scope: ScopePath,
        /// Source location.
        loc: SourceLoc,
    },
    /// An opaque identifier that elaboration could not resolve yet.
    Ident {
        /// The identifier text.
        name: String,
        /// The elaborated width.
        width: u32,
        /// Source location.
        loc: SourceLoc,
    },
    /// A unary operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
        /// The elaborated width.
        width: u32,
        /// Source location.
        loc: SourceLoc,
    },
    /// A binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// The left operand.
        left: Box<Expr>,
        /// The right operand.
        right: Box<Expr>,
        /// The elaborated width (0 flags an unresolved mismatch).
        width: u32,
        /// Source location.
        loc: SourceLoc,
    },
    /// A conditional expression `cond ? t : f`; width is the true
    /// branch's width.
    Ternary {
        /// The condition.
        cond: Box<Expr>,
        /// The value when true.
        true_val: Box<Expr>,
        /// The value when false.
        false_val: Box<Expr>,
        /// The elaborated width.
        width: u32,
        /// Source location.
        loc: SourceLoc,
    },
    /// A concatenation with a repeat count.
    Concat {
        /// The parts, most significant first; slots are filled by
        /// [`set_part`](Expr::set_part).
        parts: Vec<Option<Expr>>,
        /// The repeat count applied to the whole group.
        repeat: u32,
        /// The accumulated width of the parts set so far.
        width: u32,
        /// Source location.
        loc: SourceLoc,
    },
    /// A user-defined function call; width is the result signal's width.
    FuncCall {
        /// The function's full dotted name.
        func: String,
        /// The counted reference to the function's result signal.
        result: SignalRef,
        /// The elaborated width.
        result_width: u32,
        /// The argument expressions.
        parms: Vec<Expr>,
        /// Source location.
        loc: SourceLoc,
    },
}

impl Expr {
    /// Creates a constant expression; width is the vector length.
    pub fn constant(value: LogicVec, loc: SourceLoc) -> Expr {
        let width = value.width();
        Expr::Const { value, width, loc }
    }

    /// Creates a whole-signal reference, incrementing the signal's
    /// expression-reference count.
    pub fn signal(design: &Design, signal: ObjId, loc: SourceLoc) -> Expr {
        let width = design.obj(signal).pin_count();
        Expr::Signal {
            sig: SignalRef::new(design, signal),
            width,
            loc,
        }
    }

    /// Creates a single-bit select of a signal.
    pub fn bit_select(design: &Design, signal: ObjId, index: Expr, loc: SourceLoc) -> Expr {
        Expr::BitSelect {
            sig: SignalRef::new(design, signal),
            index: Box::new(index),
            loc,
        }
    }

    /// Creates a memory word read; width is the memory's word width.
    pub fn memory_read(design: &Design, mem: MemoryId, index: Expr, loc: SourceLoc) -> Expr {
        let width = design.memory(mem).width();
        Expr::MemoryRead {
            mem,
            index: Box::new(index),
            width,
            loc,
        }
    }

    /// Creates an unresolved parameter reference.
    pub fn parameter(path: ScopePath, name: impl Into<String>, loc: SourceLoc) -> Expr {
        Expr::Param {
            path,
            name: name.into(),
            width: 0,
            loc,
        }
    }

    /// Creates a scope reference.
    pub fn scope_ref(scope: ScopePath, loc: SourceLoc) -> Expr {
        Expr::ScopeRef { scope, loc }
    }

    /// Creates an opaque identifier expression.
    pub fn ident(name: impl Into<String>, width: u32, loc: SourceLoc) -> Expr {
        Expr::Ident {
            name: name.into(),
            width,
            loc,
        }
    }

    /// Creates a unary operation. Reductions have width 1; other
    /// operators take the operand's width.
    pub fn unary(op: UnaryOp, operand: Expr, loc: SourceLoc) -> Expr {
        let width = if op.is_reduction() { 1 } else { operand.width() };
        Expr::Unary {
            op,
            operand: Box::new(operand),
            width,
            loc,
        }
    }

    /// Creates an addition or subtraction, growing both operands to the
    /// wider width. A residual mismatch leaves width 0 as a flag.
    pub fn arith(op: BinaryOp, mut left: Expr, mut right: Expr, loc: SourceLoc) -> Expr {
        assert_eq!(op.class(), BinaryClass::Arith, "arith takes + or -");
        let max = left.width().max(right.width());
        if left.width() < max {
            left.set_width(max);
        }
        if right.width() < max {
            right.set_width(max);
        }
        let width = if left.width() == right.width() {
            left.width()
        } else {
            0
        };
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            width,
            loc,
        }
    }

    /// Creates a bitwise operation. Operands first try to grow to a
    /// common width; if they still disagree the narrower side is
    /// zero-padded.
    pub fn bitwise(op: BinaryOp, mut left: Expr, mut right: Expr, loc: SourceLoc) -> Expr {
        assert_eq!(op.class(), BinaryClass::Bitwise, "bitwise takes & | ^ ~& ~| ~^");
        let max = left.width().max(right.width());
        if left.width() < max {
            left.set_width(max);
        }
        if right.width() < max {
            right.set_width(max);
        }
        // If the expressions cannot be matched, pad them to fit.
        if left.width() > right.width() {
            right = pad_to_width(right, left.width());
        } else if right.width() > left.width() {
            left = pad_to_width(left, right.width());
        }
        assert_eq!(left.width(), right.width());
        let width = left.width();
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            width,
            loc,
        }
    }

    /// Creates a comparison; the result is one bit.
    pub fn compare(op: BinaryOp, left: Expr, right: Expr, loc: SourceLoc) -> Expr {
        assert_eq!(op.class(), BinaryClass::Compare, "compare takes a relational operator");
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            width: 1,
            loc,
        }
    }

    /// Creates a logical connective; the result is one bit.
    pub fn logical(op: BinaryOp, left: Expr, right: Expr, loc: SourceLoc) -> Expr {
        assert_eq!(op.class(), BinaryClass::Logic, "logical takes && or ||");
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            width: 1,
            loc,
        }
    }

    /// Creates a shift; the result takes the left operand's width.
    pub fn shift(op: BinaryOp, left: Expr, right: Expr, loc: SourceLoc) -> Expr {
        assert_eq!(op.class(), BinaryClass::Shift, "shift takes << or >>");
        let width = left.width();
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            width,
            loc,
        }
    }

    /// Creates a conditional; the result takes the true branch's width.
    pub fn ternary(cond: Expr, true_val: Expr, false_val: Expr, loc: SourceLoc) -> Expr {
        let width = true_val.width();
        Expr::Ternary {
            cond: Box::new(cond),
            true_val: Box::new(true_val),
            false_val: Box::new(false_val),
            width,
            loc,
        }
    }

    /// Creates an empty concatenation with `count` part slots and a
    /// repeat count. Parts are installed with [`set_part`](Expr::set_part).
    pub fn concat(count: usize, repeat: u32, loc: SourceLoc) -> Expr {
        Expr::Concat {
            parts: (0..count).map(|_| None).collect(),
            repeat,
            width: 0,
            loc,
        }
    }

    /// Installs a concatenation part, adding `repeat * part.width()` to
    /// the accumulated width.
    ///
    /// # Panics
    ///
    /// Panics if this is not a concatenation, the index is out of range,
    /// or the slot is already filled.
    pub fn set_part(&mut self, idx: usize, part: Expr) {
        let Expr::Concat {
            parts,
            repeat,
            width,
            ..
        } = self
        else {
            panic!("set_part on a non-concatenation");
        };
        assert!(idx < parts.len(), "concatenation part {idx} out of range");
        assert!(
            parts[idx].is_none(),
            "concatenation part {idx} already set"
        );
        *width += *repeat * part.width();
        parts[idx] = Some(part);
    }

    /// Creates a user-defined function call; the width comes from the
    /// function's result signal.
    pub fn func_call(
        design: &Design,
        func: impl Into<String>,
        result: ObjId,
        parms: Vec<Expr>,
        loc: SourceLoc,
    ) -> Expr {
        let result_width = design.obj(result).pin_count();
        Expr::FuncCall {
            func: func.into(),
            result: SignalRef::new(design, result),
            result_width,
            parms,
            loc,
        }
    }

    /// Returns the expression's elaborated width.
    pub fn width(&self) -> u32 {
        match self {
            Expr::Const { width, .. }
            | Expr::Signal { width, .. }
            | Expr::MemoryRead { width, .. }
            | Expr::Param { width, .. }
            | Expr::Ident { width, .. }
            | Expr::Unary { width, .. }
            | Expr::Binary { width, .. }
            | Expr::Ternary { width, .. }
            | Expr::Concat { width, .. } => *width,
            Expr::BitSelect { .. } => 1,
            Expr::ScopeRef { .. } => 0,
            Expr::FuncCall { result_width, .. } => *result_width,
        }
    }

    /// Returns the expression's source location.
    pub fn loc(&self) -> SourceLoc {
        match self {
            Expr::Const { loc, .. }
            | Expr::Signal { loc, .. }
            | Expr::BitSelect { loc, .. }
            | Expr::MemoryRead { loc, .. }
            | Expr::Param { loc, .. }
            | Expr::ScopeRef { loc, .. }
            | Expr::Ident { loc, .. }
            | Expr::Unary { loc, .. }
            | Expr::Binary { loc, .. }
            | Expr::Ternary { loc, .. }
            | Expr::Concat { loc, .. }
            | Expr::FuncCall { loc, .. } => *loc,
        }
    }

    /// Deep-copies the expression tree.
    ///
    /// Signal references bump their signal's expression-reference count.
    /// Parameter references, unresolved identifiers, scope references,
    /// and function calls are context-bound and refuse duplication.
    pub fn duplicate(&self) -> VoltaResult<Expr> {
        match self {
            Expr::Const { value, width, loc } => Ok(Expr::Const {
                value: value.clone(),
                width: *width,
                loc: *loc,
            }),
            Expr::Signal { sig, width, loc } => Ok(Expr::Signal {
                sig: sig.clone(),
                width: *width,
                loc: *loc,
            }),
            Expr::BitSelect { sig, index, loc } => Ok(Expr::BitSelect {
                sig: sig.clone(),
                index: Box::new(index.duplicate()?),
                loc: *loc,
            }),
            Expr::MemoryRead {
                mem,
                index,
                width,
                loc,
            } => Ok(Expr::MemoryRead {
                mem: *mem,
                index: Box::new(index.duplicate()?),
                width: *width,
                loc: *loc,
            }),
            Expr::Unary {
                op,
                operand,
                width,
                loc,
            } => Ok(Expr::Unary {
                op: *op,
                operand: Box::new(operand.duplicate()?),
                width: *width,
                loc: *loc,
            }),
            Expr::Binary {
                op,
                left,
                right,
                width,
                loc,
            } => Ok(Expr::Binary {
                op: *op,
                left: Box::new(left.duplicate()?),
                right: Box::new(right.duplicate()?),
                width: *width,
                loc: *loc,
            }),
            Expr::Ternary {
                cond,
                true_val,
                false_val,
                width,
                loc,
            } => Ok(Expr::Ternary {
                cond: Box::new(cond.duplicate()?),
                true_val: Box::new(true_val.duplicate()?),
                false_val: Box::new(false_val.duplicate()?),
                width: *width,
                loc: *loc,
            }),
            Expr::Concat {
                parts,
                repeat,
                width,
                loc,
            } => {
                let mut copies = Vec::with_capacity(parts.len());
                for part in parts {
                    copies.push(match part {
                        Some(expr) => Some(expr.duplicate()?),
                        None => None,
                    });
                }
                Ok(Expr::Concat {
                    parts: copies,
                    repeat: *repeat,
                    width: *width,
                    loc: *loc,
                })
            }
            Expr::Param { name, .. } => Err(InternalError::new(format!(
                "parameter reference {name} cannot be duplicated"
            ))),
            Expr::Ident { name, .. } => Err(InternalError::new(format!(
                "unresolved identifier {name} cannot be duplicated"
            ))),
            Expr::ScopeRef { scope, .. } => Err(InternalError::new(format!(
                "scope reference {scope} cannot be duplicated"
            ))),
            Expr::FuncCall { func, .. } => Err(InternalError::new(format!(
                "function call {func} cannot be duplicated"
            ))),
        }
    }
}
