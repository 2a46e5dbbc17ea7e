//! Behavioral statements and top-level processes.

use crate::design::Design;
use crate::expr::{Expr, SignalRef};
use crate::ids::{MemoryId, ObjId};
use serde::{Deserialize, Serialize};
use volta_source::SourceLoc;

/// Whether an assignment takes effect immediately or at the end of the
/// time step.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum AssignKind {
    /// A blocking assignment (`=`).
    Blocking,
    /// A non-blocking assignment (`<=`).
    NonBlocking,
}

/// The flavor of a statement block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum BlockKind {
    /// A `begin`/`end` block: statements run in order.
    Sequential,
    /// A `fork`/`join` block: statements run concurrently.
    Parallel,
}

/// How case guards compare against the scrutinee.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum CaseKind {
    /// Plain `case`: four-valued equality.
    Eq,
    /// `casex`: x and z positions are wildcards.
    EqX,
    /// `casez`: z positions are wildcards.
    EqZ,
}

/// The kind tag of a top-level process.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ProcessKind {
    /// An `initial` block: runs once from time zero.
    Initial,
    /// An `always` block: reruns forever.
    Always,
}

/// One arm of a case statement. A `None` guard is the `default` arm.
#[derive(Debug)]
pub struct CaseItem {
    /// The guard expression, or `None` for the default arm.
    pub guard: Option<Expr>,
    /// The arm's body, if any.
    pub body: Option<Statement>,
}

/// A behavioral statement.
#[derive(Debug)]
pub enum Statement {
    /// An assignment to a signal, optionally through a bit-select mux.
    Assign {
        /// Blocking or non-blocking.
        kind: AssignKind,
        /// The target signal.
        sig: ObjId,
        /// The width of the assigned l-value.
        width: u32,
        /// The bit-select index expression, if this writes one bit.
        bmux: Option<Box<Expr>>,
        /// The r-value expression.
        rval: Box<Expr>,
        /// Source location.
        loc: SourceLoc,
    },
    /// An assignment to one word of a memory.
    AssignMem {
        /// Blocking or non-blocking.
        kind: AssignKind,
        /// The target memory.
        mem: MemoryId,
        /// The signal supplying the word index (reference counted).
        index: SignalRef,
        /// The r-value expression.
        rval: Box<Expr>,
        /// Source location.
        loc: SourceLoc,
    },
    /// A statement block.
    Block {
        /// Sequential or parallel execution.
        kind: BlockKind,
        /// The statements, in append order.
        stmts: Vec<Statement>,
    },
    /// An if/else statement. Either clause may be absent.
    Condit {
        /// The condition.
        cond: Box<Expr>,
        /// The then-branch.
        if_clause: Option<Box<Statement>>,
        /// The else-branch.
        else_clause: Option<Box<Statement>>,
        /// Source location.
        loc: SourceLoc,
    },
    /// A case statement.
    Case {
        /// The comparison flavor.
        kind: CaseKind,
        /// The scrutinee.
        expr: Box<Expr>,
        /// The arms, installed by [`set_case`](Statement::set_case).
        items: Vec<CaseItem>,
        /// Source location.
        loc: SourceLoc,
    },
    /// An unbounded loop.
    Forever {
        /// The loop body.
        body: Box<Statement>,
    },
    /// A counted loop.
    Repeat {
        /// The iteration count expression.
        count: Box<Expr>,
        /// The loop body.
        body: Box<Statement>,
        /// Source location.
        loc: SourceLoc,
    },
    /// An event wait (`@(...)`), holding the probe nodes that trigger it.
    Wait {
        /// The event's name.
        name: String,
        /// The event probe nodes.
        events: Vec<ObjId>,
        /// The statement run when the event fires.
        body: Option<Box<Statement>>,
        /// Source location.
        loc: SourceLoc,
    },
    /// A system task call such as `$display`.
    SysTask {
        /// The task name, `$` included.
        name: String,
        /// The argument expressions.
        parms: Vec<Expr>,
        /// Source location.
        loc: SourceLoc,
    },
    /// A call of a user-defined task.
    UserTask {
        /// The task's full dotted name.
        task: String,
        /// Source location.
        loc: SourceLoc,
    },
}

impl Statement {
    /// Creates an assignment of `rval` to the whole of `sig`.
    ///
    /// A non-blocking r-value narrower than the l-value is reported as an
    /// elaboration error; the statement is still built so later passes
    /// can surface more problems.
    pub fn assign(
        design: &mut Design,
        kind: AssignKind,
        sig: ObjId,
        rval: Expr,
        loc: SourceLoc,
    ) -> Statement {
        let width = design.obj(sig).pin_count();
        if kind == AssignKind::NonBlocking && rval.width() < width {
            design.error(
                rval.loc(),
                format!(
                    "expression bit width ({}) conflicts with l-value bit width ({width})",
                    rval.width()
                ),
            );
        }
        Statement::Assign {
            kind,
            sig,
            width,
            bmux: None,
            rval: Box::new(rval),
            loc,
        }
    }

    /// Creates a single-bit assignment `sig[bmux] = rval`.
    ///
    /// The r-value must collapse to one bit; failure is reported as an
    /// elaboration error.
    pub fn assign_bit(
        design: &mut Design,
        kind: AssignKind,
        sig: ObjId,
        bmux: Expr,
        mut rval: Expr,
        loc: SourceLoc,
    ) -> Statement {
        if !rval.set_width(1) {
            design.error(
                rval.loc(),
                "expression bit width conflicts with l-value bit width",
            );
        }
        Statement::Assign {
            kind,
            sig,
            width: 1,
            bmux: Some(Box::new(bmux)),
            rval: Box::new(rval),
            loc,
        }
    }

    /// Creates an assignment to the memory word selected by the `index`
    /// signal. The index signal is expression-reference counted for the
    /// life of the statement.
    pub fn assign_mem(
        design: &Design,
        kind: AssignKind,
        mem: MemoryId,
        index: ObjId,
        rval: Expr,
        loc: SourceLoc,
    ) -> Statement {
        Statement::AssignMem {
            kind,
            mem,
            index: SignalRef::new(design, index),
            rval: Box::new(rval),
            loc,
        }
    }

    /// Creates an empty statement block.
    pub fn block(kind: BlockKind) -> Statement {
        Statement::Block {
            kind,
            stmts: Vec::new(),
        }
    }

    /// Appends a statement to a block.
    ///
    /// # Panics
    ///
    /// Panics if this statement is not a block.
    pub fn append(&mut self, stmt: Statement) {
        let Statement::Block { stmts, .. } = self else {
            panic!("append on a non-block statement");
        };
        stmts.push(stmt);
    }

    /// Creates an if/else statement.
    pub fn condit(
        cond: Expr,
        if_clause: Option<Statement>,
        else_clause: Option<Statement>,
        loc: SourceLoc,
    ) -> Statement {
        Statement::Condit {
            cond: Box::new(cond),
            if_clause: if_clause.map(Box::new),
            else_clause: else_clause.map(Box::new),
            loc,
        }
    }

    /// Creates a case statement with `nitems` empty arms.
    pub fn case(kind: CaseKind, expr: Expr, nitems: usize, loc: SourceLoc) -> Statement {
        Statement::Case {
            kind,
            expr: Box::new(expr),
            items: (0..nitems)
                .map(|_| CaseItem {
                    guard: None,
                    body: None,
                })
                .collect(),
            loc,
        }
    }

    /// Installs one case arm. The guard (if present) is asked to match
    /// the scrutinee's width.
    ///
    /// # Panics
    ///
    /// Panics if this statement is not a case or the index is out of
    /// range.
    pub fn set_case(&mut self, idx: usize, guard: Option<Expr>, body: Option<Statement>) {
        let Statement::Case { expr, items, .. } = self else {
            panic!("set_case on a non-case statement");
        };
        assert!(idx < items.len(), "case arm {idx} out of range");
        let scrutinee_width = expr.width();
        let mut guard = guard;
        if let Some(g) = guard.as_mut() {
            let _ = g.set_width(scrutinee_width);
        }
        items[idx] = CaseItem { guard, body };
    }

    /// Creates a `forever` loop.
    pub fn forever(body: Statement) -> Statement {
        Statement::Forever {
            body: Box::new(body),
        }
    }

    /// Creates a `repeat` loop.
    pub fn repeat(count: Expr, body: Statement, loc: SourceLoc) -> Statement {
        Statement::Repeat {
            count: Box::new(count),
            body: Box::new(body),
            loc,
        }
    }

    /// Creates an event wait over the given probe nodes.
    pub fn wait(
        name: impl Into<String>,
        events: Vec<ObjId>,
        body: Option<Statement>,
        loc: SourceLoc,
    ) -> Statement {
        Statement::Wait {
            name: name.into(),
            events,
            body: body.map(Box::new),
            loc,
        }
    }

    /// Creates a system task call.
    ///
    /// # Panics
    ///
    /// Panics if the name does not start with `$`.
    pub fn sys_task(name: impl Into<String>, parms: Vec<Expr>, loc: SourceLoc) -> Statement {
        let name = name.into();
        assert!(
            name.starts_with('$'),
            "system task name {name:?} must start with '$'"
        );
        Statement::SysTask { name, parms, loc }
    }

    /// Creates a user task call by full task name.
    pub fn user_task(task: impl Into<String>, loc: SourceLoc) -> Statement {
        Statement::UserTask {
            task: task.into(),
            loc,
        }
    }
}

/// A top-level behavioral process: an `initial` or `always` block.
#[derive(Debug)]
pub struct Process {
    kind: ProcessKind,
    statement: Statement,
}

impl Process {
    /// Wraps a statement in a process of the given kind.
    pub fn new(kind: ProcessKind, statement: Statement) -> Self {
        Self { kind, statement }
    }

    /// Returns the process kind.
    pub fn kind(&self) -> ProcessKind {
        self.kind
    }

    /// Returns the process body.
    pub fn statement(&self) -> &Statement {
        &self.statement
    }
}
