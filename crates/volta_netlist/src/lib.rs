//! The elaborated netlist IR of the Volta Verilog compiler.
//!
//! This crate holds a design after parsing and elaboration and before
//! synthesis or code generation. The [`Design`] is the root container; it
//! owns every pin, object, and memory in generational arenas and threads
//! registered signals and nodes onto design-wide rings.
//!
//! # Architecture
//!
//! - **Pins and the nexus.** Electrical connectivity is a circular ring of
//!   [`Pin`] records; `Design::connect` splices rings, and ring walks
//!   answer the input/output/signal queries synthesis passes need.
//! - **Objects.** Everything with pins is an [`Obj`]: signals, gates, and
//!   the LPM-style devices (flip-flop, adder/subtractor, shifter,
//!   comparator, multiplexer, RAM port, UDP). The concrete device is an
//!   [`ObjKind`] tag; typed pin views expose the fixed pinout layouts.
//! - **Behavior.** Processes wrap [`Statement`] trees whose leaves are
//!   [`Expr`] trees with explicit widths; signal references hold RAII
//!   guards on the signal's expression-reference counter.
//! - **Registries.** Scopes, parameters, memories, functions, and tasks
//!   are keyed by dotted fullnames with upward scope resolution.

#![warn(missing_docs)]

pub mod arena;
pub mod defs;
pub mod design;
pub mod expr;
pub mod gate;
pub mod ids;
pub mod lpm;
pub mod nexus;
pub mod obj;
pub mod path;
pub mod pin;
pub mod ram;
pub mod scope;
pub mod signal;
pub mod stmt;
pub mod udp;
pub mod width;

pub use arena::{SlotArena, SlotKey};
pub use defs::{FuncDef, TaskDef};
pub use design::Design;
pub use expr::{BinaryClass, BinaryOp, Expr, SignalRef, UnaryOp};
pub use gate::{ConstData, EventData, EventEdge, GateData, GateKind};
pub use ids::{MemoryId, ObjId, PinId};
pub use lpm::{AddSubData, CompareData, FfData, MuxData, ShiftData};
pub use obj::{Obj, ObjKind};
pub use path::ScopePath;
pub use pin::{Pin, PinDir};
pub use ram::{Memory, RamPortData};
pub use scope::{Scope, ScopeKind};
pub use signal::{ErefCounter, ErefGuard, PortRole, SignalData, SignalKind};
pub use stmt::{AssignKind, BlockKind, CaseItem, CaseKind, Process, ProcessKind, Statement};
pub use udp::UdpData;
pub use width::pad_to_width;
