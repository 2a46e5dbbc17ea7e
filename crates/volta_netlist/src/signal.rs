//! Signals: nets, registers, and wires, with expression reference counting.

use crate::design::Design;
use crate::ids::ObjId;
use crate::obj::ObjKind;
use crate::path::ScopePath;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use volta_common::Logic;

/// The declared kind of a signal, determining drive and storage semantics.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SignalKind {
    /// An undeclared wire created by implicit declaration rules.
    Implicit,
    /// An undeclared reg created by implicit declaration rules.
    ImplicitReg,
    /// A Verilog `integer` variable.
    Integer,
    /// A `reg` variable.
    Reg,
    /// A net tied to supply0.
    Supply0,
    /// A net tied to supply1.
    Supply1,
    /// A `tri` net.
    Tri,
    /// A `tri0` net.
    Tri0,
    /// A `tri1` net.
    Tri1,
    /// A `triand` net.
    Triand,
    /// A `trior` net.
    Trior,
    /// A `wand` net.
    Wand,
    /// A `wor` net.
    Wor,
    /// A plain `wire`.
    Wire,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SignalKind::Implicit => "wire /*implicit*/",
            SignalKind::ImplicitReg => "reg /*implicit*/",
            SignalKind::Integer => "integer",
            SignalKind::Reg => "reg",
            SignalKind::Supply0 => "supply0",
            SignalKind::Supply1 => "supply1",
            SignalKind::Tri => "tri",
            SignalKind::Tri0 => "tri0",
            SignalKind::Tri1 => "tri1",
            SignalKind::Triand => "triand",
            SignalKind::Trior => "trior",
            SignalKind::Wand => "wand",
            SignalKind::Wor => "wor",
            SignalKind::Wire => "wire",
        };
        write!(f, "{text}")
    }
}

/// How a signal participates in its module's port list.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum PortRole {
    /// Not a port.
    #[default]
    NotAPort,
    /// An input port.
    Input,
    /// An output port.
    Output,
    /// A bidirectional port.
    Inout,
}

/// The expression-reference counter a signal shares with the expressions
/// that mention it.
///
/// The counter itself lives on the signal; each referencing expression
/// holds an [`ErefGuard`]. A signal may not be destroyed while its count
/// is non-zero.
#[derive(Clone, Default)]
pub struct ErefCounter(Rc<Cell<usize>>);

impl ErefCounter {
    /// Creates a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current reference count.
    pub fn get(&self) -> usize {
        self.0.get()
    }

    /// Issues a guard, incrementing the count until the guard drops.
    pub fn guard(&self) -> ErefGuard {
        self.0.set(self.0.get() + 1);
        ErefGuard {
            count: Rc::clone(&self.0),
        }
    }
}

impl fmt::Debug for ErefCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErefCounter({})", self.0.get())
    }
}

/// RAII guard representing one live expression reference to a signal.
///
/// Cloning increments the shared count (a duplicated expression is a new
/// reference); dropping decrements it.
pub struct ErefGuard {
    count: Rc<Cell<usize>>,
}

impl Clone for ErefGuard {
    fn clone(&self) -> Self {
        self.count.set(self.count.get() + 1);
        Self {
            count: Rc::clone(&self.count),
        }
    }
}

impl Drop for ErefGuard {
    fn drop(&mut self) {
        let n = self.count.get();
        assert!(n > 0, "expression reference count underflow");
        self.count.set(n - 1);
    }
}

impl fmt::Debug for ErefGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErefGuard({})", self.count.get())
    }
}

/// The signal-specific payload of an [`Obj`](crate::obj::Obj).
#[derive(Debug)]
pub struct SignalData {
    scope: Option<ScopePath>,
    kind: SignalKind,
    port: PortRole,
    msb: i64,
    lsb: i64,
    ivalue: Vec<Logic>,
    local: bool,
    eref: ErefCounter,
}

impl SignalData {
    /// Creates the payload for a signal declared `[msb:lsb]` (either
    /// order). The initial value is all `z`.
    pub(crate) fn new(scope: Option<ScopePath>, kind: SignalKind, msb: i64, lsb: i64) -> Self {
        let width = msb.abs_diff(lsb) + 1;
        Self {
            scope,
            kind,
            port: PortRole::NotAPort,
            msb,
            lsb,
            ivalue: vec![Logic::Vz; width as usize],
            local: false,
            eref: ErefCounter::new(),
        }
    }

    /// Returns the enclosing scope, if the signal has one. Temporaries
    /// created mid-synthesis have none.
    pub fn scope(&self) -> Option<&ScopePath> {
        self.scope.as_ref()
    }

    /// Returns the declared kind.
    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    /// Changes the declared kind (e.g. implicit promotion to reg).
    pub fn set_kind(&mut self, kind: SignalKind) {
        self.kind = kind;
    }

    /// Returns the port role.
    pub fn port(&self) -> PortRole {
        self.port
    }

    /// Sets the port role.
    pub fn set_port(&mut self, port: PortRole) {
        self.port = port;
    }

    /// Returns the declared most significant bit number.
    pub fn msb(&self) -> i64 {
        self.msb
    }

    /// Returns the declared least significant bit number.
    pub fn lsb(&self) -> i64 {
        self.lsb
    }

    /// Maps a declared bit number to a pin index.
    pub fn sb_to_idx(&self, sb: i64) -> u32 {
        if self.msb >= self.lsb {
            (sb - self.lsb) as u32
        } else {
            (self.lsb - sb) as u32
        }
    }

    /// Returns the initial value of the given pin.
    pub fn init_bit(&self, idx: u32) -> Logic {
        self.ivalue[idx as usize]
    }

    /// Sets the initial value of the given pin.
    pub fn set_init_bit(&mut self, idx: u32, value: Logic) {
        self.ivalue[idx as usize] = value;
    }

    /// Returns `true` for compiler-generated temporaries.
    pub fn local(&self) -> bool {
        self.local
    }

    /// Marks this signal as a compiler-generated temporary.
    pub fn set_local(&mut self, local: bool) {
        self.local = local;
    }

    /// Returns the number of live expression references.
    pub fn eref(&self) -> usize {
        self.eref.get()
    }

    /// Returns the shared reference counter, for expressions that need to
    /// take a guard on it.
    pub(crate) fn eref_counter(&self) -> &ErefCounter {
        &self.eref
    }
}

impl Design {
    /// Creates a signal declared `[msb:lsb]` (either order) and returns
    /// its id. The signal is not yet a member of the design's signal ring;
    /// register it with [`add_signal`](Design::add_signal).
    ///
    /// `name` is the fully qualified dotted name.
    pub fn new_signal(
        &mut self,
        scope: Option<&ScopePath>,
        name: impl Into<String>,
        kind: SignalKind,
        msb: i64,
        lsb: i64,
    ) -> ObjId {
        let width = (msb.abs_diff(lsb) + 1) as u32;
        let data = SignalData::new(scope.cloned(), kind, msb, lsb);
        let id = self.alloc_obj(name.into(), width, ObjKind::Signal(data));
        for idx in 0..width {
            self.set_pin_role(id, idx, crate::pin::PinDir::Passive, "P", idx);
        }
        id
    }

    /// Creates a signal with `width` pins numbered `[width-1:0]`.
    pub fn new_signal_width(
        &mut self,
        scope: Option<&ScopePath>,
        name: impl Into<String>,
        kind: SignalKind,
        width: u32,
    ) -> ObjId {
        self.new_signal(scope, name, kind, width as i64 - 1, 0)
    }

    /// Creates a local temporary signal: implicit kind, no scope, local
    /// flag set. Passes use these for intermediate values.
    pub fn new_temp_signal(&mut self, name: impl Into<String>, width: u32) -> ObjId {
        let id = self.new_signal_width(None, name, SignalKind::Implicit, width);
        self.obj_mut(id)
            .as_signal_mut()
            .expect("new_signal_width returns a signal")
            .set_local(true);
        id
    }
}
