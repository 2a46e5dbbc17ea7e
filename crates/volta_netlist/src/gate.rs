//! Simple structural nodes: logic gates, buffers, constant drivers,
//! case-equality comparators, and event probes.

use crate::design::Design;
use crate::ids::ObjId;
use crate::obj::{Obj, ObjKind};
use crate::pin::PinDir;
use serde::{Deserialize, Serialize};
use volta_common::{Logic, LogicVec};

/// The gate family. Pin 0 is the output; pins 1 and up are inputs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum GateKind {
    /// AND gate.
    And,
    /// Non-inverting buffer.
    Buf,
    /// Tristate buffer, enabled low.
    Bufif0,
    /// Tristate buffer, enabled high.
    Bufif1,
    /// NAND gate.
    Nand,
    /// NOR gate.
    Nor,
    /// Inverter.
    Not,
    /// OR gate.
    Or,
    /// XNOR gate.
    Xnor,
    /// XOR gate.
    Xor,
}

/// Payload of a primitive logic gate.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GateData {
    kind: GateKind,
}

impl GateData {
    /// Returns the gate kind.
    pub fn kind(&self) -> GateKind {
        self.kind
    }
}

/// Payload of a constant driver. The node has one output pin per vector
/// bit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConstData {
    value: LogicVec,
}

impl ConstData {
    /// Returns the driven value of the given bit.
    pub fn value(&self, idx: u32) -> Logic {
        self.value.get(idx)
    }

    /// Returns the full constant vector.
    pub fn value_vec(&self) -> &LogicVec {
        &self.value
    }
}

/// The edge a probe watches for.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum EventEdge {
    /// Any change of value.
    AnyEdge,
    /// A rising edge.
    Posedge,
    /// A falling edge.
    Negedge,
    /// Any transition to a non-zero value.
    Positive,
}

/// Payload of an event probe node feeding an event wait statement.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EventData {
    edge: EventEdge,
}

impl EventData {
    /// Returns the watched edge.
    pub fn edge(&self) -> EventEdge {
        self.edge
    }
}

impl Obj {
    /// Returns the gate payload, if this object is a gate.
    pub fn as_gate(&self) -> Option<&GateData> {
        match self.kind() {
            ObjKind::Gate(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the constant payload, if this object is a constant driver.
    pub fn as_const(&self) -> Option<&ConstData> {
        match self.kind() {
            ObjKind::Const(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the event payload, if this object is an event probe.
    pub fn as_event(&self) -> Option<&EventData> {
        match self.kind() {
            ObjKind::Event(data) => Some(data),
            _ => None,
        }
    }
}

impl Design {
    /// Creates a logic gate with `pins` total pins: one output and
    /// `pins - 1` inputs.
    pub fn new_gate(&mut self, name: impl Into<String>, kind: GateKind, pins: u32) -> ObjId {
        assert!(pins >= 2, "a gate needs an output and at least one input");
        let id = self.alloc_obj(name.into(), pins, ObjKind::Gate(GateData { kind }));
        self.set_pin_role(id, 0, PinDir::Output, "O", 0);
        for idx in 1..pins {
            self.set_pin_role(id, idx, PinDir::Input, "I", idx - 1);
        }
        id
    }

    /// Creates a BUFZ: a unity-gain buffer with pin 0 output and pin 1
    /// input.
    pub fn new_bufz(&mut self, name: impl Into<String>) -> ObjId {
        let id = self.alloc_obj(name.into(), 2, ObjKind::Bufz);
        self.set_pin_role(id, 0, PinDir::Output, "O", 0);
        self.set_pin_role(id, 1, PinDir::Input, "I", 0);
        id
    }

    /// Creates a constant driver for a wide value, one output pin per bit.
    pub fn new_const(&mut self, name: impl Into<String>, value: LogicVec) -> ObjId {
        let width = value.width();
        let id = self.alloc_obj(name.into(), width, ObjKind::Const(ConstData { value }));
        for idx in 0..width {
            self.set_pin_role(id, idx, PinDir::Output, "O", idx);
        }
        id
    }

    /// Creates a single-bit constant driver.
    pub fn new_const_bit(&mut self, name: impl Into<String>, value: Logic) -> ObjId {
        self.new_const(name, LogicVec::filled(1, value))
    }

    /// Creates a case-equality comparator gate: pin 0 output, pins 1 and 2
    /// the compared inputs.
    pub fn new_case_cmp(&mut self, name: impl Into<String>) -> ObjId {
        let id = self.alloc_obj(name.into(), 3, ObjKind::CaseCmp);
        self.set_pin_role(id, 0, PinDir::Output, "O", 0);
        self.set_pin_role(id, 1, PinDir::Input, "I", 0);
        self.set_pin_role(id, 2, PinDir::Input, "I", 1);
        id
    }

    /// Creates an event probe of `width` bits watching the given edge.
    /// The pins stay passive; probes sample without driving or loading.
    pub fn new_event(&mut self, name: impl Into<String>, width: u32, edge: EventEdge) -> ObjId {
        let id = self.alloc_obj(name.into(), width, ObjKind::Event(EventData { edge }));
        for idx in 0..width {
            self.set_pin_role(id, idx, PinDir::Passive, "P", idx);
        }
        id
    }
}
