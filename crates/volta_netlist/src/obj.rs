//! The object base: anything in the netlist that has pins.

use crate::expr::Expr;
use crate::gate::{ConstData, EventData, GateData};
use crate::ids::PinId;
use crate::lpm::{AddSubData, CompareData, FfData, MuxData, ShiftData};
use crate::ram::RamPortData;
use crate::signal::SignalData;
use crate::udp::UdpData;
use std::collections::BTreeMap;

/// The concrete kind of an [`Obj`], carrying the per-device payload.
///
/// This tagged union replaces a class hierarchy: ring walks that need to
/// know whether an owner is a signal test the discriminant instead of
/// downcasting.
#[derive(Debug)]
pub enum ObjKind {
    /// A net, reg, wire, or integer.
    Signal(SignalData),
    /// A flip-flop bank.
    Ff(FfData),
    /// An adder/subtractor.
    AddSub(AddSubData),
    /// A combinational barrel shifter.
    Shift(ShiftData),
    /// A magnitude comparator.
    Compare(CompareData),
    /// A multiplexer.
    Mux(MuxData),
    /// A RAM port bound to a memory.
    RamPort(RamPortData),
    /// A primitive logic gate.
    Gate(GateData),
    /// A unity-gain buffer that passes z through.
    Bufz,
    /// A constant driver, one output pin per vector bit.
    Const(ConstData),
    /// A case-equality (`===`) comparator gate.
    CaseCmp,
    /// An edge/level event probe feeding an event wait.
    Event(EventData),
    /// A user-defined primitive with a truth or state table.
    Udp(UdpData),
}

/// A named object owning a fixed array of pins.
///
/// Objects carry a string attribute map, up to three delay expressions
/// (rise, fall, decay), and a transient mark bit used by graph-rewriting
/// passes. The pin array never changes size after construction.
#[derive(Debug)]
pub struct Obj {
    name: String,
    pins: Vec<PinId>,
    attributes: BTreeMap<String, String>,
    delays: [Option<Expr>; 3],
    mark: bool,
    kind: ObjKind,
    pub(crate) ring_prev: Option<crate::ids::ObjId>,
    pub(crate) ring_next: Option<crate::ids::ObjId>,
    pub(crate) registered: bool,
}

impl Obj {
    pub(crate) fn new(name: String, kind: ObjKind) -> Self {
        Self {
            name,
            pins: Vec::new(),
            attributes: BTreeMap::new(),
            delays: [None, None, None],
            mark: false,
            kind,
            ring_prev: None,
            ring_next: None,
            registered: false,
        }
    }

    pub(crate) fn push_pin(&mut self, pin: PinId) {
        self.pins.push(pin);
    }

    /// Returns the object name. Signal names are fully qualified dotted
    /// names; device names are whatever the elaborator generated.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of pins.
    pub fn pin_count(&self) -> u32 {
        self.pins.len() as u32
    }

    /// Returns the pin id at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn pin(&self, idx: u32) -> PinId {
        assert!(
            (idx as usize) < self.pins.len(),
            "pin index {idx} out of range for {} pins",
            self.pins.len()
        );
        self.pins[idx as usize]
    }

    /// Returns all pin ids in index order.
    pub fn pins(&self) -> &[PinId] {
        &self.pins
    }

    /// Returns the attribute value for `key`, or the empty string.
    pub fn attribute(&self, key: &str) -> &str {
        self.attributes
            .get(key)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Sets a single attribute.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Installs the full attribute map.
    ///
    /// # Panics
    ///
    /// Panics if attributes have already been set; the elaborator installs
    /// the map exactly once.
    pub fn set_attributes(&mut self, attributes: BTreeMap<String, String>) {
        assert!(
            self.attributes.is_empty(),
            "attributes already set on {}",
            self.name
        );
        self.attributes = attributes;
    }

    /// Returns the attribute map.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Tests attribute compatibility: every key in `that` must be present
    /// here with the same value. Extra keys on `self` are allowed.
    pub fn has_compat_attributes(&self, that: &Obj) -> bool {
        that.attributes
            .iter()
            .all(|(key, value)| self.attributes.get(key) == Some(value))
    }

    /// Returns the delay expression in the given slot (0 = rise,
    /// 1 = fall, 2 = decay).
    pub fn delay(&self, slot: usize) -> Option<&Expr> {
        self.delays[slot].as_ref()
    }

    /// Sets the delay expression in the given slot.
    pub fn set_delay(&mut self, slot: usize, expr: Expr) {
        self.delays[slot] = Some(expr);
    }

    /// Returns the traversal mark.
    pub fn mark(&self) -> bool {
        self.mark
    }

    /// Sets the traversal mark.
    pub fn set_mark(&mut self, mark: bool) {
        self.mark = mark;
    }

    /// Returns the concrete kind.
    pub fn kind(&self) -> &ObjKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut ObjKind {
        &mut self.kind
    }

    /// Returns `true` if this object is a signal.
    pub fn is_signal(&self) -> bool {
        matches!(self.kind, ObjKind::Signal(_))
    }

    /// Returns the signal payload, if this object is a signal.
    pub fn as_signal(&self) -> Option<&SignalData> {
        match &self.kind {
            ObjKind::Signal(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the mutable signal payload, if this object is a signal.
    pub fn as_signal_mut(&mut self) -> Option<&mut SignalData> {
        match &mut self.kind {
            ObjKind::Signal(data) => Some(data),
            _ => None,
        }
    }
}
