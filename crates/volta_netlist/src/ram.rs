//! Addressable memories and the RAM ports that access them.

use crate::design::Design;
use crate::ids::{MemoryId, ObjId, PinId};
use crate::obj::{Obj, ObjKind};
use crate::pin::PinDir;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An addressable memory: an array of words the behavioral code indexes.
///
/// The declared index range may run in either order (`[0:15]` or
/// `[15:0]`). The memory keeps a back-reference list of the RAM port
/// nodes bound to it, most recently created first.
#[derive(Debug)]
pub struct Memory {
    name: String,
    width: u32,
    idxh: i64,
    idxl: i64,
    attributes: BTreeMap<String, String>,
    ports: Vec<ObjId>,
}

impl Memory {
    /// Creates a memory of `width`-bit words with the declared index
    /// range `[idxh:idxl]`.
    pub fn new(name: impl Into<String>, width: u32, idxh: i64, idxl: i64) -> Self {
        Self {
            name: name.into(),
            width,
            idxh,
            idxl,
            attributes: BTreeMap::new(),
            ports: Vec::new(),
        }
    }

    /// Returns the memory's fully qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the word width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the number of words.
    pub fn count(&self) -> u32 {
        (self.idxh.abs_diff(self.idxl) + 1) as u32
    }

    /// Maps a declared word index to a zero-based address.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is outside the declared range.
    pub fn index_to_address(&self, idx: i64) -> u32 {
        let (lo, hi) = if self.idxh < self.idxl {
            (self.idxh, self.idxl)
        } else {
            (self.idxl, self.idxh)
        };
        assert!(
            (lo..=hi).contains(&idx),
            "word index {idx} outside memory range [{}:{}]",
            self.idxh,
            self.idxl
        );
        (idx - lo) as u32
    }

    /// Installs the attribute map.
    ///
    /// # Panics
    ///
    /// Panics if attributes have already been set.
    pub fn set_attributes(&mut self, attributes: BTreeMap<String, String>) {
        assert!(
            self.attributes.is_empty(),
            "attributes already set on {}",
            self.name
        );
        self.attributes = attributes;
    }

    /// Returns the attribute value for `key`, or the empty string.
    pub fn attribute(&self, key: &str) -> &str {
        self.attributes
            .get(key)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Returns the RAM ports bound to this memory, most recent first.
    pub fn ports(&self) -> &[ObjId] {
        &self.ports
    }

    pub(crate) fn add_port(&mut self, port: ObjId) {
        self.ports.insert(0, port);
    }

    pub(crate) fn remove_port(&mut self, port: ObjId) {
        let pos = self
            .ports
            .iter()
            .position(|&p| p == port)
            .expect("RAM port missing from its memory's port list");
        self.ports.remove(pos);
    }
}

/// Payload of a RAM port node bound to a [`Memory`].
///
/// Pinout: 0 InClock, 1 OutClock, 2 WE, Address\[i\] at `3+i`, Data\[i\]
/// at `3+AW+i`, Q\[i\] at `3+AW+W+i`, where AW is the address width and W
/// the memory's word width.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RamPortData {
    mem: MemoryId,
    awidth: u32,
    width: u32,
}

impl RamPortData {
    /// Returns the memory this port accesses.
    pub fn mem(&self) -> MemoryId {
        self.mem
    }

    /// Returns the address width in bits.
    pub fn awidth(&self) -> u32 {
        self.awidth
    }

    /// Returns the data width in bits (the memory's word width).
    pub fn width(&self) -> u32 {
        self.width
    }
}

/// Typed pin view of a RAM port.
pub struct RamPortPins<'a> {
    obj: &'a Obj,
    data: &'a RamPortData,
}

impl RamPortPins<'_> {
    /// Returns the address width in bits.
    pub fn awidth(&self) -> u32 {
        self.data.awidth
    }

    /// Returns the data width in bits.
    pub fn width(&self) -> u32 {
        self.data.width
    }

    /// The write-clock input.
    pub fn in_clock(&self) -> PinId {
        self.obj.pin(0)
    }

    /// The read-clock input.
    pub fn out_clock(&self) -> PinId {
        self.obj.pin(1)
    }

    /// The write-enable input.
    pub fn we(&self) -> PinId {
        self.obj.pin(2)
    }

    /// The address input for the given bit.
    pub fn address(&self, bit: u32) -> PinId {
        assert!(bit < self.data.awidth);
        self.obj.pin(3 + bit)
    }

    /// The write-data input for the given bit.
    pub fn data(&self, bit: u32) -> PinId {
        assert!(bit < self.data.width);
        self.obj.pin(3 + self.data.awidth + bit)
    }

    /// The read-data output for the given bit.
    pub fn q(&self, bit: u32) -> PinId {
        assert!(bit < self.data.width);
        self.obj.pin(3 + self.data.awidth + self.data.width + bit)
    }
}

impl Obj {
    /// Returns the RAM port pin view, if this object is a RAM port.
    pub fn as_ram_port(&self) -> Option<RamPortPins<'_>> {
        match self.kind() {
            ObjKind::RamPort(data) => Some(RamPortPins { obj: self, data }),
            _ => None,
        }
    }
}

impl Design {
    /// Creates a RAM port bound to `mem` with an `awidth`-bit address
    /// input. The port prepends itself to the memory's port list.
    pub fn new_ram_port(&mut self, name: impl Into<String>, mem: MemoryId, awidth: u32) -> ObjId {
        let width = self.memories[mem].width();
        let id = self.alloc_obj(
            name.into(),
            3 + awidth + 2 * width,
            ObjKind::RamPort(RamPortData { mem, awidth, width }),
        );
        self.set_pin_role(id, 0, PinDir::Input, "InClock", 0);
        self.set_pin_role(id, 1, PinDir::Input, "OutClock", 0);
        self.set_pin_role(id, 2, PinDir::Input, "WE", 0);
        for bit in 0..awidth {
            self.set_pin_role(id, 3 + bit, PinDir::Input, "Address", bit);
        }
        for bit in 0..width {
            self.set_pin_role(id, 3 + awidth + bit, PinDir::Input, "Data", bit);
            self.set_pin_role(id, 3 + awidth + width + bit, PinDir::Output, "Q", bit);
        }
        self.memories[mem].add_port(id);
        id
    }

    /// Counts the ports bound to this port's memory, this one included.
    pub fn count_partners(&self, port: ObjId) -> usize {
        let data = self.ram_port_data(port);
        self.memories[data.mem()].ports().len()
    }

    /// Merges compatible sibling ports into this one.
    ///
    /// A sibling is absorbed when its address pins are pairwise linked to
    /// ours, its clock and write-enable pins do not conflict (an unlinked
    /// pin on either side is compatible), and any data or Q bits linked on
    /// both sides are linked to each other. Absorbing connects every
    /// corresponding pin pair and destroys the sibling, which removes it
    /// from the memory's port list.
    pub fn absorb_partners(&mut self, port: ObjId) {
        let data = self.ram_port_data(port);
        let (mem, awidth, width) = (data.mem(), data.awidth(), data.width());

        // Snapshot: absorbed ports drop out of the live list mid-loop.
        let candidates: Vec<ObjId> = self.memories[mem].ports().to_vec();
        for cur in candidates {
            if cur == port {
                continue;
            }

            let mut ok = true;
            for bit in 0..awidth {
                ok &= self.is_linked_to(self.objs[port].pin(3 + bit), self.objs[cur].pin(3 + bit));
            }
            if !ok {
                continue;
            }

            // InClock, OutClock, WE: linked on both sides means they must
            // share a nexus.
            if (0..3).any(|idx| {
                let mine = self.objs[port].pin(idx);
                let theirs = self.objs[cur].pin(idx);
                self.is_linked(mine) && self.is_linked(theirs) && !self.is_linked_to(mine, theirs)
            }) {
                continue;
            }

            for bit in 0..width {
                let mine = self.objs[port].pin(3 + awidth + bit);
                let theirs = self.objs[cur].pin(3 + awidth + bit);
                if !self.is_linked(mine) || !self.is_linked(theirs) {
                    continue;
                }
                ok &= self.is_linked_to(mine, theirs);
            }
            if !ok {
                continue;
            }

            for bit in 0..width {
                let mine = self.objs[port].pin(3 + awidth + width + bit);
                let theirs = self.objs[cur].pin(3 + awidth + width + bit);
                if !self.is_linked(mine) || !self.is_linked(theirs) {
                    continue;
                }
                ok &= self.is_linked_to(mine, theirs);
            }
            if !ok {
                continue;
            }

            // No reason left to reject cur: link up all pins and delete it.
            for idx in 0..3 {
                self.connect(self.objs[port].pin(idx), self.objs[cur].pin(idx));
            }
            for bit in 0..awidth {
                self.connect(self.objs[port].pin(3 + bit), self.objs[cur].pin(3 + bit));
            }
            for bit in 0..width {
                self.connect(
                    self.objs[port].pin(3 + awidth + bit),
                    self.objs[cur].pin(3 + awidth + bit),
                );
                self.connect(
                    self.objs[port].pin(3 + awidth + width + bit),
                    self.objs[cur].pin(3 + awidth + width + bit),
                );
            }
            self.delete_obj(cur);
        }
    }

    fn ram_port_data(&self, port: ObjId) -> RamPortData {
        match self.objs[port].kind() {
            ObjKind::RamPort(data) => *data,
            _ => panic!("object {} is not a RAM port", self.objs[port].name()),
        }
    }
}
