//! Wide structural devices: flip-flop bank, adder/subtractor, barrel
//! shifter, comparator, and multiplexer.
//!
//! Each device has a fixed pinout layout; the typed pin views map role
//! names to pin indices so passes never hard-code offsets.

use crate::design::Design;
use crate::ids::{ObjId, PinId};
use crate::obj::{Obj, ObjKind};
use crate::pin::PinDir;
use serde::{Deserialize, Serialize};

/// Payload of a flip-flop bank of `width` bits.
///
/// Pinout: 0 Clock, 1 Enable, 2 Aload, 3 Aset, 4 Aclr, 5 Sload, 6 Sset,
/// 7 Sclr, then Data\[i\] at `8+2i` and Q\[i\] at `9+2i`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FfData {
    width: u32,
}

impl FfData {
    /// Returns the data width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }
}

/// Typed pin view of a flip-flop bank.
pub struct FfPins<'a> {
    obj: &'a Obj,
    data: &'a FfData,
}

impl FfPins<'_> {
    /// Returns the data width in bits.
    pub fn width(&self) -> u32 {
        self.data.width
    }

    /// The clock input.
    pub fn clock(&self) -> PinId {
        self.obj.pin(0)
    }

    /// The clock-enable input.
    pub fn enable(&self) -> PinId {
        self.obj.pin(1)
    }

    /// The asynchronous-load input.
    pub fn aload(&self) -> PinId {
        self.obj.pin(2)
    }

    /// The asynchronous-set input.
    pub fn aset(&self) -> PinId {
        self.obj.pin(3)
    }

    /// The asynchronous-clear input.
    pub fn aclr(&self) -> PinId {
        self.obj.pin(4)
    }

    /// The synchronous-load input.
    pub fn sload(&self) -> PinId {
        self.obj.pin(5)
    }

    /// The synchronous-set input.
    pub fn sset(&self) -> PinId {
        self.obj.pin(6)
    }

    /// The synchronous-clear input.
    pub fn sclr(&self) -> PinId {
        self.obj.pin(7)
    }

    /// The data input for the given bit.
    pub fn data(&self, bit: u32) -> PinId {
        assert!(bit < self.data.width);
        self.obj.pin(8 + 2 * bit)
    }

    /// The Q output for the given bit.
    pub fn q(&self, bit: u32) -> PinId {
        assert!(bit < self.data.width);
        self.obj.pin(9 + 2 * bit)
    }
}

/// Payload of an adder/subtractor of `width` bits.
///
/// Pinout: 0 Add_Sub, 1 Aclr, 2 Clock, 3 Cin, 4 Cout, 5 Overflow, then
/// DataA\[i\] at `6+3i`, DataB\[i\] at `7+3i`, Result\[i\] at `8+3i`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AddSubData {
    width: u32,
}

impl AddSubData {
    /// Returns the operand width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }
}

/// Typed pin view of an adder/subtractor.
pub struct AddSubPins<'a> {
    obj: &'a Obj,
    data: &'a AddSubData,
}

impl AddSubPins<'_> {
    /// Returns the operand width in bits.
    pub fn width(&self) -> u32 {
        self.data.width
    }

    /// The add/subtract mode select input.
    pub fn add_sub(&self) -> PinId {
        self.obj.pin(0)
    }

    /// The asynchronous-clear input.
    pub fn aclr(&self) -> PinId {
        self.obj.pin(1)
    }

    /// The clock input (for registered results).
    pub fn clock(&self) -> PinId {
        self.obj.pin(2)
    }

    /// The carry input.
    pub fn cin(&self) -> PinId {
        self.obj.pin(3)
    }

    /// The carry output.
    pub fn cout(&self) -> PinId {
        self.obj.pin(4)
    }

    /// The overflow output.
    pub fn overflow(&self) -> PinId {
        self.obj.pin(5)
    }

    /// The A operand input for the given bit.
    pub fn data_a(&self, bit: u32) -> PinId {
        assert!(bit < self.data.width);
        self.obj.pin(6 + 3 * bit)
    }

    /// The B operand input for the given bit.
    pub fn data_b(&self, bit: u32) -> PinId {
        assert!(bit < self.data.width);
        self.obj.pin(7 + 3 * bit)
    }

    /// The result output for the given bit.
    pub fn result(&self, bit: u32) -> PinId {
        assert!(bit < self.data.width);
        self.obj.pin(8 + 3 * bit)
    }
}

/// Payload of a combinational barrel shifter.
///
/// Pinout: 0 Direction, 1 Underflow, 2 Overflow, Data\[i\] at `3+i`,
/// Result\[i\] at `3+W+i`, Distance\[i\] at `3+2W+i`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ShiftData {
    width: u32,
    dist_width: u32,
}

impl ShiftData {
    /// Returns the data width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the width of the shift-distance input in bits.
    pub fn dist_width(&self) -> u32 {
        self.dist_width
    }
}

/// Typed pin view of a barrel shifter.
pub struct ShiftPins<'a> {
    obj: &'a Obj,
    data: &'a ShiftData,
}

impl ShiftPins<'_> {
    /// Returns the data width in bits.
    pub fn width(&self) -> u32 {
        self.data.width
    }

    /// Returns the width of the shift-distance input in bits.
    pub fn dist_width(&self) -> u32 {
        self.data.dist_width
    }

    /// The shift direction input.
    pub fn direction(&self) -> PinId {
        self.obj.pin(0)
    }

    /// The underflow output.
    pub fn underflow(&self) -> PinId {
        self.obj.pin(1)
    }

    /// The overflow output.
    pub fn overflow(&self) -> PinId {
        self.obj.pin(2)
    }

    /// The data input for the given bit.
    pub fn data(&self, bit: u32) -> PinId {
        assert!(bit < self.data.width);
        self.obj.pin(3 + bit)
    }

    /// The result output for the given bit.
    pub fn result(&self, bit: u32) -> PinId {
        assert!(bit < self.data.width);
        self.obj.pin(3 + self.data.width + bit)
    }

    /// The shift-distance input for the given bit.
    pub fn distance(&self, bit: u32) -> PinId {
        assert!(bit < self.data.dist_width);
        self.obj.pin(3 + 2 * self.data.width + bit)
    }
}

/// Payload of a magnitude comparator of `width` bits.
///
/// Pinout: 0 Aclr, 1 Clock, 2 AGB, 3 AGEB, 4 AEB, 5 ANEB, 6 ALB, 7 ALEB,
/// DataA\[i\] at `8+i`, DataB\[i\] at `8+W+i`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CompareData {
    width: u32,
}

impl CompareData {
    /// Returns the operand width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }
}

/// Typed pin view of a comparator.
pub struct ComparePins<'a> {
    obj: &'a Obj,
    data: &'a CompareData,
}

impl ComparePins<'_> {
    /// Returns the operand width in bits.
    pub fn width(&self) -> u32 {
        self.data.width
    }

    /// The asynchronous-clear input.
    pub fn aclr(&self) -> PinId {
        self.obj.pin(0)
    }

    /// The clock input (for registered results).
    pub fn clock(&self) -> PinId {
        self.obj.pin(1)
    }

    /// The A-greater-than-B output.
    pub fn agb(&self) -> PinId {
        self.obj.pin(2)
    }

    /// The A-greater-or-equal output.
    pub fn ageb(&self) -> PinId {
        self.obj.pin(3)
    }

    /// The A-equal-B output.
    pub fn aeb(&self) -> PinId {
        self.obj.pin(4)
    }

    /// The A-not-equal-B output.
    pub fn aneb(&self) -> PinId {
        self.obj.pin(5)
    }

    /// The A-less-than-B output.
    pub fn alb(&self) -> PinId {
        self.obj.pin(6)
    }

    /// The A-less-or-equal output.
    pub fn aleb(&self) -> PinId {
        self.obj.pin(7)
    }

    /// The A operand input for the given bit.
    pub fn data_a(&self, bit: u32) -> PinId {
        assert!(bit < self.data.width);
        self.obj.pin(8 + bit)
    }

    /// The B operand input for the given bit.
    pub fn data_b(&self, bit: u32) -> PinId {
        assert!(bit < self.data.width);
        self.obj.pin(8 + self.data.width + bit)
    }
}

/// Payload of a multiplexer: `size` data inputs of `width` bits selected
/// by a `sel_width`-bit select bus.
///
/// Pinout: 0 Aclr, 1 Clock, Result\[i\] at `2+i`, Sel\[i\] at `2+W+i`,
/// Data\[i,j\] at `2+W+Sw+j*W+i`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MuxData {
    width: u32,
    size: u32,
    sel_width: u32,
}

impl MuxData {
    /// Returns the data width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the number of data inputs.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns the select bus width in bits.
    pub fn sel_width(&self) -> u32 {
        self.sel_width
    }
}

/// Typed pin view of a multiplexer.
pub struct MuxPins<'a> {
    obj: &'a Obj,
    data: &'a MuxData,
}

impl MuxPins<'_> {
    /// Returns the data width in bits.
    pub fn width(&self) -> u32 {
        self.data.width
    }

    /// Returns the number of data inputs.
    pub fn size(&self) -> u32 {
        self.data.size
    }

    /// Returns the select bus width in bits.
    pub fn sel_width(&self) -> u32 {
        self.data.sel_width
    }

    /// The asynchronous-clear input.
    pub fn aclr(&self) -> PinId {
        self.obj.pin(0)
    }

    /// The clock input (for registered results).
    pub fn clock(&self) -> PinId {
        self.obj.pin(1)
    }

    /// The result output for the given bit.
    pub fn result(&self, bit: u32) -> PinId {
        assert!(bit < self.data.width);
        self.obj.pin(2 + bit)
    }

    /// The select input for the given bit.
    pub fn sel(&self, bit: u32) -> PinId {
        assert!(bit < self.data.sel_width);
        self.obj.pin(2 + self.data.width + bit)
    }

    /// The data input for bit `bit` of input `input`.
    pub fn data(&self, bit: u32, input: u32) -> PinId {
        assert!(bit < self.data.width);
        assert!(input < self.data.size);
        self.obj
            .pin(2 + self.data.width + self.data.sel_width + input * self.data.width + bit)
    }
}

impl Obj {
    /// Returns the flip-flop pin view, if this object is a flip-flop.
    pub fn as_ff(&self) -> Option<FfPins<'_>> {
        match self.kind() {
            ObjKind::Ff(data) => Some(FfPins { obj: self, data }),
            _ => None,
        }
    }

    /// Returns the adder/subtractor pin view, if applicable.
    pub fn as_add_sub(&self) -> Option<AddSubPins<'_>> {
        match self.kind() {
            ObjKind::AddSub(data) => Some(AddSubPins { obj: self, data }),
            _ => None,
        }
    }

    /// Returns the barrel shifter pin view, if applicable.
    pub fn as_shift(&self) -> Option<ShiftPins<'_>> {
        match self.kind() {
            ObjKind::Shift(data) => Some(ShiftPins { obj: self, data }),
            _ => None,
        }
    }

    /// Returns the comparator pin view, if applicable.
    pub fn as_compare(&self) -> Option<ComparePins<'_>> {
        match self.kind() {
            ObjKind::Compare(data) => Some(ComparePins { obj: self, data }),
            _ => None,
        }
    }

    /// Returns the multiplexer pin view, if applicable.
    pub fn as_mux(&self) -> Option<MuxPins<'_>> {
        match self.kind() {
            ObjKind::Mux(data) => Some(MuxPins { obj: self, data }),
            _ => None,
        }
    }
}

impl Design {
    /// Creates a flip-flop bank of `width` bits.
    pub fn new_ff(&mut self, name: impl Into<String>, width: u32) -> ObjId {
        let id = self.alloc_obj(name.into(), 8 + 2 * width, ObjKind::Ff(FfData { width }));
        for (idx, role) in [
            "Clock", "Enable", "Aload", "Aset", "Aclr", "Sload", "Sset", "Sclr",
        ]
        .iter()
        .enumerate()
        {
            self.set_pin_role(id, idx as u32, PinDir::Input, role, 0);
        }
        for bit in 0..width {
            self.set_pin_role(id, 8 + 2 * bit, PinDir::Input, "Data", bit);
            self.set_pin_role(id, 9 + 2 * bit, PinDir::Output, "Q", bit);
        }
        id
    }

    /// Creates an adder/subtractor of `width` bits.
    pub fn new_add_sub(&mut self, name: impl Into<String>, width: u32) -> ObjId {
        let id = self.alloc_obj(
            name.into(),
            6 + 3 * width,
            ObjKind::AddSub(AddSubData { width }),
        );
        self.set_pin_role(id, 0, PinDir::Input, "Add_Sub", 0);
        self.set_pin_role(id, 1, PinDir::Input, "Aclr", 0);
        self.set_pin_role(id, 2, PinDir::Input, "Clock", 0);
        self.set_pin_role(id, 3, PinDir::Input, "Cin", 0);
        self.set_pin_role(id, 4, PinDir::Output, "Cout", 0);
        self.set_pin_role(id, 5, PinDir::Output, "Overflow", 0);
        for bit in 0..width {
            self.set_pin_role(id, 6 + 3 * bit, PinDir::Input, "DataA", bit);
            self.set_pin_role(id, 7 + 3 * bit, PinDir::Input, "DataB", bit);
            self.set_pin_role(id, 8 + 3 * bit, PinDir::Output, "Result", bit);
        }
        id
    }

    /// Creates a combinational barrel shifter with a `width`-bit data path
    /// and a `dist_width`-bit distance input.
    pub fn new_shift(&mut self, name: impl Into<String>, width: u32, dist_width: u32) -> ObjId {
        let id = self.alloc_obj(
            name.into(),
            3 + 2 * width + dist_width,
            ObjKind::Shift(ShiftData { width, dist_width }),
        );
        self.set_pin_role(id, 0, PinDir::Input, "Direction", 0);
        self.set_pin_role(id, 1, PinDir::Output, "Underflow", 0);
        self.set_pin_role(id, 2, PinDir::Output, "Overflow", 0);
        for bit in 0..width {
            self.set_pin_role(id, 3 + bit, PinDir::Input, "Data", bit);
            self.set_pin_role(id, 3 + width + bit, PinDir::Output, "Result", bit);
        }
        for bit in 0..dist_width {
            self.set_pin_role(id, 3 + 2 * width + bit, PinDir::Input, "Distance", bit);
        }
        id
    }

    /// Creates a magnitude comparator of `width` bits.
    pub fn new_compare(&mut self, name: impl Into<String>, width: u32) -> ObjId {
        let id = self.alloc_obj(
            name.into(),
            8 + 2 * width,
            ObjKind::Compare(CompareData { width }),
        );
        self.set_pin_role(id, 0, PinDir::Input, "Aclr", 0);
        self.set_pin_role(id, 1, PinDir::Input, "Clock", 0);
        for (idx, role) in ["AGB", "AGEB", "AEB", "ANEB", "ALB", "ALEB"]
            .iter()
            .enumerate()
        {
            self.set_pin_role(id, 2 + idx as u32, PinDir::Output, role, 0);
        }
        for bit in 0..width {
            self.set_pin_role(id, 8 + bit, PinDir::Input, "DataA", bit);
            self.set_pin_role(id, 8 + width + bit, PinDir::Input, "DataB", bit);
        }
        id
    }

    /// Creates a multiplexer with `size` inputs of `width` bits and a
    /// `sel_width`-bit select bus.
    pub fn new_mux(
        &mut self,
        name: impl Into<String>,
        width: u32,
        size: u32,
        sel_width: u32,
    ) -> ObjId {
        let id = self.alloc_obj(
            name.into(),
            2 + width + sel_width + width * size,
            ObjKind::Mux(MuxData {
                width,
                size,
                sel_width,
            }),
        );
        self.set_pin_role(id, 0, PinDir::Input, "Aclr", 0);
        self.set_pin_role(id, 1, PinDir::Input, "Clock", 0);
        for bit in 0..width {
            self.set_pin_role(id, 2 + bit, PinDir::Output, "Result", bit);
            for input in 0..size {
                self.set_pin_role(
                    id,
                    2 + width + sel_width + input * width + bit,
                    PinDir::Input,
                    "Data",
                    input * width + bit,
                );
            }
        }
        for bit in 0..sel_width {
            self.set_pin_role(id, 2 + width + bit, PinDir::Input, "Sel", bit);
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ff_pinout() {
        let mut design = Design::new();
        let id = design.new_ff("ff0", 4);
        let obj = design.obj(id);
        assert_eq!(obj.pin_count(), 8 + 2 * 4);
        let ff = obj.as_ff().unwrap();
        assert_eq!(ff.width(), 4);
        assert_eq!(ff.clock(), obj.pin(0));
        assert_eq!(ff.sclr(), obj.pin(7));
        assert_eq!(ff.data(0), obj.pin(8));
        assert_eq!(ff.q(0), obj.pin(9));
        assert_eq!(ff.data(3), obj.pin(14));
        assert_eq!(ff.q(3), obj.pin(15));
        // Directions
        assert_eq!(design.pin(ff.clock()).dir(), PinDir::Input);
        assert_eq!(design.pin(ff.data(2)).dir(), PinDir::Input);
        assert_eq!(design.pin(ff.q(2)).dir(), PinDir::Output);
        assert_eq!(design.pin(ff.q(2)).name(), "Q");
        assert_eq!(design.pin(ff.q(2)).inst(), 2);
    }

    #[test]
    fn add_sub_pinout() {
        let mut design = Design::new();
        let id = design.new_add_sub("add0", 8);
        let obj = design.obj(id);
        assert_eq!(obj.pin_count(), 6 + 3 * 8);
        let add = obj.as_add_sub().unwrap();
        assert_eq!(add.width(), 8);
        assert_eq!(add.add_sub(), obj.pin(0));
        assert_eq!(add.cout(), obj.pin(4));
        assert_eq!(add.data_a(0), obj.pin(6));
        assert_eq!(add.data_b(0), obj.pin(7));
        assert_eq!(add.result(0), obj.pin(8));
        assert_eq!(add.data_a(7), obj.pin(27));
        assert_eq!(design.pin(add.cout()).dir(), PinDir::Output);
        assert_eq!(design.pin(add.overflow()).dir(), PinDir::Output);
        assert_eq!(design.pin(add.data_b(3)).dir(), PinDir::Input);
        assert_eq!(design.pin(add.result(3)).dir(), PinDir::Output);
    }

    #[test]
    fn shift_pinout() {
        let mut design = Design::new();
        let id = design.new_shift("sh0", 8, 3);
        let obj = design.obj(id);
        assert_eq!(obj.pin_count(), 3 + 2 * 8 + 3);
        let sh = obj.as_shift().unwrap();
        assert_eq!(sh.width(), 8);
        assert_eq!(sh.dist_width(), 3);
        assert_eq!(sh.direction(), obj.pin(0));
        assert_eq!(sh.data(0), obj.pin(3));
        assert_eq!(sh.result(0), obj.pin(11));
        assert_eq!(sh.distance(0), obj.pin(19));
        assert_eq!(design.pin(sh.underflow()).dir(), PinDir::Output);
        assert_eq!(design.pin(sh.result(5)).dir(), PinDir::Output);
        assert_eq!(design.pin(sh.distance(2)).dir(), PinDir::Input);
    }

    #[test]
    fn compare_pinout() {
        let mut design = Design::new();
        let id = design.new_compare("cmp0", 4);
        let obj = design.obj(id);
        assert_eq!(obj.pin_count(), 8 + 2 * 4);
        let cmp = obj.as_compare().unwrap();
        assert_eq!(cmp.agb(), obj.pin(2));
        assert_eq!(cmp.aleb(), obj.pin(7));
        assert_eq!(cmp.data_a(0), obj.pin(8));
        assert_eq!(cmp.data_b(0), obj.pin(12));
        assert_eq!(design.pin(cmp.aeb()).dir(), PinDir::Output);
        assert_eq!(design.pin(cmp.data_a(3)).dir(), PinDir::Input);
        assert_eq!(design.pin(cmp.data_b(1)).name(), "DataB");
    }

    #[test]
    fn mux_pinout() {
        let mut design = Design::new();
        // 4-bit wide, 2 inputs, 1 select bit
        let id = design.new_mux("mux0", 4, 2, 1);
        let obj = design.obj(id);
        assert_eq!(obj.pin_count(), 2 + 4 + 1 + 4 * 2);
        let mux = obj.as_mux().unwrap();
        assert_eq!(mux.result(0), obj.pin(2));
        assert_eq!(mux.sel(0), obj.pin(6));
        assert_eq!(mux.data(0, 0), obj.pin(7));
        assert_eq!(mux.data(0, 1), obj.pin(11));
        assert_eq!(mux.data(3, 1), obj.pin(14));
        assert_eq!(design.pin(mux.result(1)).dir(), PinDir::Output);
        assert_eq!(design.pin(mux.data(2, 1)).dir(), PinDir::Input);
        // Data pin instance numbers flatten (input, bit)
        assert_eq!(design.pin(mux.data(2, 1)).inst(), 1 * 4 + 2);
    }

    #[test]
    #[should_panic]
    fn ff_data_out_of_range() {
        let mut design = Design::new();
        let id = design.new_ff("ff0", 2);
        let obj = design.obj(id);
        let _ = obj.as_ff().unwrap().data(2);
    }
}
