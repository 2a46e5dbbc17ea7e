//! Nexus ring surgery and traversal.
//!
//! A nexus (electrical node) is a circular doubly linked ring of pins.
//! `connect` splices whole rings together; the walk helpers answer the
//! connectivity questions synthesis and emission passes ask.

use crate::design::Design;
use crate::ids::{ObjId, PinId};
use crate::pin::PinDir;

impl Design {
    /// Splices the ring containing `l` into the ring containing `r`.
    ///
    /// Walks the `l` ring; each pin is detached and inserted immediately
    /// after `r`. If the walk stumbles on `r` the rings were already one
    /// and the remaining pins are left in place, which makes the operation
    /// idempotent. Connecting a pin to itself is a no-op.
    pub fn connect(&mut self, l: PinId, r: PinId) {
        if l == r {
            return;
        }
        self.debug_check_ring(l);
        self.debug_check_ring(r);

        let mut cur = l;
        loop {
            let tmp = self.pins[cur].next;

            // If I stumble on r in the nexus, then stop now because we
            // are already connected.
            if tmp == r {
                break;
            }

            // Pull cur out of the left ring.
            let (prev, next) = (self.pins[cur].prev, self.pins[cur].next);
            self.pins[prev].next = next;
            self.pins[next].prev = prev;

            // Put cur in the right ring, just after r.
            let after = self.pins[r].next;
            self.pins[cur].next = after;
            self.pins[cur].prev = r;
            self.pins[after].prev = cur;
            self.pins[r].next = cur;

            // Go to the next pin of the left ring.
            cur = tmp;
            if cur == l {
                break;
            }
        }

        self.debug_check_ring(l);
        self.debug_check_ring(r);
    }

    /// Detaches a pin from its ring, leaving it as a singleton ring.
    pub fn unlink(&mut self, pin: PinId) {
        let (prev, next) = (self.pins[pin].prev, self.pins[pin].next);
        self.pins[next].prev = prev;
        self.pins[prev].next = next;
        let p = &mut self.pins[pin];
        p.next = pin;
        p.prev = pin;
    }

    /// Returns `true` if the pin shares its ring with any other pin.
    pub fn is_linked(&self, pin: PinId) -> bool {
        self.pins[pin].next != pin
    }

    /// Returns `true` if any *other* pin of the ring is owned by `obj`.
    pub fn is_linked_to_obj(&self, pin: PinId, obj: ObjId) -> bool {
        let mut cur = self.pins[pin].next;
        while cur != pin {
            if self.pins[cur].owner() == obj {
                return true;
            }
            cur = self.pins[cur].next;
        }
        false
    }

    /// Returns `true` if `that` is another pin of this pin's ring.
    pub fn is_linked_to(&self, pin: PinId, that: PinId) -> bool {
        let mut cur = self.pins[pin].next;
        while cur != pin {
            if cur == that {
                return true;
            }
            cur = self.pins[cur].next;
        }
        false
    }

    /// Returns the next pin of the ring, asserting ring well-formedness.
    pub fn next_link(&self, pin: PinId) -> PinId {
        self.debug_check_ring(pin);
        self.pins[pin].next
    }

    /// Counts the INPUT-direction pins of the ring containing `pin`,
    /// including `pin` itself.
    pub fn count_inputs(&self, pin: PinId) -> u32 {
        self.count_ring(pin, |d| d.dir() == PinDir::Input)
    }

    /// Counts the OUTPUT-direction pins of the ring containing `pin`,
    /// including `pin` itself.
    pub fn count_outputs(&self, pin: PinId) -> u32 {
        self.count_ring(pin, |d| d.dir() == PinDir::Output)
    }

    /// Counts the pins of the ring whose owner is a signal.
    pub fn count_signals(&self, pin: PinId) -> u32 {
        let mut count = 0;
        let mut cur = pin;
        loop {
            if self.objs[self.pins[cur].owner()].is_signal() {
                count += 1;
            }
            cur = self.pins[cur].next;
            if cur == pin {
                break;
            }
        }
        count
    }

    fn count_ring(&self, pin: PinId, pred: impl Fn(&crate::pin::Pin) -> bool) -> u32 {
        let mut count = 0;
        let mut cur = pin;
        loop {
            if pred(&self.pins[cur]) {
                count += 1;
            }
            cur = self.pins[cur].next;
            if cur == pin {
                break;
            }
        }
        count
    }

    /// Finds the first signal pin on the ring of `obj`'s pin `idx`.
    ///
    /// Returns the signal and the bit index of its pin. The walk stops
    /// when it returns to any pin owned by `obj` itself.
    pub fn find_link_signal(&self, obj: ObjId, idx: u32) -> Option<(ObjId, u32)> {
        let start = self.objs[obj].pin(idx);
        let mut cur = self.pins[start].next;
        loop {
            let owner = self.pins[cur].owner();
            if owner == obj {
                return None;
            }
            if self.objs[owner].is_signal() {
                return Some((owner, self.pins[cur].index()));
            }
            cur = self.pins[cur].next;
        }
    }

    /// Finds the next OUTPUT-direction pin after `pin` on its ring.
    pub fn find_next_output(&self, pin: PinId) -> Option<PinId> {
        let mut cur = self.next_link(pin);
        while cur != pin {
            if self.pins[cur].dir() == PinDir::Output {
                return Some(cur);
            }
            cur = self.next_link(cur);
        }
        None
    }

    /// Returns `true` if every pin of `l` is nexus-linked to `r`:
    /// bitwise-parallel connectivity between two equal-width objects.
    pub fn connected(&self, l: ObjId, r: ObjId) -> bool {
        let count = self.objs[l].pin_count();
        (0..count).all(|idx| self.is_linked_to_obj(self.objs[l].pin(idx), r))
    }

    fn debug_check_ring(&self, pin: PinId) {
        debug_assert_eq!(self.pins[self.pins[pin].next].prev, pin);
        debug_assert_eq!(self.pins[self.pins[pin].prev].next, pin);
    }
}
