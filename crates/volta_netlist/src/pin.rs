//! Pins: the ring elements that realize electrical connectivity.

use crate::ids::{ObjId, PinId};
use serde::{Deserialize, Serialize};

/// The direction of a pin relative to its owning object.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum PinDir {
    /// Neither drives nor samples the nexus (the default).
    #[default]
    Passive,
    /// Samples the nexus.
    Input,
    /// Drives the nexus.
    Output,
}

/// One endpoint of an object, participating in exactly one nexus ring.
///
/// A pin's owner and index are fixed at object construction. The `prev`
/// and `next` ids realize the circular doubly linked ring; a freshly
/// created pin is a singleton ring pointing at itself. Ring surgery lives
/// on [`Design`](crate::design::Design) (`connect`, `unlink`, and the ring
/// walks in the nexus module).
#[derive(Debug)]
pub struct Pin {
    owner: ObjId,
    index: u32,
    dir: PinDir,
    name: String,
    inst: u32,
    pub(crate) prev: PinId,
    pub(crate) next: PinId,
}

impl Pin {
    /// Creates a singleton-ring pin. `id` must be the key the pin is being
    /// inserted under.
    pub(crate) fn new(id: PinId, owner: ObjId, index: u32) -> Self {
        Self {
            owner,
            index,
            dir: PinDir::Passive,
            name: String::new(),
            inst: 0,
            prev: id,
            next: id,
        }
    }

    /// Returns the object owning this pin.
    pub fn owner(&self) -> ObjId {
        self.owner
    }

    /// Returns the pin's index within its owner.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns the pin direction.
    pub fn dir(&self) -> PinDir {
        self.dir
    }

    /// Sets the pin direction.
    pub fn set_dir(&mut self, dir: PinDir) {
        self.dir = dir;
    }

    /// Returns the role name of this pin (e.g. `"Clock"`, `"Data"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the instance number that distinguishes pins sharing a role
    /// name (e.g. `Data[3]` has name `"Data"` and instance 3).
    pub fn inst(&self) -> u32 {
        self.inst
    }

    /// Sets the role name and instance number.
    pub fn set_name(&mut self, name: impl Into<String>, inst: u32) {
        self.name = name.into();
        self.inst = inst;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::SlotKey;

    #[test]
    fn fresh_pin_is_singleton_ring() {
        let owner = ObjId::new(0, 0);
        let id = PinId::new(5, 0);
        let pin = Pin::new(id, owner, 2);
        assert_eq!(pin.prev, id);
        assert_eq!(pin.next, id);
        assert_eq!(pin.owner(), owner);
        assert_eq!(pin.index(), 2);
        assert_eq!(pin.dir(), PinDir::Passive);
    }

    #[test]
    fn role_name_and_instance() {
        let mut pin = Pin::new(PinId::new(0, 0), ObjId::new(0, 0), 0);
        assert_eq!(pin.name(), "");
        pin.set_name("Data", 3);
        assert_eq!(pin.name(), "Data");
        assert_eq!(pin.inst(), 3);
    }

    #[test]
    fn direction() {
        let mut pin = Pin::new(PinId::new(0, 0), ObjId::new(0, 0), 0);
        pin.set_dir(PinDir::Output);
        assert_eq!(pin.dir(), PinDir::Output);
    }

    #[test]
    fn default_dir_is_passive() {
        assert_eq!(PinDir::default(), PinDir::Passive);
    }
}
