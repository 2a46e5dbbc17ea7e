//! Opaque generational ids for netlist entities.
//!
//! Each id pairs a slot index with a generation counter and is issued by
//! the [`SlotArena`](crate::arena::SlotArena)s owned by the
//! [`Design`](crate::design::Design).

use crate::arena::SlotKey;
use serde::{Deserialize, Serialize};

macro_rules! define_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name {
            index: u32,
            generation: u32,
        }

        impl $name {
            /// Returns the slot index of this id.
            pub fn index(self) -> u32 {
                self.index
            }

            /// Returns the generation of this id.
            pub fn generation(self) -> u32 {
                self.generation
            }
        }

        impl SlotKey for $name {
            fn new(index: u32, generation: u32) -> Self {
                Self { index, generation }
            }

            fn index(self) -> u32 {
                self.index
            }

            fn generation(self) -> u32 {
                self.generation
            }
        }
    };
}

define_key!(
    /// Id of a [`Pin`](crate::pin::Pin) in the design's pin arena.
    PinId
);

define_key!(
    /// Id of an [`Obj`](crate::obj::Obj) (signal or device node) in the
    /// design's object arena.
    ObjId
);

define_key!(
    /// Id of a [`Memory`](crate::ram::Memory) in the design's memory arena.
    MemoryId
);
