//! # wayfind_structures - Containers for Navigation Graphs
//!
//! - BitSet: dense membership over vertex indices (seen-sets)
//! - SlotMap: generational storage handing out stable obstacle keys

pub mod slot_map;
pub mod bitset;

pub use slot_map::{SlotMap, SlotKey};
pub use bitset::BitSet;

pub mod prelude {
    pub use crate::slot_map::{SlotMap, SlotKey};
    pub use crate::bitset::BitSet;
}
