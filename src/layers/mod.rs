pub mod lod;

pub use lod::{LodController, LodVisibility, SlotDirective, TileSlot};
