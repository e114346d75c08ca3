//! Low-res / high-res visibility and the per-tile slot arena
//!
//! Below the zoom threshold only the fallback image is drawn. At or above it
//! the tile grid is drawn and the fallback stays underneath until enough of
//! the focus neighborhood has arrived, so the surface never flashes empty.

use crate::core::config::LodConfig;
use crate::tiles::grid::TileIndex;
use crate::tiles::source::TileHandle;
use crate::tiles::store::TileStore;
use serde::{Deserialize, Serialize};

/// One high-res tile slot. Slots exist for the whole session; a slot without
/// a handle renders fully transparent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileSlot {
    pub handle: Option<TileHandle>,
    pub opacity: f32,
}

impl TileSlot {
    pub fn is_filled(&self) -> bool {
        self.handle.is_some()
    }
}

/// Per-frame drawing instruction for one slot
#[derive(Debug, Clone, PartialEq)]
pub struct SlotDirective {
    pub index: TileIndex,
    pub opacity: f32,
    pub handle: Option<TileHandle>,
}

/// Layer visibility for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LodVisibility {
    pub low_res_visible: bool,
    pub high_res_visible: bool,
}

#[derive(Debug, Clone)]
pub struct LodController {
    threshold: f64,
    reveal_fraction: f64,
    /// Slot `i` belongs to tile index `i + 1`
    slots: Box<[TileSlot]>,
}

impl LodController {
    pub fn new(tile_count: u32, config: &LodConfig) -> Self {
        Self {
            threshold: config.zoom_threshold,
            reveal_fraction: config.reveal_fraction,
            slots: vec![TileSlot::default(); tile_count as usize].into_boxed_slice(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether the tile grid is drawn (and scheduled) at this zoom
    pub fn high_res_active(&self, effective_zoom: f64) -> bool {
        effective_zoom >= self.threshold
    }

    /// Loaded share of `neighborhood`, 0.0 for an empty one
    pub fn loaded_fraction(&self, neighborhood: &[TileIndex], store: &TileStore) -> f64 {
        if neighborhood.is_empty() {
            return 0.0;
        }
        let loaded = neighborhood
            .iter()
            .filter(|index| store.is_loaded(**index))
            .count();
        loaded as f64 / neighborhood.len() as f64
    }

    pub fn visibility(&self, effective_zoom: f64, loaded_fraction: f64) -> LodVisibility {
        if !self.high_res_active(effective_zoom) {
            return LodVisibility {
                low_res_visible: true,
                high_res_visible: false,
            };
        }
        LodVisibility {
            low_res_visible: loaded_fraction < self.reveal_fraction,
            high_res_visible: true,
        }
    }

    fn slot_mut(&mut self, index: TileIndex) -> Option<&mut TileSlot> {
        let position = (index.get() as usize).checked_sub(1)?;
        self.slots.get_mut(position)
    }

    pub fn slot(&self, index: TileIndex) -> Option<&TileSlot> {
        let position = (index.get() as usize).checked_sub(1)?;
        self.slots.get(position)
    }

    /// Make a loaded tile opaque
    pub fn on_loaded(&mut self, index: TileIndex, handle: TileHandle) {
        if let Some(slot) = self.slot_mut(index) {
            slot.handle = Some(handle);
            slot.opacity = 1.0;
        }
    }

    /// Keep a failed tile transparent
    pub fn on_error(&mut self, index: TileIndex) {
        if let Some(slot) = self.slot_mut(index) {
            slot.handle = None;
            slot.opacity = 0.0;
        }
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_filled()).count()
    }

    /// Instructions for every slot, in index order
    pub fn directives(&self) -> Vec<SlotDirective> {
        self.slots
            .iter()
            .enumerate()
            .map(|(position, slot)| SlotDirective {
                index: TileIndex(position as u32 + 1),
                opacity: slot.opacity,
                handle: slot.handle.clone(),
            })
            .collect()
    }

    /// Empty every slot
    pub fn reset(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = TileSlot::default();
        }
    }
}
