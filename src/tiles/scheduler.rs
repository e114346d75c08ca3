//! Decides which tiles should be resident around the camera focus

use super::grid::{TileGrid, TileIndex};
use super::store::TileStore;
use crate::core::geo::{GridPos, Point};

#[derive(Debug, Clone)]
pub struct TileScheduler {
    grid: TileGrid,
    radius: u32,
    /// Cell the neighborhood was last requested for
    last_cell: Option<GridPos>,
}

impl TileScheduler {
    pub fn new(grid: TileGrid, radius: u32) -> Self {
        Self {
            grid,
            radius,
            last_cell: None,
        }
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn last_cell(&self) -> Option<GridPos> {
        self.last_cell
    }

    pub fn focus_cell(&self, focus: &Point) -> GridPos {
        self.grid.world_to_grid(focus)
    }

    /// Candidate tiles for a focus point, row-major
    pub fn neighborhood(&self, focus: &Point) -> Vec<TileIndex> {
        self.grid.tiles_around(self.focus_cell(focus), self.radius)
    }

    /// Request every tile in the neighborhood that is neither loaded nor in
    /// flight. Returns the newly requested indices; the caller starts their
    /// loads. Does nothing while the focus stays in the cell handled last time.
    pub fn update(&mut self, focus: &Point, store: &mut TileStore) -> Vec<TileIndex> {
        let cell = self.focus_cell(focus);
        if self.last_cell == Some(cell) {
            return Vec::new();
        }
        self.last_cell = Some(cell);

        let candidates = self.grid.tiles_around(cell, self.radius);
        let requested = store.request_tiles(candidates.iter().copied());

        log::debug!(
            "focus cell ({}, {}): {} candidates, {} newly requested",
            cell.row,
            cell.col,
            candidates.len(),
            requested.len()
        );
        requested
    }

    /// Force the next `update` to re-evaluate the neighborhood
    pub fn invalidate(&mut self) {
        self.last_cell = None;
    }
}
