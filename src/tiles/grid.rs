//! Grid coordinate mapping
//!
//! Tiles are numbered `1..=size²` row by row from the top-left corner. The
//! plane is centered on the world origin with world Y pointing up, so grid
//! row 0 sits at the top (largest Y).

use crate::core::geo::{GridPos, Point};
use crate::{LodError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based linear tile index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileIndex(pub u32);

impl TileIndex {
    pub fn get(&self) -> u32 {
        self.0
    }

    /// Zero-padded two-digit key used in resource names (`01`..`64`)
    pub fn format(&self) -> String {
        format!("{:02}", self.0)
    }
}

impl fmt::Display for TileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl From<u32> for TileIndex {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

/// An `size x size` partition of a square plane of side `plane_size`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    pub size: u32,
    pub plane_size: f64,
}

impl TileGrid {
    pub fn new(size: u32, plane_size: f64) -> Self {
        Self { size, plane_size }
    }

    pub fn tile_count(&self) -> u32 {
        self.size * self.size
    }

    pub fn tile_size(&self) -> f64 {
        self.plane_size / self.size as f64
    }

    pub fn contains_index(&self, index: TileIndex) -> bool {
        (1..=self.tile_count()).contains(&index.0)
    }

    pub fn contains_pos(&self, pos: GridPos) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// All indices in row-major order
    pub fn indices(&self) -> impl Iterator<Item = TileIndex> {
        (1..=self.tile_count()).map(TileIndex)
    }

    pub fn tile_index_to_grid(&self, index: TileIndex) -> Result<GridPos> {
        if !self.contains_index(index) {
            return Err(LodError::InvalidTileIndex {
                index: index.0,
                max: self.tile_count(),
            });
        }
        let zero_based = index.0 - 1;
        Ok(GridPos::new(zero_based / self.size, zero_based % self.size))
    }

    pub fn grid_to_tile_index(&self, pos: GridPos) -> Result<TileIndex> {
        if !self.contains_pos(pos) {
            return Err(LodError::InvalidGridPosition {
                row: pos.row,
                col: pos.col,
                size: self.size,
            });
        }
        Ok(TileIndex(pos.row * self.size + pos.col + 1))
    }

    /// World-space center of a tile
    pub fn tile_world_position(&self, pos: GridPos) -> Point {
        let tile_size = self.tile_size();
        let half_plane = self.plane_size / 2.0;
        let half_tile = tile_size / 2.0;

        Point::new(
            -half_plane + pos.col as f64 * tile_size + half_tile,
            half_plane - pos.row as f64 * tile_size - half_tile,
        )
    }

    /// World-space bounds of a tile as (min corner, max corner)
    pub fn tile_bounds(&self, pos: GridPos) -> (Point, Point) {
        let center = self.tile_world_position(pos);
        let half_tile = self.tile_size() / 2.0;
        (
            Point::new(center.x - half_tile, center.y - half_tile),
            Point::new(center.x + half_tile, center.y + half_tile),
        )
    }

    /// Cell under a world point. Points off the plane land on the nearest edge cell.
    pub fn world_to_grid(&self, world: &Point) -> GridPos {
        let tile_size = self.tile_size();
        let half_plane = self.plane_size / 2.0;
        let max_cell = self.size.saturating_sub(1) as f64;

        let col = ((world.x + half_plane) / tile_size).floor();
        let row = ((half_plane - world.y) / tile_size).floor();

        // NaN clamps to 0 through the float -> int cast
        GridPos::new(
            row.clamp(0.0, max_cell) as u32,
            col.clamp(0.0, max_cell) as u32,
        )
    }

    /// Cells within Chebyshev `radius` of `center`, clipped to the grid, row-major
    pub fn tiles_around(&self, center: GridPos, radius: u32) -> Vec<TileIndex> {
        if !self.contains_pos(center) {
            return Vec::new();
        }
        let last = self.size.saturating_sub(1);
        let row_start = center.row.saturating_sub(radius);
        let row_end = center.row.saturating_add(radius).min(last);
        let col_start = center.col.saturating_sub(radius);
        let col_end = center.col.saturating_add(radius).min(last);

        let mut tiles =
            Vec::with_capacity(((row_end - row_start + 1) * (col_end - col_start + 1)) as usize);
        for row in row_start..=row_end {
            for col in col_start..=col_end {
                tiles.push(TileIndex(row * self.size + col + 1));
            }
        }
        tiles
    }
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::new(crate::core::constants::GRID_SIZE, crate::core::constants::PLANE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        let grid = TileGrid::default();
        for index in grid.indices() {
            let pos = grid.tile_index_to_grid(index).unwrap();
            assert_eq!(grid.grid_to_tile_index(pos).unwrap(), index);
        }
        assert_eq!(grid.indices().count(), 64);
    }

    #[test]
    fn test_row_major_from_top_left() {
        let grid = TileGrid::default();
        assert_eq!(grid.tile_index_to_grid(TileIndex(1)).unwrap(), GridPos::new(0, 0));
        assert_eq!(grid.tile_index_to_grid(TileIndex(8)).unwrap(), GridPos::new(0, 7));
        assert_eq!(grid.tile_index_to_grid(TileIndex(9)).unwrap(), GridPos::new(1, 0));
        assert_eq!(grid.tile_index_to_grid(TileIndex(64)).unwrap(), GridPos::new(7, 7));
    }

    #[test]
    fn test_out_of_range_index() {
        let grid = TileGrid::default();
        assert!(matches!(
            grid.tile_index_to_grid(TileIndex(0)),
            Err(LodError::InvalidTileIndex { index: 0, max: 64 })
        ));
        assert!(grid.tile_index_to_grid(TileIndex(65)).is_err());
        assert!(matches!(
            grid.grid_to_tile_index(GridPos::new(8, 0)),
            Err(LodError::InvalidGridPosition { .. })
        ));
    }

    #[test]
    fn test_world_position_of_first_tile() {
        let grid = TileGrid::new(8, 100.0);
        assert_eq!(grid.tile_size(), 12.5);

        let center = grid.tile_world_position(GridPos::new(0, 0));
        assert!((center.x + 43.75).abs() < 1e-12);
        assert!((center.y - 43.75).abs() < 1e-12);

        let last = grid.tile_world_position(GridPos::new(7, 7));
        assert!((last.x - 43.75).abs() < 1e-12);
        assert!((last.y + 43.75).abs() < 1e-12);
    }

    #[test]
    fn test_world_round_trip() {
        for plane_size in [1.0, 100.0, 333.3, 4096.0] {
            let grid = TileGrid::new(8, plane_size);
            for row in 0..8 {
                for col in 0..8 {
                    let pos = GridPos::new(row, col);
                    let world = grid.tile_world_position(pos);
                    assert_eq!(grid.world_to_grid(&world), pos);
                }
            }
        }
    }

    #[test]
    fn test_world_to_grid_clamps_off_map() {
        let grid = TileGrid::default();
        assert_eq!(grid.world_to_grid(&Point::new(-500.0, 500.0)), GridPos::new(0, 0));
        assert_eq!(grid.world_to_grid(&Point::new(500.0, -500.0)), GridPos::new(7, 7));
        assert_eq!(grid.world_to_grid(&Point::new(0.0, 1000.0)), GridPos::new(0, 4));
        // The exact far edge belongs to the last cell
        assert_eq!(grid.world_to_grid(&Point::new(50.0, -50.0)), GridPos::new(7, 7));
    }

    #[test]
    fn test_tile_bounds() {
        let grid = TileGrid::default();
        let (min, max) = grid.tile_bounds(GridPos::new(0, 0));
        assert_eq!(min, Point::new(-50.0, 37.5));
        assert_eq!(max, Point::new(-37.5, 50.0));
    }

    #[test]
    fn test_format_index() {
        assert_eq!(TileIndex(1).format(), "01");
        assert_eq!(TileIndex(10).format(), "10");
        assert_eq!(TileIndex(64).format(), "64");
        assert_eq!(TileIndex(7).to_string(), "07");
    }

    #[test]
    fn test_tiles_around_center_and_corner() {
        let grid = TileGrid::default();

        let center = grid.tiles_around(GridPos::new(3, 3), 1);
        let expected: Vec<TileIndex> = [19, 20, 21, 27, 28, 29, 35, 36, 37]
            .into_iter()
            .map(TileIndex)
            .collect();
        assert_eq!(center, expected);

        let corner = grid.tiles_around(GridPos::new(0, 0), 1);
        let expected: Vec<TileIndex> = [1, 2, 9, 10].into_iter().map(TileIndex).collect();
        assert_eq!(corner, expected);

        assert_eq!(grid.tiles_around(GridPos::new(4, 4), 2).len(), 25);
        assert_eq!(grid.tiles_around(GridPos::new(4, 4), 0), vec![TileIndex(37)]);
        assert_eq!(grid.tiles_around(GridPos::new(7, 7), 100).len(), 64);
    }
}
