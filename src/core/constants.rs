//! Engine-wide defaults for the tile grid, LOD switching and camera math.
//! Keeping them in a single place makes it easier to tweak magic numbers.

/// Tiles per side of the high-resolution grid.
pub const GRID_SIZE: u32 = 8;

/// Total number of high-resolution tiles (`GRID_SIZE²`).
pub const TILE_COUNT: u32 = GRID_SIZE * GRID_SIZE;

/// Side length of the map plane in world units.
pub const PLANE_SIZE: f64 = 100.0;

/// Effective zoom at which the high-resolution grid takes over.
pub const LOD_ZOOM_THRESHOLD: f64 = 35.0;

/// Chebyshev radius (in grid cells) kept resident around the focus tile.
pub const TILE_LOAD_RADIUS: u32 = 1;

/// Fraction of the neighborhood that must be loaded before the
/// low-resolution fallback is hidden.
pub const HIGH_RES_REVEAL_FRACTION: f64 = 0.5;

/// Vertical field of view used when a perspective camera does not say otherwise.
pub const DEFAULT_FOV: f64 = 50.0;

/// Height above the plane of a default-constructed camera.
pub const DEFAULT_CAMERA_HEIGHT: f64 = 10.0;

/// Floor applied to camera distances before dividing by them.
pub const MIN_CAMERA_DISTANCE: f64 = 0.0001;

/// Floor applied to zoom values before dividing by them.
pub const MIN_ZOOM: f64 = 0.0001;

/// Floor applied to viewport dimensions (pixels).
pub const MIN_VIEWPORT_EXTENT: f64 = 1.0;

/// Default file name prefix for high-resolution tiles.
pub const TILE_NAME_PREFIX: &str = "terrain_z2_";

/// Default file extension for high-resolution tiles.
pub const TILE_NAME_EXTENSION: &str = "jpg";
