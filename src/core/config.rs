//! Configuration for a map session
//!
//! Every section has sensible defaults matching the stock 8x8 terrain map, and
//! the whole tree can be loaded from JSON so hosts can tune thresholds without
//! recompiling.

use crate::core::constants::{
    DEFAULT_FOV, GRID_SIZE, HIGH_RES_REVEAL_FRACTION, LOD_ZOOM_THRESHOLD, PLANE_SIZE,
    TILE_LOAD_RADIUS, TILE_NAME_EXTENSION, TILE_NAME_PREFIX,
};
use crate::{LodError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Side length of the square map plane in world units
    pub plane_size: f64,
    /// Tiles per side of the high-resolution grid
    pub grid_size: u32,
    pub lod: LodConfig,
    pub loading: TileLoadingConfig,
    pub camera: CameraConfig,
}

impl MapConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn tile_size(&self) -> f64 {
        self.plane_size / self.grid_size as f64
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.plane_size.is_finite() && self.plane_size > 0.0) {
            return Err(LodError::Config(format!(
                "plane_size must be positive, got {}",
                self.plane_size
            )));
        }
        // Two-digit tile keys cap the grid at 99 tiles
        if self.grid_size == 0 || self.grid_size > 9 {
            return Err(LodError::Config(format!(
                "grid_size must be between 1 and 9, got {}",
                self.grid_size
            )));
        }
        if !(0.0..=1.0).contains(&self.lod.reveal_fraction) {
            return Err(LodError::Config(format!(
                "reveal_fraction must be within [0, 1], got {}",
                self.lod.reveal_fraction
            )));
        }
        if !(self.camera.default_fov > 0.0 && self.camera.default_fov < 180.0) {
            return Err(LodError::Config(format!(
                "default_fov must be within (0, 180), got {}",
                self.camera.default_fov
            )));
        }
        Ok(())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            plane_size: PLANE_SIZE,
            grid_size: GRID_SIZE,
            lod: LodConfig::default(),
            loading: TileLoadingConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodConfig {
    /// Effective zoom at which the high-resolution grid is shown
    pub zoom_threshold: f64,
    /// Loaded share of the neighborhood needed to hide the fallback
    pub reveal_fraction: f64,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            zoom_threshold: LOD_ZOOM_THRESHOLD,
            reveal_fraction: HIGH_RES_REVEAL_FRACTION,
        }
    }
}

/// What to do with a tile whose resource does not exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// Every failure frees the tile for another request
    #[default]
    Always,
    /// `NotFound` is remembered and the tile is never requested again;
    /// other failures stay retryable
    SkipMissing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLoadingConfig {
    pub load_radius: u32,
    pub retry_policy: RetryPolicy,
    pub naming: TileNaming,
}

impl TileLoadingConfig {
    /// Keeps a 5x5 neighborhood resident
    pub fn eager() -> Self {
        Self {
            load_radius: 2,
            ..Self::default()
        }
    }

    pub fn for_testing() -> Self {
        Self {
            load_radius: 1,
            retry_policy: RetryPolicy::SkipMissing,
            naming: TileNaming::default(),
        }
    }
}

impl Default for TileLoadingConfig {
    fn default() -> Self {
        Self {
            load_radius: TILE_LOAD_RADIUS,
            retry_policy: RetryPolicy::default(),
            naming: TileNaming::default(),
        }
    }
}

/// File naming convention for tile resources: `{prefix}{key}.{extension}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileNaming {
    pub prefix: String,
    pub extension: String,
}

impl TileNaming {
    pub fn file_name(&self, formatted_index: &str) -> String {
        format!("{}{}.{}", self.prefix, formatted_index, self.extension)
    }
}

impl Default for TileNaming {
    fn default() -> Self {
        Self {
            prefix: TILE_NAME_PREFIX.to_string(),
            extension: TILE_NAME_EXTENSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub default_fov: f64,
    /// Stop zoom input from zooming out past the point where the plane covers the viewport
    pub clamp_min_zoom: bool,
    /// Upper bound for zoom input
    pub max_zoom: Option<f64>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            default_fov: DEFAULT_FOV,
            clamp_min_zoom: true,
            max_zoom: None,
        }
    }
}
