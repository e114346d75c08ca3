//! # lodmap
//!
//! Level-of-detail tile streaming for large pannable, zoomable 2D map surfaces.
//!
//! A low-resolution fallback image covers the whole map while a grid of
//! high-resolution tiles streams in around the camera focus once the zoom
//! passes a threshold. The camera is kept inside the map bounds at every
//! zoom level, and perspective and orthographic cameras share one
//! "effective zoom" so thresholds and pan limits behave identically.
//!
//! The entry point is [`LodMap`], which is ticked once per rendered frame.

pub mod core;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod runtime;
pub mod tiles;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::{PanClamper, PanLimits, ZoomLimits},
    config::MapConfig,
    geo::{GridPos, Point, Point3},
    map::{CameraCorrection, LodMap, RenderDirectives},
    viewport::{CameraState, Projection, Viewport},
};

pub use layers::lod::{LodController, SlotDirective, TileSlot};

pub use input::events::InputEvent;

pub use tiles::{
    grid::{TileGrid, TileIndex},
    loader::{TileLoader, TileResult},
    scheduler::TileScheduler,
    source::{FileTileResolver, InMemoryResolver, TileHandle, TileKey, TileResolver},
    store::{TileStatus, TileStore},
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, LodError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum LodError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid tile index {index} (grid holds 1..={max})")]
    InvalidTileIndex { index: u32, max: u32 },

    #[error("Invalid grid position ({row}, {col}) for a {size}x{size} grid")]
    InvalidGridPosition { row: u32, col: u32, size: u32 },

    #[error("Tile {index}: cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        index: TileIndex,
        from: TileStatus,
        to: TileStatus,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Why a single tile failed to load. Tile failures never escape the session;
/// they leave the tile transparent and keep the fallback visible.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TileError {
    #[error("tile resource not found: {0}")]
    NotFound(String),

    #[error("tile resource could not be decoded: {0}")]
    Decode(String),

    #[error("tile resource could not be read: {0}")]
    Io(String),
}

/// Error type alias for convenience
pub type Error = LodError;

/// Install an `env_logger` backend for the `log` output of this crate.
/// `RUST_LOG` wins over `default_filter`. Calling it twice is harmless.
#[cfg(feature = "debug")]
pub fn init_logging(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env).try_init();
}
