//! Prelude module for common lodmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use lodmap::prelude::*;`

pub use crate::core::{
    bounds::{PanClamper, PanLimits, ZoomLimits},
    config::{CameraConfig, LodConfig, MapConfig, RetryPolicy, TileLoadingConfig, TileNaming},
    geo::{GridPos, Point, Point3},
    map::{CameraCorrection, LodMap, RenderDirectives},
    viewport::{CameraState, Projection, Viewport},
    zoom::{distance_for_zoom, effective_zoom},
};

pub use crate::layers::lod::{LodController, SlotDirective, TileSlot};

pub use crate::input::events::InputEvent;

pub use crate::runtime::{spawn, AsyncSpawner, ManualSpawner, ThreadPoolSpawner};

#[cfg(feature = "tokio-runtime")]
pub use crate::runtime::TokioSpawner;

pub use crate::tiles::{
    grid::{TileGrid, TileIndex},
    loader::{TileLoader, TileResult},
    scheduler::TileScheduler,
    source::{FileTileResolver, InMemoryResolver, TileHandle, TileKey, TileResolver},
    store::{TileStatus, TileStore},
};

pub use crate::{Error as LodMapError, Result, TileError};

pub use instant::Instant;
pub use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

pub use futures::Future;
