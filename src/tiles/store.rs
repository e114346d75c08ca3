//! Per-session tile state
//!
//! Each tile index moves through `NotRequested -> Requested -> Loading ->
//! Loaded`. A failed load drops the tile out of the requested set again so a
//! later frame can retry it; `Error` is reported for diagnostics but never
//! blocks a new request (unless the retry policy marks the tile missing).

use super::grid::TileIndex;
use super::source::TileHandle;
use crate::core::config::RetryPolicy;
use crate::prelude::{HashMap, HashSet};
use crate::{LodError, Result, TileError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileStatus {
    NotRequested,
    Requested,
    Loading,
    Loaded,
    Error,
}

#[derive(Debug)]
pub struct TileStore {
    tile_count: u32,
    retry_policy: RetryPolicy,
    /// Every index handed out by `request_tiles`, including loading and loaded ones
    requested: HashSet<TileIndex>,
    loading: HashSet<TileIndex>,
    loaded: HashMap<TileIndex, TileHandle>,
    /// Last failure per index, cleared when the tile is requested again
    errors: HashMap<TileIndex, TileError>,
    /// Tiles that will never be requested again
    missing: HashSet<TileIndex>,
}

impl TileStore {
    pub fn new(tile_count: u32, retry_policy: RetryPolicy) -> Self {
        Self {
            tile_count,
            retry_policy,
            requested: HashSet::default(),
            loading: HashSet::default(),
            loaded: HashMap::default(),
            errors: HashMap::default(),
            missing: HashSet::default(),
        }
    }

    pub fn tile_count(&self) -> u32 {
        self.tile_count
    }

    fn in_range(&self, index: TileIndex) -> bool {
        (1..=self.tile_count).contains(&index.get())
    }

    /// Mark every index that is not already requested as requested and return
    /// those, in input order. Duplicates and out-of-range indices are skipped.
    pub fn request_tiles<I>(&mut self, indices: I) -> Vec<TileIndex>
    where
        I: IntoIterator<Item = TileIndex>,
    {
        let mut newly_requested = Vec::new();

        for index in indices {
            if !self.in_range(index) {
                log::debug!("ignoring request for out-of-range tile {}", index.get());
                continue;
            }
            if self.missing.contains(&index) {
                continue;
            }
            if !self.requested.insert(index) {
                continue;
            }
            self.errors.remove(&index);
            newly_requested.push(index);
        }

        newly_requested
    }

    /// `Requested -> Loading`
    pub fn mark_loading(&mut self, index: TileIndex) -> Result<()> {
        let from = self.status(index);
        if from != TileStatus::Requested {
            return Err(LodError::InvalidTransition {
                index,
                from,
                to: TileStatus::Loading,
            });
        }
        self.loading.insert(index);
        Ok(())
    }

    /// `Loading -> Loaded`, taking ownership of the handle
    pub fn mark_loaded(&mut self, index: TileIndex, handle: TileHandle) -> Result<()> {
        if !self.loading.remove(&index) {
            return Err(LodError::InvalidTransition {
                index,
                from: self.status(index),
                to: TileStatus::Loaded,
            });
        }
        self.loaded.insert(index, handle);
        Ok(())
    }

    /// `Loading -> Error`. The tile leaves the requested set so it can be retried.
    pub fn mark_error(&mut self, index: TileIndex, error: TileError) -> Result<()> {
        if !self.loading.remove(&index) {
            return Err(LodError::InvalidTransition {
                index,
                from: self.status(index),
                to: TileStatus::Error,
            });
        }
        self.requested.remove(&index);

        if self.retry_policy == RetryPolicy::SkipMissing && matches!(error, TileError::NotFound(_)) {
            self.missing.insert(index);
        }
        self.errors.insert(index, error);
        Ok(())
    }

    pub fn status(&self, index: TileIndex) -> TileStatus {
        if self.loaded.contains_key(&index) {
            TileStatus::Loaded
        } else if self.loading.contains(&index) {
            TileStatus::Loading
        } else if self.requested.contains(&index) {
            TileStatus::Requested
        } else if self.errors.contains_key(&index) {
            TileStatus::Error
        } else {
            TileStatus::NotRequested
        }
    }

    pub fn is_loaded(&self, index: TileIndex) -> bool {
        self.loaded.contains_key(&index)
    }

    pub fn is_loading(&self, index: TileIndex) -> bool {
        self.loading.contains(&index)
    }

    pub fn is_requested(&self, index: TileIndex) -> bool {
        self.requested.contains(&index)
    }

    /// Whether the tile was given up on under [`RetryPolicy::SkipMissing`]
    pub fn is_missing(&self, index: TileIndex) -> bool {
        self.missing.contains(&index)
    }

    pub fn get_handle(&self, index: TileIndex) -> Option<&TileHandle> {
        self.loaded.get(&index)
    }

    pub fn last_error(&self, index: TileIndex) -> Option<&TileError> {
        self.errors.get(&index)
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    pub fn loading_count(&self) -> usize {
        self.loading.len()
    }

    /// Drop every record and handle
    pub fn reset(&mut self) {
        self.requested.clear();
        self.loading.clear();
        self.loaded.clear();
        self.errors.clear();
        self.missing.clear();
    }
}
