use crossbeam_channel::{unbounded, Receiver, Sender};

use super::grid::TileIndex;
use super::source::{TileHandle, TileKey, TileResolver};
use crate::core::config::TileNaming;
use crate::prelude::{Arc, Duration, Instant};
use crate::runtime::AsyncSpawner;
use crate::TileError;

/// Result of a tile loading operation
#[derive(Debug)]
pub struct TileResult {
    pub index: TileIndex,
    /// Session generation the load was started in
    pub generation: u64,
    pub result: std::result::Result<TileHandle, TileError>,
    pub elapsed: Duration,
}

/// Fire-and-forget tile loader.
///
/// Each load runs as its own task on the spawner and reports back over an
/// unbounded channel. Nothing here touches tile state: the owner drains
/// [`TileLoader::try_recv_results`] on the frame thread and applies the
/// transitions itself.
pub struct TileLoader {
    resolver: Arc<dyn TileResolver>,
    spawner: Arc<dyn AsyncSpawner>,
    naming: TileNaming,
    result_tx: Sender<TileResult>,
    result_rx: Receiver<TileResult>,
    generation: u64,
}

impl TileLoader {
    pub fn new(
        resolver: Arc<dyn TileResolver>,
        spawner: Arc<dyn AsyncSpawner>,
        naming: TileNaming,
    ) -> Self {
        let (result_tx, result_rx) = unbounded();

        Self {
            resolver,
            spawner,
            naming,
            result_tx,
            result_rx,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start resolving a tile. Returns immediately; the result arrives later
    /// through [`TileLoader::try_recv_results`].
    pub fn start(&self, index: TileIndex) {
        let key = TileKey::new(index, &self.naming);
        let resolver = Arc::clone(&self.resolver);
        let result_tx = self.result_tx.clone();
        let generation = self.generation;

        log::debug!("queueing load for tile {} ({})", index, key.name);

        self.spawner.spawn_boxed(Box::pin(async move {
            let started = Instant::now();
            let result = resolver.resolve(&key).await;
            let elapsed = started.elapsed();

            match &result {
                Ok(handle) => log::info!(
                    "loaded tile {} ({} bytes) in {:?}",
                    key.formatted,
                    handle.byte_len(),
                    elapsed
                ),
                Err(e) => log::warn!("failed to load tile {}: {}", key.formatted, e),
            }

            // The receiver only disappears with the loader itself
            let _ = result_tx.send(TileResult {
                index: key.index,
                generation,
                result,
                elapsed,
            });
        }));
    }

    /// Drain completed loads without blocking. Results from an earlier
    /// generation are discarded.
    pub fn try_recv_results(&self) -> Vec<TileResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.result_rx.try_recv() {
            if result.generation != self.generation {
                log::debug!(
                    "dropping tile {} from stale generation {}",
                    result.index,
                    result.generation
                );
                continue;
            }
            results.push(result);
        }
        results
    }

    /// Start a new generation. Loads still in flight will be ignored when
    /// they complete.
    pub fn advance_generation(&mut self) {
        while self.result_rx.try_recv().is_ok() {}
        self.generation += 1;
    }
}

impl std::fmt::Debug for TileLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileLoader")
            .field("naming", &self.naming)
            .field("generation", &self.generation)
            .field("completed", &self.result_rx.len())
            .finish()
    }
}
