use crate::{
    core::{
        bounds::{PanClamper, ZoomLimits},
        config::MapConfig,
        constants::MIN_ZOOM,
        geo::{Point, Point3},
        viewport::{CameraState, Viewport},
        zoom,
    },
    input::{EventHandled, InputEvent},
    layers::lod::{LodController, SlotDirective},
    prelude::Arc,
    runtime::AsyncSpawner,
    tiles::{
        grid::TileGrid, loader::TileLoader, scheduler::TileScheduler, source::TileResolver,
        store::TileStore,
    },
    Result,
};

/// Camera values after the session moved the camera this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraCorrection {
    pub position: Point3,
    pub target: Point,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct RenderDirectives {
    pub effective_zoom: f64,
    pub low_res_visible: bool,
    pub high_res_visible: bool,
    /// Loaded share of the focus neighborhood
    pub loaded_fraction: f64,
    pub camera_correction: Option<CameraCorrection>,
    /// One entry per grid slot, in index order
    pub slots: Vec<SlotDirective>,
}

/// A map session: tile state, streaming and camera constraints for one
/// surface. Drive it with [`LodMap::tick`] once per rendered frame.
pub struct LodMap {
    config: MapConfig,
    store: TileStore,
    scheduler: TileScheduler,
    loader: TileLoader,
    lod: LodController,
    clamper: PanClamper,
    frame_count: u64,
}

impl LodMap {
    pub fn new(
        config: MapConfig,
        resolver: Arc<dyn TileResolver>,
        spawner: Arc<dyn AsyncSpawner>,
    ) -> Result<Self> {
        config.validate()?;

        let grid = TileGrid::new(config.grid_size, config.plane_size);
        let store = TileStore::new(grid.tile_count(), config.loading.retry_policy);
        let scheduler = TileScheduler::new(grid, config.loading.load_radius);
        let loader = TileLoader::new(resolver, spawner, config.loading.naming.clone());
        let lod = LodController::new(grid.tile_count(), &config.lod);
        let clamper = PanClamper::square(config.plane_size);

        log::info!(
            "map session: {}x{} grid over a {} unit plane, high-res from zoom {}",
            config.grid_size,
            config.grid_size,
            config.plane_size,
            config.lod.zoom_threshold
        );

        Ok(Self {
            config,
            store,
            scheduler,
            loader,
            lod,
            clamper,
            frame_count: 0,
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn grid(&self) -> &TileGrid {
        self.scheduler.grid()
    }

    pub fn store(&self) -> &TileStore {
        &self.store
    }

    pub fn lod(&self) -> &LodController {
        &self.lod
    }

    pub fn generation(&self) -> u64 {
        self.loader.generation()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Loads started but not yet applied
    pub fn pending_loads(&self) -> usize {
        self.store.loading_count()
    }

    /// Zoom range for a viewport. Without `clamp_min_zoom` only the epsilon
    /// floor and the optional maximum apply.
    pub fn zoom_limits(&self, viewport: &Viewport) -> ZoomLimits {
        let camera = &self.config.camera;
        if camera.clamp_min_zoom {
            ZoomLimits::for_plane(
                self.config.plane_size,
                self.config.plane_size,
                viewport,
                camera.max_zoom,
            )
        } else {
            ZoomLimits {
                min_zoom: MIN_ZOOM,
                max_zoom: camera.max_zoom.map(|max| max.max(MIN_ZOOM)),
            }
        }
    }

    /// Perspective camera over the plane center, zoomed out as far as allowed
    pub fn default_camera(&self, viewport: &Viewport) -> CameraState {
        let fov = self.config.camera.default_fov;
        let min_zoom = self.zoom_limits(viewport).min_zoom;
        let distance = zoom::distance_for_zoom(min_zoom, fov, viewport.height);
        CameraState::perspective(Point::default(), distance, fov)
    }

    /// Advance one frame.
    ///
    /// Applies completed loads, pulls the pan target back inside the pan
    /// limits, schedules tiles around the target when the high-res grid is
    /// active and reports what to draw. Zoom limits apply to zoom input only.
    pub fn tick(&mut self, camera: &mut CameraState, viewport: Viewport) -> RenderDirectives {
        self.frame_count += 1;
        self.apply_completions();

        // Only the pan is corrected here; the host owns the zoom
        let camera_correction = self.clamper.enforce(camera, &viewport).map(|delta| {
            log::debug!("pan target out of bounds, moved by ({}, {})", delta.x, delta.y);
            CameraCorrection {
                position: camera.position,
                target: camera.target,
            }
        });

        let effective_zoom = camera.effective_zoom(&viewport);

        if self.lod.high_res_active(effective_zoom) {
            self.schedule(&camera.target);
        }

        let neighborhood = self.scheduler.neighborhood(&camera.target);
        let loaded_fraction = self.lod.loaded_fraction(&neighborhood, &self.store);
        let visibility = self.lod.visibility(effective_zoom, loaded_fraction);

        RenderDirectives {
            effective_zoom,
            low_res_visible: visibility.low_res_visible,
            high_res_visible: visibility.high_res_visible,
            loaded_fraction,
            camera_correction,
            slots: self.lod.directives(),
        }
    }

    /// Apply a pan or zoom interaction to the camera
    pub fn handle_input(
        &mut self,
        camera: &mut CameraState,
        event: InputEvent,
        viewport: Viewport,
    ) -> EventHandled {
        if !event.is_valid() {
            log::debug!("ignoring invalid input {:?}", event);
            return EventHandled::NotHandled;
        }

        match event {
            InputEvent::Pan { delta } => {
                camera.translate(&delta);
            }
            InputEvent::ZoomTo { zoom } => {
                self.apply_zoom(camera, zoom, &viewport);
            }
            InputEvent::ZoomBy { factor } => {
                let zoom = camera.effective_zoom(&viewport) * factor;
                self.apply_zoom(camera, zoom, &viewport);
            }
        }

        self.clamper.clamp_pan(camera, &viewport);
        EventHandled::Handled
    }

    /// Forget every tile. Loads still in flight are ignored when they land.
    pub fn reset(&mut self) {
        log::info!(
            "resetting map session ({} tiles loaded, {} in flight)",
            self.store.loaded_count(),
            self.store.loading_count()
        );
        self.store.reset();
        self.lod.reset();
        self.scheduler.invalidate();
        self.loader.advance_generation();
    }

    fn apply_zoom(&self, camera: &mut CameraState, zoom: f64, viewport: &Viewport) {
        let clamped = self.zoom_limits(viewport).clamp(zoom);
        camera.set_effective_zoom(clamped, viewport);
    }

    fn schedule(&mut self, focus: &Point) {
        for index in self.scheduler.update(focus, &mut self.store) {
            match self.store.mark_loading(index) {
                Ok(()) => self.loader.start(index),
                Err(e) => log::warn!("not starting load: {}", e),
            }
        }
    }

    fn apply_completions(&mut self) {
        for completed in self.loader.try_recv_results() {
            let index = completed.index;
            match completed.result {
                Ok(handle) => match self.store.mark_loaded(index, handle.clone()) {
                    Ok(()) => self.lod.on_loaded(index, handle),
                    Err(e) => log::debug!("ignoring completion: {}", e),
                },
                Err(error) => match self.store.mark_error(index, error) {
                    Ok(()) => {
                        self.lod.on_error(index);
                        // Let the next frame request the tile again if it is still wanted
                        self.scheduler.invalidate();
                    }
                    Err(e) => log::debug!("ignoring failure: {}", e),
                },
            }
        }
    }
}

impl std::fmt::Debug for LodMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LodMap")
            .field("config", &self.config)
            .field("loaded", &self.store.loaded_count())
            .field("loading", &self.store.loading_count())
            .field("generation", &self.loader.generation())
            .field("frame_count", &self.frame_count)
            .finish()
    }
}

impl Drop for LodMap {
    fn drop(&mut self) {
        log::debug!(
            "dropping map session, releasing {} tile handles",
            self.store.loaded_count()
        );
        self.store.reset();
        self.lod.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::viewport::Projection;
    use crate::runtime::ManualSpawner;
    use crate::tiles::grid::TileIndex;
    use crate::tiles::source::InMemoryResolver;
    use crate::tiles::store::TileStatus;

    fn full_resolver() -> InMemoryResolver {
        let mut resolver = InMemoryResolver::new();
        for i in 1..=64u32 {
            resolver.insert(TileIndex(i).format(), vec![i as u8]);
        }
        resolver
    }

    fn session(resolver: InMemoryResolver) -> (LodMap, Arc<ManualSpawner>) {
        let spawner = Arc::new(ManualSpawner::new());
        let map = LodMap::new(MapConfig::default(), Arc::new(resolver), spawner.clone()).unwrap();
        (map, spawner)
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = MapConfig {
            grid_size: 0,
            ..MapConfig::default()
        };
        let result = LodMap::new(
            config,
            Arc::new(InMemoryResolver::new()),
            Arc::new(ManualSpawner::new()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_tiles_stream_in_and_hide_fallback() {
        let (mut map, spawner) = session(full_resolver());
        let mut camera = CameraState::orthographic(Point::new(-6.25, 6.25), 10.0, 40.0);

        let first = map.tick(&mut camera, viewport());
        assert!(first.high_res_visible);
        assert!(first.low_res_visible);
        assert_eq!(first.loaded_fraction, 0.0);
        assert_eq!(map.pending_loads(), 9);
        assert_eq!(spawner.pending(), 9);

        spawner.run_pending();
        let second = map.tick(&mut camera, viewport());
        assert_eq!(second.loaded_fraction, 1.0);
        assert!(!second.low_res_visible);
        assert_eq!(second.slots[27].opacity, 1.0);
        assert!(second.slots[27].handle.is_some());
        assert_eq!(map.store().status(TileIndex(28)), TileStatus::Loaded);
    }

    #[test]
    fn test_pan_input_is_clamped() {
        let (mut map, _spawner) = session(full_resolver());
        let mut camera = CameraState::orthographic(Point::default(), 10.0, 20.0);

        let handled = map.handle_input(&mut camera, InputEvent::pan(500.0, 0.0), viewport());
        assert!(handled.is_handled());
        // 800 / 20 / 2 = 20 -> max_pan_x = 30
        assert!((camera.target.x - 30.0).abs() < 1e-9);
        assert_eq!(camera.position.xy(), camera.target);
    }

    #[test]
    fn test_zoom_input_respects_min_zoom() {
        let (mut map, _spawner) = session(full_resolver());
        let mut camera = CameraState::orthographic(Point::default(), 10.0, 20.0);

        map.handle_input(&mut camera, InputEvent::ZoomTo { zoom: 1.0 }, viewport());
        // max(800 / 100, 600 / 100)
        assert_eq!(camera.effective_zoom(&viewport()), 8.0);

        map.handle_input(&mut camera, InputEvent::ZoomBy { factor: 5.0 }, viewport());
        assert_eq!(camera.effective_zoom(&viewport()), 40.0);

        let handled = map.handle_input(&mut camera, InputEvent::ZoomBy { factor: 0.0 }, viewport());
        assert_eq!(handled, EventHandled::NotHandled);
        assert_eq!(camera.effective_zoom(&viewport()), 40.0);
    }

    #[test]
    fn test_tick_keeps_zoom_after_resize() {
        let (mut map, _spawner) = session(full_resolver());
        let mut camera = CameraState::orthographic(Point::new(5.0, 5.0), 10.0, 10.0);

        let directives = map.tick(&mut camera, viewport());
        assert!(directives.camera_correction.is_none());

        // Below the new min zoom of 16, but only the pan is corrected
        let wide = Viewport::new(1600.0, 900.0);
        let directives = map.tick(&mut camera, wide);
        let correction = directives.camera_correction.unwrap();
        assert_eq!(directives.effective_zoom, 10.0);
        assert_eq!(camera.projection, Projection::Orthographic { zoom: 10.0 });
        // 1600 / 10 / 2 = 80 leaves no room on x, 900 / 10 / 2 = 45 leaves 5 on y
        assert_eq!(correction.target, Point::new(0.0, 5.0));
        assert_eq!(correction.position.xy(), correction.target);
    }

    #[test]
    fn test_default_camera_sits_at_min_zoom() {
        let (map, _spawner) = session(full_resolver());
        let camera = map.default_camera(&viewport());
        assert!((camera.effective_zoom(&viewport()) - 8.0).abs() < 1e-9);
        assert_eq!(
            camera.projection,
            Projection::Perspective {
                fov_degrees: crate::constants::DEFAULT_FOV
            }
        );
    }

    #[test]
    fn test_reset_clears_slots_and_bumps_generation() {
        let (mut map, spawner) = session(full_resolver());
        let mut camera = CameraState::orthographic(Point::default(), 10.0, 40.0);

        map.tick(&mut camera, viewport());
        spawner.run_pending();
        map.tick(&mut camera, viewport());
        assert!(map.store().loaded_count() > 0);

        map.reset();
        assert_eq!(map.store().loaded_count(), 0);
        assert_eq!(map.lod().filled_count(), 0);
        assert_eq!(map.generation(), 1);

        // Same focus cell, but the neighborhood is requested again
        map.tick(&mut camera, viewport());
        assert!(map.pending_loads() > 0);
    }
}
