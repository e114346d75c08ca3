//! Keeping the camera over the map
//!
//! The visible extent shrinks as the zoom grows, so the legal range for the
//! pan target grows with it. Limits are recomputed from the current zoom on
//! every call and never cached.

use crate::core::constants::MIN_ZOOM;
use crate::core::geo::Point;
use crate::core::viewport::{CameraState, Viewport};
use serde::{Deserialize, Serialize};

/// How far the pan target may move from the origin on each axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanLimits {
    pub max_pan_x: f64,
    pub max_pan_y: f64,
}

impl PanLimits {
    pub fn contains(&self, point: &Point) -> bool {
        point.x.abs() <= self.max_pan_x && point.y.abs() <= self.max_pan_y
    }

    /// Clamp a point into `[-max_pan_x, max_pan_x] x [-max_pan_y, max_pan_y]`.
    /// Points already inside are returned unchanged.
    pub fn clamp(&self, point: &Point) -> Point {
        if self.contains(point) {
            return *point;
        }
        Point::new(
            point.x.clamp(-self.max_pan_x, self.max_pan_x),
            point.y.clamp(-self.max_pan_y, self.max_pan_y),
        )
    }
}

/// Constrains the camera target (and position with it) to the map plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanClamper {
    pub plane_width: f64,
    pub plane_height: f64,
}

impl PanClamper {
    pub fn new(plane_width: f64, plane_height: f64) -> Self {
        Self {
            plane_width,
            plane_height,
        }
    }

    pub fn square(plane_size: f64) -> Self {
        Self::new(plane_size, plane_size)
    }

    /// Pan limits for the given zoom and viewport
    pub fn limits(&self, effective_zoom: f64, viewport: &Viewport) -> PanLimits {
        let zoom = effective_zoom.max(MIN_ZOOM);
        let half_visible_width = viewport.safe_width() / zoom / 2.0;
        let half_visible_height = viewport.safe_height() / zoom / 2.0;

        PanLimits {
            max_pan_x: (self.plane_width / 2.0 - half_visible_width).max(0.0),
            max_pan_y: (self.plane_height / 2.0 - half_visible_height).max(0.0),
        }
    }

    /// Clamp the camera after an explicit pan. The correction is applied to
    /// target and position alike so the look-at stays coupled. Returns the
    /// applied correction, zero when nothing moved.
    pub fn clamp_pan(&self, camera: &mut CameraState, viewport: &Viewport) -> Point {
        let limits = self.limits(camera.effective_zoom(viewport), viewport);
        let clamped = limits.clamp(&camera.target);
        let delta = clamped.subtract(&camera.target);
        camera.translate(&delta);
        delta
    }

    /// Per-frame check. Only touches the camera when the target sits outside
    /// the current limits, so an in-bounds drag is never fought.
    pub fn enforce(&self, camera: &mut CameraState, viewport: &Viewport) -> Option<Point> {
        let limits = self.limits(camera.effective_zoom(viewport), viewport);
        if limits.contains(&camera.target) {
            return None;
        }
        let clamped = limits.clamp(&camera.target);
        let delta = clamped.subtract(&camera.target);
        camera.translate(&delta);
        Some(delta)
    }
}

/// Allowed zoom range. The minimum keeps the whole viewport over the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomLimits {
    pub min_zoom: f64,
    pub max_zoom: Option<f64>,
}

impl ZoomLimits {
    /// Smallest zoom at which the plane still covers the viewport on both axes
    pub fn for_plane(
        plane_width: f64,
        plane_height: f64,
        viewport: &Viewport,
        max_zoom: Option<f64>,
    ) -> Self {
        let zoom_x = viewport.safe_width() / plane_width.max(MIN_ZOOM);
        let zoom_y = viewport.safe_height() / plane_height.max(MIN_ZOOM);
        let min_zoom = zoom_x.max(zoom_y);

        Self {
            min_zoom,
            max_zoom: max_zoom.map(|max| max.max(min_zoom)),
        }
    }

    pub fn clamp(&self, zoom: f64) -> f64 {
        let zoom = zoom.max(self.min_zoom);
        match self.max_zoom {
            Some(max) => zoom.min(max),
            None => zoom,
        }
    }
}
