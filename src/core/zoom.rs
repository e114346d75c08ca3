//! Zoom equivalence between perspective and orthographic cameras
//!
//! Thresholds, pan limits and zoom limits are expressed in orthographic zoom
//! units (screen pixels per world unit). A perspective camera at distance `d`
//! above the plane with vertical field of view `fov` shows the same amount of
//! the plane as an orthographic camera with zoom
//! `viewport_height / (2 * d * tan(fov / 2))`.

use crate::core::constants::{MIN_CAMERA_DISTANCE, MIN_VIEWPORT_EXTENT, MIN_ZOOM};

/// Convert a perspective camera distance + FOV into an orthographic-style zoom.
pub fn effective_zoom(distance: f64, fov_degrees: f64, viewport_height: f64) -> f64 {
    let height = viewport_height.max(MIN_VIEWPORT_EXTENT);
    let distance = distance.abs().max(MIN_CAMERA_DISTANCE);
    let half_fov = fov_degrees.to_radians() / 2.0;
    height / (2.0 * distance * half_fov.tan())
}

/// Inverse of [`effective_zoom`]: the camera distance that produces `zoom`.
pub fn distance_for_zoom(zoom: f64, fov_degrees: f64, viewport_height: f64) -> f64 {
    let height = viewport_height.max(MIN_VIEWPORT_EXTENT);
    let zoom = zoom.max(MIN_ZOOM);
    let half_fov = fov_degrees.to_radians() / 2.0;
    height / (2.0 * zoom * half_fov.tan())
}
