use crate::core::constants::{DEFAULT_CAMERA_HEIGHT, DEFAULT_FOV, MIN_VIEWPORT_EXTENT};
use crate::core::geo::{Point, Point3};
use crate::core::zoom;
use serde::{Deserialize, Serialize};

/// Size of the render surface in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width floored to one pixel
    pub fn safe_width(&self) -> f64 {
        self.width.max(MIN_VIEWPORT_EXTENT)
    }

    /// Height floored to one pixel
    pub fn safe_height(&self) -> f64 {
        self.height.max(MIN_VIEWPORT_EXTENT)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// How the camera projects the map plane onto the screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// Zoom is an explicit scalar in pixels per world unit
    Orthographic { zoom: f64 },
    /// Zoom follows from the camera height above the plane
    Perspective { fov_degrees: f64 },
}

impl Default for Projection {
    fn default() -> Self {
        Self::Perspective {
            fov_degrees: DEFAULT_FOV,
        }
    }
}

/// Camera state owned by the host renderer and read once per frame.
///
/// A frame tick only ever writes back `position` and `target`. The zoom
/// (orthographic `zoom` or perspective height) changes only through zoom
/// input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: Point3,
    pub target: Point,
    pub projection: Projection,
}

impl CameraState {
    /// Orthographic camera looking straight down at `target`
    pub fn orthographic(target: Point, height: f64, zoom: f64) -> Self {
        Self {
            position: Point3::new(target.x, target.y, height),
            target,
            projection: Projection::Orthographic { zoom },
        }
    }

    /// Perspective camera looking straight down at `target` from `distance`
    pub fn perspective(target: Point, distance: f64, fov_degrees: f64) -> Self {
        Self {
            position: Point3::new(target.x, target.y, distance),
            target,
            projection: Projection::Perspective { fov_degrees },
        }
    }

    /// Zoom in orthographic units, whatever the projection
    pub fn effective_zoom(&self, viewport: &Viewport) -> f64 {
        match self.projection {
            Projection::Orthographic { zoom } => zoom,
            Projection::Perspective { fov_degrees } => {
                zoom::effective_zoom(self.position.z, fov_degrees, viewport.height)
            }
        }
    }

    /// Apply an effective zoom, solving for the camera height when the
    /// projection is perspective
    pub fn set_effective_zoom(&mut self, effective_zoom: f64, viewport: &Viewport) {
        match &mut self.projection {
            Projection::Orthographic { zoom } => *zoom = effective_zoom,
            Projection::Perspective { fov_degrees } => {
                let distance = zoom::distance_for_zoom(effective_zoom, *fov_degrees, viewport.height);
                self.position.z = distance.copysign(self.position.z);
            }
        }
    }

    /// Move target and position together along the plane
    pub fn translate(&mut self, delta: &Point) {
        self.target = self.target.add(delta);
        self.position = self.position.translate_xy(delta);
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::perspective(Point::default(), DEFAULT_CAMERA_HEIGHT, DEFAULT_FOV)
    }
}
