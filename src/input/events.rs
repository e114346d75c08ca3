use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Camera input applied through [`crate::LodMap::handle_input`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Drag by a world-space delta. Target and position move together.
    Pan { delta: Point },
    /// Jump to an absolute effective zoom
    ZoomTo { zoom: f64 },
    /// Multiply the current effective zoom (wheel or pinch)
    ZoomBy { factor: f64 },
}

impl InputEvent {
    pub fn pan(dx: f64, dy: f64) -> Self {
        Self::Pan {
            delta: Point::new(dx, dy),
        }
    }

    /// Events carrying NaN, infinities or a non-positive zoom are rejected
    pub fn is_valid(&self) -> bool {
        match *self {
            InputEvent::Pan { delta } => delta.x.is_finite() && delta.y.is_finite(),
            InputEvent::ZoomTo { zoom } => zoom.is_finite() && zoom > 0.0,
            InputEvent::ZoomBy { factor } => factor.is_finite() && factor > 0.0,
        }
    }
}

/// Whether an event changed the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventHandled {
    Handled,
    NotHandled,
}

impl EventHandled {
    pub fn is_handled(&self) -> bool {
        matches!(self, EventHandled::Handled)
    }
}
