use serde::{Deserialize, Serialize};

/// A point (or vector) on the map plane in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// A world-space position; `z` is the height above the map plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Projection onto the map plane
    pub fn xy(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Shift along the plane, leaving the height untouched
    pub fn translate_xy(&self, delta: &Point) -> Point3 {
        Point3::new(self.x + delta.x, self.y + delta.y, self.z)
    }
}

/// A cell of the tile grid. Rows grow downwards, columns to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: u32,
    pub col: u32,
}

impl GridPos {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_math() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);

        assert_eq!(a.add(&b), Point::new(5.0, 8.0));
        assert_eq!(b.subtract(&a), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_translate_keeps_height() {
        let p = Point3::new(1.0, 1.0, 7.5);
        let moved = p.translate_xy(&Point::new(-2.0, 3.0));
        assert_eq!(moved, Point3::new(-1.0, 4.0, 7.5));
        assert_eq!(moved.xy(), Point::new(-1.0, 4.0));
    }
}
