//! Rectangular pupil search region expressed as two corner points.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bounding region for pupil detection.
///
/// Defined by two corner points `(x0, y0)` and `(x1, y1)` with `x0 < x1` and
/// `y0 < y1`. Ordering is caller-guaranteed and not validated here.
///
/// The interior test is strict on all four edges: a pixel exactly on a region
/// edge never passes. Partially illuminated boundary pixels would otherwise
/// drag the centroid toward the region border.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Left edge x coordinate (exclusive)
    pub x0: f64,
    /// Top edge y coordinate (exclusive)
    pub y0: f64,
    /// Right edge x coordinate (exclusive)
    pub x1: f64,
    /// Bottom edge y coordinate (exclusive)
    pub y1: f64,
}

impl Region {
    /// Create a region from its two corner points `(x0, y0)` and `(x1, y1)`.
    pub fn from_corners(min: (f64, f64), max: (f64, f64)) -> Self {
        Self {
            x0: min.0,
            y0: min.1,
            x1: max.0,
            y1: max.1,
        }
    }

    /// Strict interior test: true iff `x0 < x < x1` and `y0 < y < y1`.
    pub fn contains_interior(&self, x: f64, y: f64) -> bool {
        x > self.x0 && x < self.x1 && y > self.y0 && y < self.y1
    }

    /// Width of the region in pixels.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the region in pixels.
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[({}, {}), ({}, {})]", self.x0, self.y0, self.x1, self.y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_points() {
        let region = Region::from_corners((2.0, 3.0), (8.0, 9.0));
        assert!(region.contains_interior(5.0, 6.0));
        assert!(region.contains_interior(2.5, 8.5));
        assert!(!region.contains_interior(1.0, 6.0));
        assert!(!region.contains_interior(9.0, 6.0));
        assert!(!region.contains_interior(5.0, 10.0));
    }

    #[test]
    fn test_edges_are_excluded() {
        let region = Region::from_corners((2.0, 3.0), (8.0, 9.0));

        // All four edges and all four corners fail the strict test.
        assert!(!region.contains_interior(2.0, 6.0));
        assert!(!region.contains_interior(8.0, 6.0));
        assert!(!region.contains_interior(5.0, 3.0));
        assert!(!region.contains_interior(5.0, 9.0));
        assert!(!region.contains_interior(2.0, 3.0));
        assert!(!region.contains_interior(8.0, 9.0));
    }

    #[test]
    fn test_dimensions() {
        let region = Region::from_corners((367.0, 404.0), (682.0, 670.0));
        assert_eq!(region.width(), 315.0);
        assert_eq!(region.height(), 266.0);
    }
}
