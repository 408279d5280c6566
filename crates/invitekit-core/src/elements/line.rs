//! Line element.

use super::{ShapeTrait, point_to_segment_dist};
use kurbo::{BezPath, Line as KurboLine, Point, Rect as KurboRect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A straight segment. `points` is `[x1, y1, x2, y2]` relative to the element
/// anchor; a line has no width or height of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Line {
    pub points: [f64; 4],
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for Line {
    fn default() -> Self {
        Self {
            points: [100.0, 100.0, 200.0, 100.0],
            stroke: "#000".to_string(),
            stroke_width: 2.0,
        }
    }
}

impl Line {
    pub fn start(&self) -> Point {
        Point::new(self.points[0], self.points[1])
    }

    pub fn end(&self) -> Point {
        Point::new(self.points[2], self.points[3])
    }

    pub fn as_kurbo(&self) -> KurboLine {
        KurboLine::new(self.start(), self.end())
    }

    /// Length of the segment.
    pub fn length(&self) -> f64 {
        (self.end() - self.start()).hypot()
    }
}

impl ShapeTrait for Line {
    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(0.1)
    }

    fn local_bounds(&self) -> KurboRect {
        KurboRect::from_points(self.start(), self.end())
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_segment_dist(point, self.start(), self.end()) <= tolerance + self.stroke_width / 2.0
    }

    /// Even indices scale by `scale_x`, odd ones by `scale_y`. No size floor.
    fn scale(&mut self, scale_x: f64, scale_y: f64) {
        for (i, value) in self.points.iter_mut().enumerate() {
            *value *= if i % 2 == 0 { scale_x } else { scale_y };
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.points.iter().any(|p| !p.is_finite()) {
            return Err("line points must be finite".to_string());
        }
        if self.stroke_width < 0.0 {
            return Err("strokeWidth must not be negative".to_string());
        }
        Ok(())
    }
}
