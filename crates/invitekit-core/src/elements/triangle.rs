//! Triangle element.

use super::{ShapeTrait, point_to_polygon_dist, polygon_path};
use kurbo::{BezPath, Point, Rect as KurboRect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// An isosceles triangle inscribed in a `width` x `height` box, with the apex
/// at top-center and the base along the bottom edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Triangle {
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for Triangle {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 87.0,
            fill: "#9b59b6".to_string(),
            stroke: "#000".to_string(),
            stroke_width: 1.0,
        }
    }
}

impl Triangle {
    /// Polygon vertices: bottom-left, apex, bottom-right.
    pub fn vertices(&self) -> [Point; 3] {
        [
            Point::new(0.0, self.height),
            Point::new(self.width / 2.0, 0.0),
            Point::new(self.width, self.height),
        ]
    }

    /// Flat `[x0, y0, x1, y1, x2, y2]` point list for polyline renderers.
    pub fn flat_points(&self) -> [f64; 6] {
        let [a, b, c] = self.vertices();
        [a.x, a.y, b.x, b.y, c.x, c.y]
    }
}

impl ShapeTrait for Triangle {
    fn to_path(&self) -> BezPath {
        polygon_path(&self.vertices())
    }

    fn local_bounds(&self) -> KurboRect {
        KurboRect::new(0.0, 0.0, self.width, self.height)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.to_path().contains(point)
            || point_to_polygon_dist(point, &self.vertices()) <= tolerance + self.stroke_width / 2.0
    }

    fn scale(&mut self, scale_x: f64, scale_y: f64) {
        self.width = crate::transform::scale_length(self.width, scale_x);
        self.height = crate::transform::scale_length(self.height, scale_y);
    }

    fn validate(&self) -> Result<(), String> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err("triangle width and height must be positive".to_string());
        }
        if self.stroke_width < 0.0 {
            return Err("strokeWidth must not be negative".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertices() {
        let tri = Triangle::default();
        assert_eq!(tri.flat_points(), [0.0, 87.0, 50.0, 0.0, 100.0, 87.0]);
    }

    #[test]
    fn test_hit_test_excludes_top_corners() {
        let tri = Triangle::default();
        assert!(tri.hit_test(Point::new(50.0, 60.0), 0.0));
        // Inside the bounding box but outside the polygon.
        assert!(!tri.hit_test(Point::new(5.0, 5.0), 0.0));
        // Near an edge, within tolerance.
        assert!(tri.hit_test(Point::new(50.0, 89.0), 2.0));
    }
}
