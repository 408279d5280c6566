//! Circle element.

use super::ShapeTrait;
use kurbo::{BezPath, Circle as KurboCircle, Point, Rect as KurboRect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A circle centered on the element anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Circle {
    pub radius: f64,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for Circle {
    fn default() -> Self {
        Self {
            radius: 50.0,
            fill: "#e74c3c".to_string(),
            stroke: "#000".to_string(),
            stroke_width: 1.0,
        }
    }
}

impl Circle {
    pub fn as_kurbo(&self) -> KurboCircle {
        KurboCircle::new(Point::ZERO, self.radius)
    }
}

impl ShapeTrait for Circle {
    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(0.1)
    }

    fn local_bounds(&self) -> KurboRect {
        KurboRect::new(-self.radius, -self.radius, self.radius, self.radius)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point.to_vec2().hypot() <= self.radius + tolerance
    }

    /// Circles only scale uniformly; `scale_y` is ignored.
    fn scale(&mut self, scale_x: f64, _scale_y: f64) {
        self.radius = crate::transform::scale_length(self.radius, scale_x);
    }

    fn validate(&self) -> Result<(), String> {
        if self.radius <= 0.0 {
            return Err("radius must be positive".to_string());
        }
        if self.stroke_width < 0.0 {
            return Err("strokeWidth must not be negative".to_string());
        }
        Ok(())
    }
}
