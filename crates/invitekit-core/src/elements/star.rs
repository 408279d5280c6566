//! Star element.

use super::{ShapeTrait, point_to_polygon_dist, polygon_path};
use kurbo::{BezPath, Point, Rect as KurboRect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A star centered on the element anchor, with the first tip pointing up.
///
/// `inner_radius < outer_radius` is expected but not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Star {
    pub num_points: u32,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for Star {
    fn default() -> Self {
        Self {
            num_points: 5,
            inner_radius: 40.0,
            outer_radius: 70.0,
            fill: "#f1c40f".to_string(),
            stroke: "#000".to_string(),
            stroke_width: 1.0,
        }
    }
}

impl Star {
    /// Minimum number of tips.
    pub const MIN_POINTS: u32 = 3;
    /// Maximum number of tips.
    pub const MAX_POINTS: u32 = 100;

    /// Alternating outer/inner vertices, starting at the top tip.
    ///
    /// Tip counts outside `MIN_POINTS..=MAX_POINTS` are clamped.
    pub fn vertices(&self) -> Vec<Point> {
        let n = self.num_points.clamp(Self::MIN_POINTS, Self::MAX_POINTS);
        let count = (n as usize).checked_mul(2).unwrap_or_default();
        (0..count)
            .map(|i| {
                let radius = if i % 2 == 0 {
                    self.outer_radius
                } else {
                    self.inner_radius
                };
                let angle = i as f64 * PI / f64::from(n);
                Point::new(radius * angle.sin(), -radius * angle.cos())
            })
            .collect()
    }
}

impl ShapeTrait for Star {
    fn to_path(&self) -> BezPath {
        polygon_path(&self.vertices())
    }

    fn local_bounds(&self) -> KurboRect {
        let r = self.outer_radius.max(self.inner_radius);
        KurboRect::new(-r, -r, r, r)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let vertices = self.vertices();
        self.to_path().contains(point)
            || point_to_polygon_dist(point, &vertices) <= tolerance + self.stroke_width / 2.0
    }

    /// Both radii follow `scale_x`; `scale_y` is ignored.
    fn scale(&mut self, scale_x: f64, _scale_y: f64) {
        self.inner_radius = crate::transform::scale_length(self.inner_radius, scale_x);
        self.outer_radius = crate::transform::scale_length(self.outer_radius, scale_x);
    }

    fn validate(&self) -> Result<(), String> {
        if !(Self::MIN_POINTS..=Self::MAX_POINTS).contains(&self.num_points) {
            return Err(format!(
                "numPoints must be within [{}, {}], got {}",
                Self::MIN_POINTS,
                Self::MAX_POINTS,
                self.num_points
            ));
        }
        if self.inner_radius <= 0.0 || self.outer_radius <= 0.0 {
            return Err("star radii must be positive".to_string());
        }
        if self.stroke_width < 0.0 {
            return Err("strokeWidth must not be negative".to_string());
        }
        Ok(())
    }
}
