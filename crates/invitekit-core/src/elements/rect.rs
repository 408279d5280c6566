//! Rectangle element.

use super::ShapeTrait;
use kurbo::{BezPath, Rect as KurboRect, RoundedRect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A rectangle with optional rounded corners, anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Rect {
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    /// Corner radius (0 = sharp corners).
    pub corner_radius: f64,
}

impl Default for Rect {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 70.0,
            fill: "#3498db".to_string(),
            stroke: "#000".to_string(),
            stroke_width: 1.0,
            corner_radius: 0.0,
        }
    }
}

impl Rect {
    pub fn as_rect(&self) -> KurboRect {
        KurboRect::new(0.0, 0.0, self.width, self.height)
    }
}

impl ShapeTrait for Rect {
    fn to_path(&self) -> BezPath {
        if self.corner_radius > 0.0 {
            RoundedRect::from_rect(self.as_rect(), self.corner_radius).to_path(0.1)
        } else {
            self.as_rect().to_path(0.1)
        }
    }

    fn local_bounds(&self) -> KurboRect {
        self.as_rect()
    }

    fn scale(&mut self, scale_x: f64, scale_y: f64) {
        self.width = crate::transform::scale_length(self.width, scale_x);
        self.height = crate::transform::scale_length(self.height, scale_y);
    }

    fn validate(&self) -> Result<(), String> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err("rect width and height must be positive".to_string());
        }
        if self.corner_radius < 0.0 {
            return Err("cornerRadius must not be negative".to_string());
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
    use kurbo::Point;

    #[test]
    fn test_bounds() {
        let rect = Rect {
            width: 100.0,
            height: 50.0,
            ..Rect::default()
        };
        let bounds = rect.local_bounds();
        assert!(bounds.x0.abs() < f64::EPSILON);
        assert!((bounds.x1 - 100.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test() {
        let rect = Rect::default();
        assert!(rect.hit_test(Point::new(50.0, 35.0), 0.0));
        assert!(!rect.hit_test(Point::new(150.0, 35.0), 0.0));
        assert!(rect.hit_test(Point::new(105.0, 35.0), 10.0)); // Within tolerance
    }

    #[test]
    fn test_rounded_path_stays_inside_bounds() {
        let rect = Rect {
            corner_radius: 10.0,
            ..Rect::default()
        };
        let bbox = rect.to_path().bounding_box();
        assert!((bbox.width() - 100.0).abs() < 1e-6);
        assert!((bbox.height() - 70.0).abs() < 1e-6);
    }

    #[test]
    fn test_validate() {
        assert!(Rect::default().validate().is_ok());
        let negative = Rect {
            corner_radius: -1.0,
            ..Rect::default()
        };
        assert!(negative.validate().is_err());
    }
}
