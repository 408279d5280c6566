//! Gesture results applied to elements.
//!
//! The gesture layer reports scale as a delta relative to the element's last
//! committed geometry. The result is folded into absolute units here, so the
//! renderer must reset its own node scale to 1 after every gesture.

use crate::elements::{Element, Shape, ShapeTrait};
use serde::{Deserialize, Serialize};

/// Smallest length a resize gesture may produce.
pub const MIN_SIZE: f64 = 5.0;

/// Scale a length by a gesture factor, flooring the result at [`MIN_SIZE`].
///
/// A factor of exactly 1 leaves the value untouched, so an axis the gesture
/// did not resize never snaps up to the floor.
pub fn scale_length(value: f64, factor: f64) -> f64 {
    if factor == 1.0 {
        return value;
    }
    (value * factor).max(MIN_SIZE)
}

/// Final state of a resize/rotate gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformEnd {
    pub scale_x: f64,
    pub scale_y: f64,
    pub x: f64,
    pub y: f64,
    /// Rotation in degrees.
    pub rotation: f64,
}

impl TransformEnd {
    pub fn new(scale_x: f64, scale_y: f64, x: f64, y: f64, rotation: f64) -> Self {
        Self {
            scale_x,
            scale_y,
            x,
            y,
            rotation,
        }
    }

    /// A gesture that leaves `element` exactly as it is.
    pub fn identity(element: &Element) -> Self {
        Self::new(1.0, 1.0, element.x, element.y, element.rotation)
    }
}

/// Copy of `element` moved to `(x, y)`.
pub fn apply_drag(element: &Element, x: f64, y: f64) -> Element {
    Element {
        x,
        y,
        ..element.clone()
    }
}

/// Copy of `element` with a finished resize/rotate gesture folded in.
///
/// Unknown kinds are returned unchanged.
pub fn apply_transform_end(element: &Element, gesture: &TransformEnd) -> Element {
    let mut next = element.clone();
    let (sx, sy) = (gesture.scale_x, gesture.scale_y);
    match &mut next.shape {
        Shape::Text(s) => s.scale(sx, sy),
        Shape::Image(s) => s.scale(sx, sy),
        Shape::Rect(s) => s.scale(sx, sy),
        Shape::Circle(s) => s.scale(sx, sy),
        Shape::Line(s) => s.scale(sx, sy),
        Shape::Triangle(s) => s.scale(sx, sy),
        Shape::Star(s) => s.scale(sx, sy),
        Shape::Unknown(u) => {
            log::debug!("Ignoring transform on unknown element kind {}", u.kind);
            return next;
        }
    }
    next.x = gesture.x;
    next.y = gesture.y;
    next.rotation = gesture.rotation;
    next
}
