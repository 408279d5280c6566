//! Element definitions for the template canvas.

mod circle;
mod image;
mod line;
mod rect;
mod star;
mod text;
mod triangle;

pub use circle::Circle;
pub use image::{Image, ImageFormat, ImageHandle};
pub use line::Line;
pub use rect::Rect;
pub use star::Star;
pub use text::{FontStyle, Text, TextAlign};
pub use triangle::Triangle;

#[cfg(test)]
pub(crate) use image::tests::png_header;

use kurbo::{Affine, BezPath, Point, Shape as KurboShape};
use peniko::Color;
use serde::de::Error as _;
use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while building elements.
#[derive(Debug, Error)]
pub enum ElementError {
    #[error("Unknown element kind: {0}")]
    UnknownKind(String),
    #[error("The element type cannot be overridden")]
    KindOverride,
    #[error("Invalid override: {0}")]
    InvalidOverride(String),
}

/// Result type for element construction.
pub type ElementResult<T> = Result<T, ElementError>;

/// Font families offered by the property panel.
pub const FONT_FAMILIES: &[&str] = &[
    "Arial",
    "Helvetica",
    "Times New Roman",
    "Georgia",
    "Verdana",
    "Courier New",
    "Impact",
    "Comic Sans MS",
    "Trebuchet MS",
    "Palatino",
    "Garamond",
    "Bookman",
    "Tahoma",
    "Arial Black",
    "Lucida Sans",
];

/// Color swatches offered by the property panel.
pub const COLOR_SWATCHES: &[&str] = &[
    "#000000", "#ffffff", "#ff0000", "#00ff00", "#0000ff", "#ffff00", "#00ffff", "#ff00ff",
    "#c0c0c0", "#808080", "#800000", "#808000", "#008000", "#800080", "#008080", "#000080",
    "#ffa500", "#ffc0cb",
];

const TEXT_ALIGNS: &[&str] = &["left", "center", "right", "justify"];
const FONT_STYLES: &[&str] = &["normal", "bold", "italic", "bold italic"];

/// Parse a CSS color string (`#rgb`, `#rrggbb` or a named color).
pub fn parse_color(value: &str) -> Option<Color> {
    peniko::color::parse_color(value.trim())
        .ok()
        .map(|c| c.to_alpha_color::<peniko::color::Srgb>())
}

/// Distance from a point to a line segment (a to b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = kurbo::Vec2::new(b.x - a.x, b.y - a.y);
    let pv = kurbo::Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a closed polygon outline.
pub(crate) fn point_to_polygon_dist(point: Point, vertices: &[Point]) -> f64 {
    let n = vertices.len();
    (0..n)
        .map(|i| point_to_segment_dist(point, vertices[i], vertices[(i + 1) % n]))
        .fold(f64::INFINITY, f64::min)
}

pub(crate) fn polygon_path(vertices: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = vertices.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        path.close_path();
    }
    path
}

/// Stable identifier of an element within its list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id of the form `<kind>-<uuid>`.
    pub fn generate(kind: ElementKind) -> Self {
        Self(format!("{}-{}", kind.as_str(), Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The recognized element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Text,
    Image,
    Rect,
    Circle,
    Line,
    Triangle,
    Star,
}

impl ElementKind {
    pub fn all() -> &'static [ElementKind] {
        &[
            ElementKind::Text,
            ElementKind::Image,
            ElementKind::Rect,
            ElementKind::Circle,
            ElementKind::Line,
            ElementKind::Triangle,
            ElementKind::Star,
        ]
    }

    /// Wire name used in the `type` tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Image => "image",
            ElementKind::Rect => "rect",
            ElementKind::Circle => "circle",
            ElementKind::Line => "line",
            ElementKind::Triangle => "triangle",
            ElementKind::Star => "star",
        }
    }

    /// Kind-specific property keys accepted on the wire.
    pub fn property_names(&self) -> &'static [&'static str] {
        match self {
            ElementKind::Text => &["text", "fontSize", "fontFamily", "fill", "align", "fontStyle"],
            ElementKind::Image => &["width", "height", "src", "assetId"],
            ElementKind::Rect => &["width", "height", "fill", "stroke", "strokeWidth", "cornerRadius"],
            ElementKind::Circle => &["radius", "fill", "stroke", "strokeWidth"],
            ElementKind::Line => &["points", "stroke", "strokeWidth"],
            ElementKind::Triangle => &["width", "height", "fill", "stroke", "strokeWidth"],
            ElementKind::Star => &[
                "numPoints",
                "innerRadius",
                "outerRadius",
                "fill",
                "stroke",
                "strokeWidth",
            ],
        }
    }

    /// Properties exposed by the property panel for this kind.
    ///
    /// Lines expose neither rotation nor opacity and stars have no width or
    /// height; both remain valid fields, they are simply not edited there.
    pub fn editable_properties(&self) -> &'static [&'static str] {
        match self {
            ElementKind::Text => &[
                "x", "y", "rotation", "opacity", "text", "fontSize", "fontFamily", "fontStyle",
                "align", "fill",
            ],
            ElementKind::Image => &["x", "y", "rotation", "opacity", "width", "height"],
            ElementKind::Rect => &[
                "x", "y", "rotation", "opacity", "width", "height", "cornerRadius", "fill",
                "stroke", "strokeWidth",
            ],
            ElementKind::Circle => &[
                "x", "y", "rotation", "opacity", "radius", "fill", "stroke", "strokeWidth",
            ],
            ElementKind::Line => &["x", "y", "points", "stroke", "strokeWidth"],
            ElementKind::Triangle => &[
                "x", "y", "rotation", "opacity", "width", "height", "fill", "stroke",
                "strokeWidth",
            ],
            ElementKind::Star => &[
                "x", "y", "rotation", "opacity", "numPoints", "innerRadius", "outerRadius",
                "fill", "stroke", "strokeWidth",
            ],
        }
    }

    /// Suggested values the property panel offers for `key`.
    ///
    /// `None` when the key is free-form or not editable for this kind. Colors
    /// and fonts outside the lists stay valid.
    pub fn property_options(&self, key: &str) -> Option<&'static [&'static str]> {
        if !self.editable_properties().contains(&key) {
            return None;
        }
        match key {
            "fontFamily" => Some(FONT_FAMILIES),
            "fill" | "stroke" => Some(COLOR_SWATCHES),
            "align" => Some(TEXT_ALIGNS),
            "fontStyle" => Some(FONT_STYLES),
            _ => None,
        }
    }

    /// Default anchor position used when a new element is added.
    fn default_position(&self) -> Point {
        match self {
            ElementKind::Circle | ElementKind::Star => Point::new(150.0, 150.0),
            ElementKind::Line => Point::ZERO,
            _ => Point::new(100.0, 100.0),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = ElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ElementError::UnknownKind(s.to_string()))
    }
}

/// Geometry shared by every element kind.
///
/// All coordinates are in the element's local frame: the origin is the
/// element's `x`/`y` and rotation is applied by the owning [`Element`].
pub trait ShapeTrait {
    /// Outline path for rendering.
    fn to_path(&self) -> BezPath;

    /// Bounding box in the local frame.
    fn local_bounds(&self) -> kurbo::Rect {
        self.to_path().bounding_box()
    }

    /// Check if a local point hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.local_bounds().inflate(tolerance, tolerance).contains(point)
    }

    /// Apply the delta scale of a finished resize gesture.
    fn scale(&mut self, scale_x: f64, scale_y: f64);

    /// Check the kind's value constraints.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Payload of an element whose kind this build does not recognize.
///
/// Kept verbatim so that foreign data survives a load/save cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownShape {
    pub kind: String,
    pub fields: Map<String, Value>,
}

/// Kind-specific payload of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Text(Text),
    Image(Image),
    Rect(Rect),
    Circle(Circle),
    Line(Line),
    Triangle(Triangle),
    Star(Star),
    Unknown(UnknownShape),
}

impl Shape {
    /// Default payload for a kind.
    pub fn with_defaults(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Text => Shape::Text(Text::default()),
            ElementKind::Image => Shape::Image(Image::default()),
            ElementKind::Rect => Shape::Rect(Rect::default()),
            ElementKind::Circle => Shape::Circle(Circle::default()),
            ElementKind::Line => Shape::Line(Line::default()),
            ElementKind::Triangle => Shape::Triangle(Triangle::default()),
            ElementKind::Star => Shape::Star(Star::default()),
        }
    }

    /// The kind, or `None` for unrecognized payloads.
    pub fn kind(&self) -> Option<ElementKind> {
        match self {
            Shape::Text(_) => Some(ElementKind::Text),
            Shape::Image(_) => Some(ElementKind::Image),
            Shape::Rect(_) => Some(ElementKind::Rect),
            Shape::Circle(_) => Some(ElementKind::Circle),
            Shape::Line(_) => Some(ElementKind::Line),
            Shape::Triangle(_) => Some(ElementKind::Triangle),
            Shape::Star(_) => Some(ElementKind::Star),
            Shape::Unknown(_) => None,
        }
    }

    /// The `type` tag as found on the wire.
    pub fn type_name(&self) -> &str {
        match self {
            Shape::Unknown(u) => &u.kind,
            known => known.kind().map(|k| k.as_str()).unwrap_or_default(),
        }
    }

    fn as_geometry(&self) -> Option<&dyn ShapeTrait> {
        match self {
            Shape::Text(s) => Some(s),
            Shape::Image(s) => Some(s),
            Shape::Rect(s) => Some(s),
            Shape::Circle(s) => Some(s),
            Shape::Line(s) => Some(s),
            Shape::Triangle(s) => Some(s),
            Shape::Star(s) => Some(s),
            Shape::Unknown(_) => None,
        }
    }

    pub fn to_path(&self) -> Option<BezPath> {
        self.as_geometry().map(|s| s.to_path())
    }

    pub fn local_bounds(&self) -> Option<kurbo::Rect> {
        self.as_geometry().map(|s| s.local_bounds())
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.as_geometry()
            .is_some_and(|s| s.hit_test(point, tolerance))
    }

    pub fn validate(&self) -> Result<(), String> {
        self.as_geometry().map_or(Ok(()), |s| s.validate())
    }

    /// Get the image payload if this is an image.
    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Shape::Image(img) => Some(img),
            _ => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut Image> {
        match self {
            Shape::Image(img) => Some(img),
            _ => None,
        }
    }

    /// Kind-specific fields as a JSON object (without the `type` tag).
    pub(crate) fn to_fields(&self) -> serde_json::Result<Map<String, Value>> {
        let value = match self {
            Shape::Text(s) => serde_json::to_value(s)?,
            Shape::Image(s) => serde_json::to_value(s)?,
            Shape::Rect(s) => serde_json::to_value(s)?,
            Shape::Circle(s) => serde_json::to_value(s)?,
            Shape::Line(s) => serde_json::to_value(s)?,
            Shape::Triangle(s) => serde_json::to_value(s)?,
            Shape::Star(s) => serde_json::to_value(s)?,
            Shape::Unknown(u) => return Ok(u.fields.clone()),
        };
        match value {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    /// Rebuild a payload from its `type` tag and fields.
    pub(crate) fn from_fields(kind: &str, fields: Map<String, Value>) -> serde_json::Result<Self> {
        let Ok(known) = kind.parse::<ElementKind>() else {
            return Ok(Shape::Unknown(UnknownShape {
                kind: kind.to_string(),
                fields,
            }));
        };
        let value = Value::Object(fields);
        Ok(match known {
            ElementKind::Text => Shape::Text(serde_json::from_value(value)?),
            ElementKind::Image => Shape::Image(serde_json::from_value(value)?),
            ElementKind::Rect => Shape::Rect(serde_json::from_value(value)?),
            ElementKind::Circle => Shape::Circle(serde_json::from_value(value)?),
            ElementKind::Line => Shape::Line(serde_json::from_value(value)?),
            ElementKind::Triangle => Shape::Triangle(serde_json::from_value(value)?),
            ElementKind::Star => Shape::Star(serde_json::from_value(value)?),
        })
    }
}

impl Serialize for Shape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.to_fields().map_err(S::Error::custom)?;
        let mut map = serializer.serialize_map(Some(fields.len() + 1))?;
        map.serialize_entry("type", self.type_name())?;
        for (key, value) in &fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Shape {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let kind = match fields.remove("type") {
            Some(Value::String(kind)) => kind,
            Some(other) => {
                return Err(D::Error::custom(format!("invalid element type: {other}")));
            }
            None => return Err(D::Error::missing_field("type")),
        };
        Shape::from_fields(&kind, fields).map_err(D::Error::custom)
    }
}

fn default_opacity() -> f64 {
    1.0
}

/// One drawable unit of a design.
///
/// Equality ignores transient image handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Anchor position (top-left for boxes, center for radial shapes,
    /// origin of the points for lines).
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    /// Rotation in degrees around the anchor.
    #[serde(default)]
    pub rotation: f64,
    /// Opacity in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(flatten)]
    pub shape: Shape,
}

impl Element {
    /// Common field names shared by every kind.
    pub const COMMON_PROPERTIES: &'static [&'static str] = &["x", "y", "rotation", "opacity"];

    /// Create an element with a fresh id and the default payload for `kind`.
    pub fn with_defaults(kind: ElementKind) -> Self {
        let position = kind.default_position();
        Self {
            id: ElementId::generate(kind),
            x: position.x,
            y: position.y,
            rotation: 0.0,
            opacity: 1.0,
            shape: Shape::with_defaults(kind),
        }
    }

    pub fn kind(&self) -> Option<ElementKind> {
        self.shape.kind()
    }

    /// Local-to-canvas transform.
    pub fn affine(&self) -> Affine {
        Affine::translate((self.x, self.y)) * Affine::rotate(self.rotation.to_radians())
    }

    /// Outline in canvas coordinates, `None` for unknown kinds.
    pub fn world_path(&self) -> Option<BezPath> {
        self.shape.to_path().map(|path| self.affine() * path)
    }

    /// Axis-aligned bounds in canvas coordinates.
    pub fn bounds(&self) -> Option<kurbo::Rect> {
        self.world_path().map(|path| path.bounding_box())
    }

    /// Check if a canvas point hits this element.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = self.affine().inverse() * point;
        self.shape.hit_test(local, tolerance)
    }

    /// Whether a decoded image is attached (always false for non-images).
    pub fn has_image_handle(&self) -> bool {
        self.shape
            .as_image()
            .is_some_and(|img| img.handle().is_some())
    }

    /// Check common and kind-specific value constraints.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(format!("opacity must be within [0, 1], got {}", self.opacity));
        }
        if !self.x.is_finite() || !self.y.is_finite() || !self.rotation.is_finite() {
            return Err("position and rotation must be finite".to_string());
        }
        self.shape.validate()
    }
}

/// Ordered element collection; later entries are drawn on top.
pub type ElementList = Vec<Element>;

/// Build an element of `kind` with the editor defaults, then apply `overrides`.
///
/// `overrides` may set any common or kind-specific field, including `id`.
/// Fails on an unknown kind or on overrides that do not fit the kind.
pub fn create_default(kind: &str, overrides: &Map<String, Value>) -> ElementResult<Element> {
    let kind: ElementKind = kind.parse()?;
    let element = Element::with_defaults(kind);
    if overrides.is_empty() {
        return Ok(element);
    }
    if overrides.get("type").is_some_and(|t| t.as_str() != Some(kind.as_str())) {
        return Err(ElementError::KindOverride);
    }

    let mut value =
        serde_json::to_value(&element).map_err(|e| ElementError::InvalidOverride(e.to_string()))?;
    if let Value::Object(map) = &mut value {
        for (key, v) in overrides {
            map.insert(key.clone(), v.clone());
        }
    }
    let element: Element =
        serde_json::from_value(value).map_err(|e| ElementError::InvalidOverride(e.to_string()))?;
    element.validate().map_err(ElementError::InvalidOverride)?;
    Ok(element)
}
