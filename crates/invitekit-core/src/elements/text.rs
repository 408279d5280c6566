//! Text element.

use super::ShapeTrait;
use kurbo::{BezPath, Rect as KurboRect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// Horizontal alignment of text lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Font style, using the canvas library's spelling on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "bold")]
    Bold,
    #[serde(rename = "italic")]
    Italic,
    #[serde(rename = "bold italic", alias = "bold-italic", alias = "italic bold")]
    BoldItalic,
}

impl FontStyle {
    pub fn is_bold(&self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }

    pub fn is_italic(&self) -> bool {
        matches!(self, FontStyle::Italic | FontStyle::BoldItalic)
    }
}

/// A block of text anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Text {
    pub text: String,
    /// Font size in pixels.
    pub font_size: f64,
    pub font_family: String,
    pub fill: String,
    pub align: TextAlign,
    pub font_style: FontStyle,
}

impl Default for Text {
    fn default() -> Self {
        Self {
            text: "Texto de ejemplo".to_string(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: "Arial".to_string(),
            fill: "#000".to_string(),
            align: TextAlign::default(),
            font_style: FontStyle::default(),
        }
    }
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;

    /// Average glyph advance as a fraction of the font size.
    const APPROX_CHAR_WIDTH: f64 = 0.6;

    /// Approximate layout size; the renderer owns exact metrics.
    pub fn approx_size(&self) -> (f64, f64) {
        let lines: Vec<&str> = self.text.split('\n').collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = longest as f64 * self.font_size * Self::APPROX_CHAR_WIDTH;
        let height = lines.len() as f64 * self.font_size;
        (width, height)
    }
}

impl ShapeTrait for Text {
    fn to_path(&self) -> BezPath {
        self.local_bounds().to_path(0.1)
    }

    fn local_bounds(&self) -> KurboRect {
        let (width, height) = self.approx_size();
        KurboRect::new(0.0, 0.0, width, height)
    }

    /// Text scales with the horizontal factor only.
    fn scale(&mut self, scale_x: f64, _scale_y: f64) {
        self.font_size = crate::transform::scale_length(self.font_size, scale_x);
    }

    fn validate(&self) -> Result<(), String> {
        if self.font_size <= 0.0 {
            return Err("fontSize must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_style_wire_names() {
        assert_eq!(
            serde_json::to_string(&FontStyle::BoldItalic).unwrap(),
            "\"bold italic\""
        );
        let parsed: FontStyle = serde_json::from_str("\"bold-italic\"").unwrap();
        assert_eq!(parsed, FontStyle::BoldItalic);
        assert!(parsed.is_bold() && parsed.is_italic());
    }

    #[test]
    fn test_unknown_align_is_rejected() {
        let result: Result<TextAlign, _> = serde_json::from_str("\"middle\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_approx_size_multiline() {
        let text = Text {
            text: "ab\nabcd".to_string(),
            font_size: 10.0,
            ..Text::default()
        };
        let (w, h) = text.approx_size();
        assert!((w - 24.0).abs() < 1e-9);
        assert!((h - 20.0).abs() < f64::EPSILON);
    }
}
