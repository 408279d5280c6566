//! Image element and its transient decoded handle.

use super::ShapeTrait;
use kurbo::{BezPath, Rect as KurboRect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Encoded image formats recognised from their magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    Gif,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
        }
    }

    /// Detect format from a MIME type.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_lowercase().as_str() {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/webp" => Some(ImageFormat::WebP),
            "image/gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        if data.starts_with(b"GIF8") {
            return Some(ImageFormat::Gif);
        }

        None
    }

    /// Read the pixel size from the header, for the formats where it sits at
    /// a fixed offset.
    fn pixel_size(&self, data: &[u8]) -> Option<(u32, u32)> {
        match self {
            // IHDR follows the 8-byte signature and the chunk length/type.
            ImageFormat::Png if data.len() >= 24 => {
                let w = u32::from_be_bytes(data[16..20].try_into().ok()?);
                let h = u32::from_be_bytes(data[20..24].try_into().ok()?);
                Some((w, h))
            }
            ImageFormat::Gif if data.len() >= 10 => {
                let w = u16::from_le_bytes(data[6..8].try_into().ok()?);
                let h = u16::from_le_bytes(data[8..10].try_into().ok()?);
                Some((u32::from(w), u32::from(h)))
            }
            _ => None,
        }
    }
}

struct LoadedImage {
    format: ImageFormat,
    bytes: Vec<u8>,
    pixel_size: Option<(u32, u32)>,
}

/// In-memory handle to a resolved image source.
///
/// Cheap to clone. Never serialized and never part of element equality.
#[derive(Clone)]
pub struct ImageHandle {
    inner: Arc<LoadedImage>,
}

impl ImageHandle {
    /// Wrap encoded image bytes. Returns `None` if the format is not recognised.
    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        let format = ImageFormat::from_magic_bytes(&bytes)?;
        let pixel_size = format.pixel_size(&bytes);
        Some(Self {
            inner: Arc::new(LoadedImage {
                format,
                bytes,
                pixel_size,
            }),
        })
    }

    pub fn format(&self) -> ImageFormat {
        self.inner.format
    }

    /// Encoded bytes, for the renderer to decode.
    pub fn bytes(&self) -> &[u8] {
        &self.inner.bytes
    }

    /// Natural size in pixels, when the header exposes it.
    pub fn pixel_size(&self) -> Option<(u32, u32)> {
        self.inner.pixel_size
    }

    /// Whether two handles share the same loaded data.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("format", &self.inner.format)
            .field("data_len", &self.inner.bytes.len())
            .field("pixel_size", &self.inner.pixel_size)
            .finish()
    }
}

/// An image anchored at its top-left corner.
///
/// `src` is the only persisted pointer to the picture; the decoded handle is
/// attached at runtime and an image without one is simply not drawable yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Image {
    pub width: f64,
    pub height: f64,
    pub src: String,
    /// Server-side asset the `src` was uploaded as.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<serde_json::Value>,
    #[serde(skip)]
    handle: Option<ImageHandle>,
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.src == other.src
            && self.asset_id == other.asset_id
    }
}

impl Default for Image {
    fn default() -> Self {
        Self::new(String::new(), Self::DEFAULT_SIZE, Self::DEFAULT_SIZE)
    }
}

impl Image {
    /// Default box for images added without a known natural size.
    pub const DEFAULT_SIZE: f64 = 300.0;

    pub fn new(src: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            src: src.into(),
            asset_id: None,
            handle: None,
        }
    }

    /// Size an image from its natural dimensions so its width is `max_width`,
    /// keeping the aspect ratio.
    pub fn fit_width(src: impl Into<String>, natural_width: f64, natural_height: f64, max_width: f64) -> Self {
        let scale = if natural_width > 0.0 {
            max_width / natural_width
        } else {
            1.0
        };
        let height = if natural_height > 0.0 {
            natural_height * scale
        } else {
            max_width
        };
        Self::new(src, max_width, height)
    }

    pub fn handle(&self) -> Option<&ImageHandle> {
        self.handle.as_ref()
    }

    pub fn set_handle(&mut self, handle: Option<ImageHandle>) {
        self.handle = handle;
    }

    /// Remove and return the transient handle.
    pub fn take_handle(&mut self) -> Option<ImageHandle> {
        self.handle.take()
    }

    pub fn is_drawable(&self) -> bool {
        self.handle.is_some()
    }
}

impl ShapeTrait for Image {
    fn to_path(&self) -> BezPath {
        self.local_bounds().to_path(0.1)
    }

    fn local_bounds(&self) -> KurboRect {
        KurboRect::new(0.0, 0.0, self.width, self.height)
    }

    fn scale(&mut self, scale_x: f64, scale_y: f64) {
        self.width = crate::transform::scale_length(self.width, scale_x);
        self.height = crate::transform::scale_length(self.height, scale_y);
    }

    fn validate(&self) -> Result<(), String> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err("image width and height must be positive".to_string());
        }
        Ok(())
    }
}
