//! Resolver for inline `data:` image sources.

use super::{BoxFuture, ImageError, ImageResolver, ImageResult};
use crate::elements::{ImageFormat, ImageHandle};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Decodes `data:image/<format>;base64,<payload>` sources.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataUrlResolver;

impl DataUrlResolver {
    pub fn new() -> Self {
        Self
    }

    /// Decode a data URL into a handle.
    pub fn decode(src: &str) -> ImageResult<ImageHandle> {
        let rest = src
            .strip_prefix("data:")
            .ok_or_else(|| ImageError::UnsupportedSource(truncate(src)))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| ImageError::Decode("missing data URL payload".to_string()))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| ImageError::UnsupportedSource(format!("non-base64 data URL ({header})")))?;

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| ImageError::Decode(e.to_string()))?;
        let handle = ImageHandle::from_bytes(bytes)
            .ok_or_else(|| ImageError::Decode("unrecognised image format".to_string()))?;

        if let Some(declared) = ImageFormat::from_mime_type(mime) {
            if declared != handle.format() {
                log::warn!(
                    "Data URL declares {} but contains {}",
                    declared.mime_type(),
                    handle.format().mime_type()
                );
            }
        }
        Ok(handle)
    }

    /// Encode bytes as a data URL, detecting the format from the content.
    pub fn encode(bytes: &[u8]) -> Option<String> {
        let format = ImageFormat::from_magic_bytes(bytes)?;
        Some(format!(
            "data:{};base64,{}",
            format.mime_type(),
            STANDARD.encode(bytes)
        ))
    }
}

fn truncate(src: &str) -> String {
    src.chars().take(64).collect()
}

impl ImageResolver for DataUrlResolver {
    fn resolve(&self, src: &str) -> BoxFuture<'static, ImageResult<ImageHandle>> {
        let src = src.to_string();
        Box::pin(async move { Self::decode(&src) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::png_header;

    #[test]
    fn test_decode_encoded_png() {
        let url = DataUrlResolver::encode(&png_header()).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        let handle = pollster::block_on(DataUrlResolver::new().resolve(&url)).unwrap();
        assert_eq!(handle.format(), ImageFormat::Png);
        assert_eq!(handle.bytes(), png_header().as_slice());
    }

    #[test]
    fn test_rejects_other_sources() {
        assert!(matches!(
            DataUrlResolver::decode("https://example.com/a.png"),
            Err(ImageError::UnsupportedSource(_))
        ));
        assert!(matches!(
            DataUrlResolver::decode("data:image/png,plain"),
            Err(ImageError::UnsupportedSource(_))
        ));
        assert!(matches!(
            DataUrlResolver::decode("data:image/png;base64,!!!"),
            Err(ImageError::Decode(_))
        ));
        // Valid base64, but not an image.
        assert!(matches!(
            DataUrlResolver::decode("data:image/png;base64,aGVsbG8gd29ybGQ="),
            Err(ImageError::Decode(_))
        ));
    }
}
