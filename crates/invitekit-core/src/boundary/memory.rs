//! In-memory image resolver.

use super::{BoxFuture, ImageError, ImageResolver, ImageResult};
use crate::elements::ImageHandle;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory image sources for testing and embedding.
#[derive(Default)]
pub struct MemoryResolver {
    images: RwLock<HashMap<String, ImageHandle>>,
}

impl MemoryResolver {
    /// Create a new empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register encoded image bytes under `src`.
    pub fn insert(&self, src: impl Into<String>, bytes: Vec<u8>) -> ImageResult<()> {
        let src = src.into();
        let handle = ImageHandle::from_bytes(bytes)
            .ok_or_else(|| ImageError::Decode(format!("unrecognised image format for {src}")))?;
        let mut images = self
            .images
            .write()
            .map_err(|e| ImageError::Other(format!("Lock error: {}", e)))?;
        images.insert(src, handle);
        Ok(())
    }

    pub fn remove(&self, src: &str) -> ImageResult<()> {
        let mut images = self
            .images
            .write()
            .map_err(|e| ImageError::Other(format!("Lock error: {}", e)))?;
        images.remove(src);
        Ok(())
    }

    fn lookup(&self, src: &str) -> ImageResult<ImageHandle> {
        let images = self
            .images
            .read()
            .map_err(|e| ImageError::Other(format!("Lock error: {}", e)))?;
        images
            .get(src)
            .cloned()
            .ok_or_else(|| ImageError::NotFound(src.to_string()))
    }
}

impl ImageResolver for MemoryResolver {
    fn resolve(&self, src: &str) -> BoxFuture<'static, ImageResult<ImageHandle>> {
        let result = self.lookup(src);
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::png_header;
    use pollster::block_on;

    #[test]
    fn test_insert_resolve_remove() {
        let resolver = MemoryResolver::new();
        resolver.insert("a.png", png_header()).unwrap();

        let first = block_on(resolver.resolve("a.png")).unwrap();
        let second = block_on(resolver.resolve("a.png")).unwrap();
        assert!(first.ptr_eq(&second));

        resolver.remove("a.png").unwrap();
        assert!(matches!(
            block_on(resolver.resolve("a.png")),
            Err(ImageError::NotFound(_))
        ));
    }

    #[test]
    fn test_insert_rejects_non_images() {
        let resolver = MemoryResolver::new();
        assert!(matches!(
            resolver.insert("a.txt", b"hello".to_vec()),
            Err(ImageError::Decode(_))
        ));
    }
}
