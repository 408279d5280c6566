//! File-based image resolver for native platforms.

use super::{BoxFuture, ImageError, ImageResolver, ImageResult};
use crate::elements::ImageHandle;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Reads image sources as paths relative to a base directory.
///
/// Sources that are absolute or step outside the base directory are refused.
pub struct FileResolver {
    /// Base directory for image files.
    base_path: PathBuf,
}

impl FileResolver {
    /// Create a resolver rooted at `base_path`.
    pub fn new(base_path: PathBuf) -> ImageResult<Self> {
        if !base_path.is_dir() {
            return Err(ImageError::Io(format!(
                "Image directory does not exist: {}",
                base_path.display()
            )));
        }
        Ok(Self { base_path })
    }

    /// Get the base path.
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    /// Map a source to a path inside the base directory.
    fn image_path(&self, src: &str) -> ImageResult<PathBuf> {
        let relative = Path::new(src);
        let inside = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if src.is_empty() || !inside {
            return Err(ImageError::UnsupportedSource(src.to_string()));
        }
        Ok(self.base_path.join(relative))
    }
}

impl ImageResolver for FileResolver {
    fn resolve(&self, src: &str) -> BoxFuture<'static, ImageResult<ImageHandle>> {
        let path = match self.image_path(src) {
            Ok(p) => p,
            Err(e) => return Box::pin(async move { Err(e) }),
        };
        let src = src.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Err(ImageError::NotFound(src));
            }
            let bytes = fs::read(&path).map_err(|e| {
                ImageError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;
            ImageHandle::from_bytes(bytes)
                .ok_or_else(|| ImageError::Decode(format!("unrecognised image format in {src}")))
        })
    }
}
