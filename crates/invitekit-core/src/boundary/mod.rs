//! Conversion between live element lists and their persisted form.
//!
//! Live elements may carry decoded image handles. Those never leave this
//! process: [`to_external`] strips them, and [`from_external`] hands back the
//! list right away along with one pending load per image.

mod data_url;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use data_url::DataUrlResolver;
pub use memory::MemoryResolver;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileResolver;

use crate::elements::{Element, ElementId, ElementList, ImageHandle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Image resolution errors.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image not found: {0}")]
    NotFound(String),
    #[error("Unsupported image source: {0}")]
    UnsupportedSource(String),
    #[error("Invalid image data: {0}")]
    Decode(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Image error: {0}")]
    Other(String),
}

/// Result type for image resolution.
pub type ImageResult<T> = Result<T, ImageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Turns an image `src` into a decoded handle.
///
/// The returned future owns everything it needs, so loads can outlive the
/// borrow of the resolver and the session can keep editing meanwhile.
pub trait ImageResolver {
    fn resolve(&self, src: &str) -> BoxFuture<'static, ImageResult<ImageHandle>>;
}

/// An element as exchanged with the outside: never carries an image handle.
pub type SerializableElement = Element;

fn default_width() -> f64 {
    1200.0
}

fn default_height() -> f64 {
    800.0
}

/// A saved design: canvas size plus its elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub elements: Vec<SerializableElement>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            elements: Vec::new(),
        }
    }
}

impl TemplateConfig {
    pub fn new(width: f64, height: f64, elements: &[Element]) -> Self {
        Self {
            width,
            height,
            elements: to_external(elements),
        }
    }

    /// Serialize the template to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a template from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Copy `elements` for persistence, dropping every image handle.
pub fn to_external(elements: &[Element]) -> Vec<SerializableElement> {
    elements
        .iter()
        .cloned()
        .map(|mut el| {
            if let Some(img) = el.shape.as_image_mut() {
                img.take_handle();
            }
            el
        })
        .collect()
}

/// Rebuild a live list from persisted elements.
///
/// The list is returned immediately with no handles attached. Each image with
/// a non-empty `src` gets a [`PendingImage`] whose result should be passed to
/// [`EditorSession::attach_image`](crate::session::EditorSession::attach_image).
pub fn from_external(
    elements: Vec<SerializableElement>,
    resolver: &dyn ImageResolver,
) -> (ElementList, Vec<PendingImage>) {
    let mut pending = Vec::new();
    let list: ElementList = elements
        .into_iter()
        .map(|mut el| {
            if let Some(img) = el.shape.as_image_mut() {
                img.take_handle();
                if !img.src.is_empty() {
                    pending.push(PendingImage::new(el.id.clone(), img.src.clone(), resolver));
                }
            }
            el
        })
        .collect();
    log::debug!(
        "Loaded {} element(s), {} image(s) pending",
        list.len(),
        pending.len()
    );
    (list, pending)
}

/// An image load started for one element.
pub struct PendingImage {
    id: ElementId,
    src: String,
    future: BoxFuture<'static, ImageResult<ImageHandle>>,
}

impl PendingImage {
    /// Start resolving `src` for element `id`.
    pub fn new(id: ElementId, src: String, resolver: &dyn ImageResolver) -> Self {
        let future = resolver.resolve(&src);
        Self { id, src, future }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    /// Wait for the load to finish.
    pub async fn resolve(self) -> ImageLoad {
        let result = self.future.await;
        ImageLoad {
            id: self.id,
            src: self.src,
            result,
        }
    }
}

impl fmt::Debug for PendingImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingImage")
            .field("id", &self.id)
            .field("src", &self.src)
            .finish_non_exhaustive()
    }
}

/// Outcome of a [`PendingImage`].
#[derive(Debug)]
pub struct ImageLoad {
    pub id: ElementId,
    /// The source the load was started for.
    pub src: String,
    pub result: ImageResult<ImageHandle>,
}
