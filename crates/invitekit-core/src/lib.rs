//! InviteKit Core Library
//!
//! Platform-agnostic element model, gesture transforms, undo history and
//! selection for the InviteKit template editor.

pub mod boundary;
pub mod config;
pub mod editing;
pub mod elements;
pub mod history;
pub mod selection;
pub mod session;
pub mod transform;

pub use boundary::{
    DataUrlResolver, ImageError, ImageLoad, ImageResolver, ImageResult, MemoryResolver,
    PendingImage, SerializableElement, TemplateConfig, from_external, to_external,
};
#[cfg(not(target_arch = "wasm32"))]
pub use boundary::FileResolver;
pub use config::{ConfigError, EditorConfig};
pub use editing::{PropertyError, apply_property, delete};
pub use elements::{
    Element, ElementError, ElementId, ElementKind, ElementList, ImageHandle, Shape, ShapeTrait,
    create_default,
};
pub use history::History;
pub use selection::{Selection, element_at};
pub use session::{ChangeListener, EditorSession};
pub use transform::{MIN_SIZE, TransformEnd, apply_drag, apply_transform_end};
