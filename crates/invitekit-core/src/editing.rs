//! Property edits and deletion on element lists.

use crate::elements::{Element, ElementId, ElementList};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while editing a property.
#[derive(Debug, Error)]
pub enum PropertyError {
    #[error("Property {0} cannot be changed")]
    Immutable(String),
    #[error("Unknown property {key} for {kind} elements")]
    UnknownProperty { key: String, kind: String },
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Result type for property edits.
pub type PropertyResult<T> = Result<T, PropertyError>;

/// Copy of `elements` with field `key` of element `id` set to `value`.
///
/// A missing id leaves the list unchanged. The edited element is re-validated
/// and keeps its decoded image while its `src` stays the same.
pub fn apply_property(
    elements: &[Element],
    id: &ElementId,
    key: &str,
    value: &Value,
) -> PropertyResult<ElementList> {
    let Some(index) = elements.iter().position(|el| &el.id == id) else {
        log::debug!("Property {} targets missing element {}", key, id);
        return Ok(elements.to_vec());
    };
    let edited = set_field(&elements[index], key, value)?;

    let mut next = elements.to_vec();
    next[index] = edited;
    Ok(next)
}

fn set_field(element: &Element, key: &str, value: &Value) -> PropertyResult<Element> {
    if key == "id" || key == "type" {
        return Err(PropertyError::Immutable(key.to_string()));
    }
    if let Some(kind) = element.kind() {
        if !Element::COMMON_PROPERTIES.contains(&key) && !kind.property_names().contains(&key) {
            return Err(PropertyError::UnknownProperty {
                key: key.to_string(),
                kind: kind.to_string(),
            });
        }
    }

    let invalid = |reason: String| PropertyError::InvalidValue {
        key: key.to_string(),
        reason,
    };
    let mut raw = serde_json::to_value(element).map_err(|e| invalid(e.to_string()))?;
    if let Value::Object(map) = &mut raw {
        map.insert(key.to_string(), value.clone());
    }
    let mut edited: Element = serde_json::from_value(raw).map_err(|e| invalid(e.to_string()))?;
    edited.validate().map_err(invalid)?;

    if let (Some(before), Some(after)) = (element.shape.as_image(), edited.shape.as_image_mut()) {
        if before.src == after.src {
            after.set_handle(before.handle().cloned());
        }
    }
    Ok(edited)
}

/// Copy of `elements` without element `id`.
pub fn delete(elements: &[Element], id: &ElementId) -> ElementList {
    elements.iter().filter(|el| &el.id != id).cloned().collect()
}
